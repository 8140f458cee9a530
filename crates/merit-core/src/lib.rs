pub mod calibration;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resolver;

pub use calibration::calibrate_data;
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::process_file;
pub use resolver::{CalibrationCandidate, CalibrationDirectoryResolver, CalibrationResolver};
