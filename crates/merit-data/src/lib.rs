pub mod artifact;
pub mod errors;
pub mod filename;
pub mod io;
pub mod l0;
pub mod model;

pub use artifact::{CalibrationData, CalibrationMeta, ChannelCoefficients};
pub use errors::DataError;
pub use filename::ScienceFilename;
pub use io::{load_data_file, read_calibration_file, write_data_file};
pub use model::{DataLevel, MeritData, MeritMeta};

#[cfg(test)]
mod tests;
