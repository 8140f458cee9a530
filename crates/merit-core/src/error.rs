use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("calibration file for {logical_file_id} not found")]
    MissingCalibration { logical_file_id: String },

    #[error("data file error: {0}")]
    Data(#[from] merit_data::DataError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid calibration directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to walk calibration directory: {0}")]
    Glob(#[from] glob::GlobError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
