use std::env;
use std::path::PathBuf;

pub const CALIBRATION_DIR_VAR: &str = "MERIT_CALIBRATION_DIR";
pub const OUTPUT_DIR_VAR: &str = "MERIT_OUTPUT_DIR";

/// Stage configuration, read from the environment with working defaults for
/// a local checkout. CLI flags override both.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub calibration_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            calibration_dir: PathBuf::from("calibrations"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            calibration_dir: env::var_os(CALIBRATION_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.calibration_dir),
            output_dir: env::var_os(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}
