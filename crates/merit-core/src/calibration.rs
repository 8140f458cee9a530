use tracing::debug;

use merit_data::{read_calibration_file, MeritData};

use crate::error::{PipelineError, Result};
use crate::resolver::CalibrationResolver;

/// Calibrate one data container. Resolves and reads the applicable
/// calibration file; failing to find one is the stage's domain error.
/// The container itself is returned unchanged and the level is not advanced.
pub fn calibrate_data(
    instrument_data: &MeritData,
    resolver: &dyn CalibrationResolver,
) -> Result<MeritData> {
    let calib_file = resolver.resolve(instrument_data, Some(instrument_data.meta.start_time))?;

    let calib_file = calib_file.ok_or_else(|| PipelineError::MissingCalibration {
        logical_file_id: instrument_data.meta.logical_file_id(),
    })?;

    let calib_data = read_calibration_file(&calib_file)?;
    debug!(
        path = %calib_file.display(),
        version = calib_data.calibration.version,
        channels = calib_data.channels.len(),
        "loaded calibration file"
    );

    // TODO: apply the per-channel gain/offset coefficients from `calib_data`
    // once the flight calibration curves are delivered.
    Ok(instrument_data.clone())
}
