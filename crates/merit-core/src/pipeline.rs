use std::path::{Path, PathBuf};

use tracing::info;

use merit_data::{load_data_file, write_data_file};

use crate::calibration::calibrate_data;
use crate::error::Result;
use crate::resolver::CalibrationResolver;

/// Entry point for the pipeline stage: load the physical file into the
/// logical container, calibrate it, write the product, and report every
/// output path. Errors from the delegated steps propagate untouched; nothing
/// is written unless calibration succeeded.
pub fn process_file(
    data_filename: &Path,
    resolver: &dyn CalibrationResolver,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    info!(file = %data_filename.display(), "processing file");
    let mut output_files = Vec::new();

    let instrument_data = load_data_file(data_filename)?;

    let calibrated_data = calibrate_data(&instrument_data, resolver)?;

    let calibrated_filename = write_data_file(&calibrated_data, output_dir)?;
    info!(
        file = %calibrated_filename.display(),
        rows = calibrated_data.df.height(),
        "wrote calibrated file"
    );
    output_files.push(calibrated_filename);

    Ok(output_files)
}
