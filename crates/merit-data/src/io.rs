use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::artifact::CalibrationData;
use crate::errors::DataError;
use crate::filename::ScienceFilename;
use crate::l0;
use crate::model::{DataLevel, MeritData};

/// Load a physical data file into the logical data container. The science
/// filename supplies the metadata; the extension selects the decoder.
pub fn load_data_file(path: &Path) -> Result<MeritData, DataError> {
    let filename = ScienceFilename::from_path(path)?;

    let df = match filename.extension.as_str() {
        "bin" => {
            if filename.meta.level != DataLevel::L0 {
                return Err(DataError::FormatMismatch {
                    format: "merit_l0",
                    reason: format!(
                        "binary file named as level {}, expected l0",
                        filename.meta.level
                    ),
                });
            }
            let bytes = fs::read(path)?;
            let decoded = l0::decode(&bytes)?;
            l0::to_dataframe(&decoded)?
        }
        "parquet" => {
            let file = fs::File::open(path)?;
            ParquetReader::new(file).finish()?
        }
        other => {
            return Err(DataError::UnsupportedExtension {
                extension: other.to_string(),
            })
        }
    };

    Ok(MeritData::new(filename.meta, df))
}

/// Write the logical data container to its physical file format under
/// `output_dir`, returning the written path. Products are parquet, named by
/// the science filename convention.
pub fn write_data_file(data: &MeritData, output_dir: &Path) -> Result<PathBuf, DataError> {
    let path = output_dir.join(data.meta.science_filename("parquet"));
    let file = fs::File::create(&path)?;
    let mut df = data.df.clone();
    ParquetWriter::new(file).finish(&mut df)?;
    Ok(path)
}

pub fn read_calibration_file(path: &Path) -> Result<CalibrationData, DataError> {
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|source| DataError::Artifact {
        path: path.display().to_string(),
        source,
    })
}
