use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::errors::DataError;
use crate::model::{DataLevel, MeritMeta};

/// Science filename convention:
/// `{mission}_{instrument}_{level}_{YYYYDOY-HHMMSS}_v{NN}.{ext}`,
/// e.g. `hermes_merit_l0_2022239-000000_v01.bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScienceFilename {
    pub meta: MeritMeta,
    pub extension: String,
}

const TIME_FORMAT: &str = "%Y%j-%H%M%S";

impl ScienceFilename {
    pub fn parse(name: &str) -> Result<Self, DataError> {
        let invalid = |message: String| DataError::Filename {
            name: name.to_string(),
            message,
        };

        let (stem, extension) = name
            .rsplit_once('.')
            .ok_or_else(|| invalid("missing extension".to_string()))?;
        if extension.is_empty() {
            return Err(invalid("missing extension".to_string()));
        }

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 5 {
            return Err(invalid(format!(
                "expected 5 underscore-separated fields, found {}",
                parts.len()
            )));
        }

        let mission = parts[0];
        let instrument = parts[1];
        if mission.is_empty() || instrument.is_empty() {
            return Err(invalid("empty mission or instrument field".to_string()));
        }

        let level = DataLevel::try_from(parts[2]).map_err(|err| invalid(err))?;

        let start_time = NaiveDateTime::parse_from_str(parts[3], TIME_FORMAT)
            .map_err(|err| invalid(format!("invalid time field '{}': {err}", parts[3])))?
            .and_utc();

        let version_field = parts[4];
        let digits = version_field
            .strip_prefix('v')
            .ok_or_else(|| invalid(format!("version field '{version_field}' must start with 'v'")))?;
        let version: u16 = digits
            .parse()
            .map_err(|err| invalid(format!("invalid version field '{version_field}': {err}")))?;

        Ok(Self {
            meta: MeritMeta {
                mission: mission.to_string(),
                instrument: instrument.to_string(),
                level,
                start_time,
                version,
            },
            extension: extension.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DataError::Filename {
                name: path.display().to_string(),
                message: "path has no UTF-8 filename component".to_string(),
            })?;
        Self::parse(name)
    }
}

impl fmt::Display for ScienceFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.meta.science_filename(&self.extension))
    }
}
