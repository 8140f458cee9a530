use std::fmt;

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Calibration maturity of a data product. L0 is raw telemetry; each
/// calibration pass produces the next level up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataLevel {
    L0,
    L1,
    L2,
    L3,
    L4,
}

impl DataLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataLevel::L0 => "l0",
            DataLevel::L1 => "l1",
            DataLevel::L2 => "l2",
            DataLevel::L3 => "l3",
            DataLevel::L4 => "l4",
        }
    }

    /// The level a single calibration pass over this data would produce.
    pub fn next(&self) -> Option<DataLevel> {
        match self {
            DataLevel::L0 => Some(DataLevel::L1),
            DataLevel::L1 => Some(DataLevel::L2),
            DataLevel::L2 => Some(DataLevel::L3),
            DataLevel::L3 => Some(DataLevel::L4),
            DataLevel::L4 => None,
        }
    }
}

impl fmt::Display for DataLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DataLevel {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l0" => Ok(DataLevel::L0),
            "l1" => Ok(DataLevel::L1),
            "l2" => Ok(DataLevel::L2),
            "l3" => Ok(DataLevel::L3),
            "l4" => Ok(DataLevel::L4),
            other => Err(format!("unknown data level '{other}'")),
        }
    }
}

/// File-level metadata carried by the science filename convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritMeta {
    pub mission: String,
    pub instrument: String,
    pub level: DataLevel,
    pub start_time: DateTime<Utc>,
    pub version: u16,
}

impl MeritMeta {
    /// The logical file id: the science filename without its extension.
    pub fn logical_file_id(&self) -> String {
        format!(
            "{}_{}_{}_{}_v{:02}",
            self.mission,
            self.instrument,
            self.level,
            self.start_time.format("%Y%j-%H%M%S"),
            self.version
        )
    }

    pub fn science_filename(&self, extension: &str) -> String {
        format!("{}.{extension}", self.logical_file_id())
    }
}

/// The logical data container: instrument measurements plus the metadata
/// needed to place them in the mission archive.
#[derive(Debug, Clone)]
pub struct MeritData {
    pub meta: MeritMeta,
    pub df: DataFrame,
}

impl MeritData {
    pub fn new(meta: MeritMeta, df: DataFrame) -> Self {
        Self { meta, df }
    }
}
