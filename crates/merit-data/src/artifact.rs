use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DataLevel;

/// A calibration artifact as stored on disk: a TOML file with a
/// `[calibration]` header and per-channel coefficient tables.
///
/// ```toml
/// [calibration]
/// instrument = "merit"
/// applies_to_level = "l0"
/// version = 2
/// valid_from = "2022-08-01T00:00:00Z"
/// valid_until = "2023-01-01T00:00:00Z"
/// description = "post-commissioning gains"
///
/// [channels.ch00]
/// gain = 1.02
/// offset = -0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    pub calibration: CalibrationMeta,
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelCoefficients>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMeta {
    pub instrument: String,
    pub applies_to_level: DataLevel,
    pub version: u16,
    pub valid_from: DateTime<Utc>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCoefficients {
    pub gain: f64,
    pub offset: f64,
}

impl CalibrationData {
    /// Whether the validity window `[valid_from, valid_until)` covers `time`.
    pub fn covers(&self, time: DateTime<Utc>) -> bool {
        if time < self.calibration.valid_from {
            return false;
        }
        match self.calibration.valid_until {
            Some(until) => time < until,
            None => true,
        }
    }
}
