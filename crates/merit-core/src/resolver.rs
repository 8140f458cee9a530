use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use merit_data::{read_calibration_file, CalibrationData, MeritData};

use crate::error::Result;

/// Seam for calibration-file lookup. Production code scans the calibration
/// directory; tests and future pipeline stages inject their own.
pub trait CalibrationResolver {
    /// Return the path of the calibration artifact valid for the container at
    /// `time`, or `None` when no artifact applies. `time` defaults to the
    /// container's start time when absent.
    fn resolve(&self, data: &MeritData, time: Option<DateTime<Utc>>) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Clone)]
pub struct CalibrationCandidate {
    pub path: PathBuf,
    pub artifact: CalibrationData,
}

/// Resolves calibration files from a directory of TOML artifacts. A file
/// matches when its instrument and `applies_to_level` agree with the
/// container and its validity window covers the query time; of the matches,
/// the highest version wins.
#[derive(Debug, Clone)]
pub struct CalibrationDirectoryResolver {
    dir: PathBuf,
}

impl CalibrationDirectoryResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every readable artifact in the directory, in path order. Unreadable or
    /// unparsable files are skipped with a warning so one bad neighbor cannot
    /// poison resolution.
    pub fn candidates(&self) -> Result<Vec<CalibrationCandidate>> {
        let pattern = self.dir.join("*.toml");
        let pattern = pattern.to_string_lossy();

        let mut candidates = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            match read_calibration_file(&path) {
                Ok(artifact) => candidates.push(CalibrationCandidate { path, artifact }),
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable calibration artifact"
                    );
                }
            }
        }

        Ok(candidates)
    }
}

impl CalibrationResolver for CalibrationDirectoryResolver {
    fn resolve(&self, data: &MeritData, time: Option<DateTime<Utc>>) -> Result<Option<PathBuf>> {
        let query_time = time.unwrap_or(data.meta.start_time);

        let best = self
            .candidates()?
            .into_iter()
            .filter(|candidate| {
                let meta = &candidate.artifact.calibration;
                meta.instrument.eq_ignore_ascii_case(&data.meta.instrument)
                    && meta.applies_to_level == data.meta.level
                    && candidate.artifact.covers(query_time)
            })
            .max_by_key(|candidate| candidate.artifact.calibration.version);

        match &best {
            Some(candidate) => debug!(
                path = %candidate.path.display(),
                version = candidate.artifact.calibration.version,
                "resolved calibration file"
            ),
            None => debug!(
                instrument = %data.meta.instrument,
                level = %data.meta.level,
                time = %query_time,
                "no calibration file matched"
            ),
        }

        Ok(best.map(|candidate| candidate.path))
    }
}
