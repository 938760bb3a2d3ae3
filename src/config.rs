//! Runtime configuration: where the record store and the log file live.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "STUDENT_RECORDS_HOME";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-records-manager";
/// SQLite file name stored inside the data directory.
const DB_FILE_NAME: &str = "records.sqlite";
/// Log file name stored inside the data directory.
const LOG_FILE_NAME: &str = "student-records.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    data_dir: PathBuf,
}

impl Config {
    /// Use `$STUDENT_RECORDS_HOME` when set and non-empty, otherwise a hidden
    /// folder in the user's home directory.
    pub fn from_env() -> Result<Self> {
        match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::with_data_dir(dir)),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                Ok(Self::with_data_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
            }
        }
    }

    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_in_data_dir() {
        let config = Config::with_data_dir("/tmp/records");
        assert_eq!(config.db_path(), Path::new("/tmp/records/records.sqlite"));
        assert_eq!(config.log_path(), Path::new("/tmp/records/student-records.log"));
    }
}
