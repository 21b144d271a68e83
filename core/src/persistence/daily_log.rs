use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decoder_interface::PagerMessage;
use crate::prelude::{MessageSink, PersistError};

/// Directory, relative to the working directory, that holds the daily logs.
pub const DEFAULT_LOG_DIR: &str = "POCSAG";

/// Terminator written after each payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Append-only text log, one file per calendar day, one payload per line.
#[derive(Debug, Clone)]
pub struct DailyLog {
    dir: PathBuf,
    line_ending: LineEnding,
}

impl DailyLog {
    pub fn new(dir: impl Into<PathBuf>, line_ending: LineEnding) -> Self {
        Self {
            dir: dir.into(),
            line_ending,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file for `date`, e.g. `POCSAG/20240307.txt`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.txt", date.format("%Y%m%d")))
    }

    pub fn append_on(&self, date: NaiveDate, message: &PagerMessage) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(date);
        let line = format!("{}{}", message.payload(), self.line_ending.as_str());
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| PersistError::Append { path, source })
    }
}

impl Default for DailyLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR, LineEnding::default())
    }
}

impl MessageSink for DailyLog {
    fn append(&mut self, message: &PagerMessage) -> Result<(), PersistError> {
        self.append_on(Local::now().date_naive(), message)
    }
}
