use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::decoder_interface::{FilterDepths, PagerMessage};

/// Settings consumed by the intake pipeline.
///
/// `multiline_payload` and `filter_depths` are carried for the display and
/// the decoder respectively; the pipeline itself never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub deduplicate: bool,
    pub hide_bad_decodes: bool,
    pub multiline_payload: bool,
    pub filter_depths: FilterDepths,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            deduplicate: true,
            hide_bad_decodes: true,
            multiline_payload: false,
            filter_depths: FilterDepths::default(),
        }
    }
}

/// Why a message was dropped. Rejection is a normal outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidDecode,
    TooShort,
    HashDuplicate,
    FuzzyDuplicate,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidDecode => "invalid decode",
            RejectReason::TooShort => "payload too short",
            RejectReason::HashDuplicate => "duplicate (hash)",
            RejectReason::FuzzyDuplicate => "duplicate (fuzzy)",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptance {
    /// Messages pushed out of the window by this insert, oldest first.
    pub evicted: usize,
    /// `None` when the log append succeeded.
    pub persist_error: Option<String>,
}

/// Terminal result of running one message through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntakeOutcome {
    Accepted(Acceptance),
    Rejected { reason: RejectReason },
}

impl IntakeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IntakeOutcome::Accepted(_))
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            IntakeOutcome::Rejected { reason } => Some(*reason),
            IntakeOutcome::Accepted(_) => None,
        }
    }
}

/// Failure writing to durable storage.
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("creating log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("appending to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the coordinator handle.
#[derive(thiserror::Error, Debug)]
pub enum IntakeError {
    #[error("intake coordinator has stopped")]
    Closed,
}

pub type IntakeResult<T> = Result<T, IntakeError>;

/// Append-only destination for accepted messages.
pub trait MessageSink {
    fn append(&mut self, message: &PagerMessage) -> Result<(), PersistError>;
}

impl<S: MessageSink + ?Sized> MessageSink for Box<S> {
    fn append(&mut self, message: &PagerMessage) -> Result<(), PersistError> {
        (**self).append(message)
    }
}
