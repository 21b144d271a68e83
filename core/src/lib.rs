//! Intake pipeline for decoded POCSAG pager traffic.
//!
//! Messages arrive from an external decoder one at a time, are filtered and
//! de-duplicated against a bounded recency window, and every accepted message
//! is appended to a date-partitioned log on disk.

pub mod decoder_interface;
pub mod intake;
pub mod persistence;
pub mod prelude;
pub mod telemetry;

pub use decoder_interface::PagerMessage;
pub use intake::{IntakeHandle, IntakePipeline, RetentionWindow, WindowSnapshot};
pub use prelude::{IntakeConfig, IntakeOutcome, MessageSink, RejectReason};
