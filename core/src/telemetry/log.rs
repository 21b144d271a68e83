use log::{debug, info, warn};

use crate::decoder_interface::PagerMessage;
use crate::prelude::{PersistError, RejectReason};

const TARGET: &str = "pocsag::intake";
const PREVIEW_CHARS: usize = 48;

/// Log lines emitted by the intake pipeline.
pub struct IntakeLog;

impl IntakeLog {
    pub fn new() -> Self {
        Self
    }

    pub fn accepted(&self, message: &PagerMessage, window_len: usize) {
        info!(
            target: TARGET,
            "accepted {:016x} (window {}): {}",
            message.hash(),
            window_len,
            preview(message.payload())
        );
    }

    pub fn rejected(&self, message: &PagerMessage, reason: RejectReason) {
        debug!(
            target: TARGET,
            "rejected {:016x}: {}", message.hash(), reason
        );
    }

    pub fn evicted(&self, count: usize) {
        debug!(target: TARGET, "evicted {} message(s) from window", count);
    }

    pub fn persist_failed(&self, err: &PersistError) {
        warn!(target: TARGET, "message kept in memory but not logged: {}", err);
    }

    pub fn cleared(&self, dropped: usize) {
        info!(target: TARGET, "window cleared ({} message(s) dropped)", dropped);
    }
}

impl Default for IntakeLog {
    fn default() -> Self {
        Self::new()
    }
}

fn preview(payload: &str) -> String {
    let mut line: String = payload
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if payload.chars().count() > PREVIEW_CHARS {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_flattens_control_chars_and_truncates() {
        assert_eq!(preview("a\r\nb"), "a  b");
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(PREVIEW_CHARS)));
    }
}
