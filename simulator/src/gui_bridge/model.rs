use pocsag_core::telemetry::MetricsSnapshot;
use pocsag_core::{IntakeConfig, PagerMessage, WindowSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayRow {
    pub hash: String,
    pub valid: bool,
    pub payload: String,
}

/// What a display renders: the window oldest-first plus running counters.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisplayModel {
    pub revision: u64,
    pub multiline: bool,
    pub rows: Vec<DisplayRow>,
    pub metrics: MetricsSnapshot,
}

impl DisplayModel {
    pub fn from_snapshot(
        snapshot: &WindowSnapshot,
        config: &IntakeConfig,
        metrics: MetricsSnapshot,
    ) -> Self {
        let multiline = config.multiline_payload;
        Self {
            revision: snapshot.revision,
            multiline,
            rows: snapshot
                .messages
                .iter()
                .map(|message| DisplayRow::new(message, multiline))
                .collect(),
            metrics,
        }
    }
}

impl DisplayRow {
    fn new(message: &PagerMessage, multiline: bool) -> Self {
        let payload = if multiline {
            message.payload().to_string()
        } else {
            message.payload().lines().collect::<Vec<_>>().join(" ")
        };
        Self {
            hash: format!("{:016x}", message.hash()),
            valid: message.is_valid(),
            payload,
        }
    }
}
