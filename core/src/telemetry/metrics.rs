use std::sync::Mutex;

use serde::Serialize;

use crate::prelude::RejectReason;

/// Running counters for the intake pipeline.
pub struct IntakeMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub received: usize,
    pub accepted: usize,
    pub rejected_invalid: usize,
    pub rejected_short: usize,
    pub rejected_hash_duplicate: usize,
    pub rejected_fuzzy_duplicate: usize,
    pub evicted: usize,
    pub persist_failures: usize,
}

impl MetricsSnapshot {
    pub fn rejected(&self) -> usize {
        self.rejected_invalid
            + self.rejected_short
            + self.rejected_hash_duplicate
            + self.rejected_fuzzy_duplicate
    }
}

impl IntakeMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_received(&self) {
        self.update(|metrics| metrics.received += 1);
    }

    pub fn record_accepted(&self, evicted: usize) {
        self.update(|metrics| {
            metrics.accepted += 1;
            metrics.evicted += evicted;
        });
    }

    pub fn record_rejected(&self, reason: RejectReason) {
        self.update(|metrics| match reason {
            RejectReason::InvalidDecode => metrics.rejected_invalid += 1,
            RejectReason::TooShort => metrics.rejected_short += 1,
            RejectReason::HashDuplicate => metrics.rejected_hash_duplicate += 1,
            RejectReason::FuzzyDuplicate => metrics.rejected_fuzzy_duplicate += 1,
        });
    }

    pub fn record_persist_failure(&self) {
        self.update(|metrics| metrics.persist_failures += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for IntakeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
