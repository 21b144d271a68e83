use std::sync::Arc;

use crate::decoder_interface::PagerMessage;
use crate::intake::duplicate::{has_hash_match, is_fuzzy_duplicate};
use crate::intake::filter::{meets_length_floor, passes_validity};
use crate::intake::window::{RetentionWindow, WindowSnapshot};
use crate::prelude::{Acceptance, IntakeConfig, IntakeOutcome, MessageSink, RejectReason};
use crate::telemetry::{IntakeLog, IntakeMetrics};

/// Single-context intake: filter, de-duplicate, retain, persist.
///
/// Not thread-safe by itself; [`IntakeCoordinator`](crate::intake::IntakeCoordinator)
/// owns one of these on a dedicated task.
pub struct IntakePipeline<S> {
    config: IntakeConfig,
    window: RetentionWindow,
    sink: S,
    metrics: Arc<IntakeMetrics>,
    logger: IntakeLog,
    revision: u64,
}

impl<S: MessageSink> IntakePipeline<S> {
    pub fn new(config: IntakeConfig, sink: S) -> Self {
        Self::with_metrics(config, sink, Arc::new(IntakeMetrics::new()))
    }

    pub fn with_metrics(config: IntakeConfig, sink: S, metrics: Arc<IntakeMetrics>) -> Self {
        Self {
            config,
            window: RetentionWindow::new(),
            sink,
            metrics,
            logger: IntakeLog::new(),
            revision: 0,
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: IntakeConfig) {
        self.config = config;
    }

    pub fn window(&self) -> &RetentionWindow {
        &self.window
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn metrics(&self) -> Arc<IntakeMetrics> {
        self.metrics.clone()
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.window.snapshot(self.revision)
    }

    /// Runs one message to completion.
    pub fn process(&mut self, message: PagerMessage) -> IntakeOutcome {
        self.metrics.record_received();

        if let Err(reason) = self.screen(&message) {
            self.metrics.record_rejected(reason);
            self.logger.rejected(&message, reason);
            return IntakeOutcome::Rejected { reason };
        }

        let persisted = self.sink.append(&message);

        self.window.insert(message);
        let evicted = self.window.evict_if_over_capacity().len();
        self.revision += 1;

        if evicted > 0 {
            self.logger.evicted(evicted);
        }
        if let Some(latest) = self.window.newest() {
            self.logger.accepted(latest, self.window.len());
        }
        self.metrics.record_accepted(evicted);

        let persist_error = match persisted {
            Ok(()) => None,
            Err(err) => {
                self.metrics.record_persist_failure();
                self.logger.persist_failed(&err);
                Some(err.to_string())
            }
        };

        IntakeOutcome::Accepted(Acceptance {
            evicted,
            persist_error,
        })
    }

    /// User-triggered reset. The on-disk log is left alone.
    pub fn clear(&mut self) -> usize {
        let dropped = self.window.len();
        self.window.clear();
        self.revision += 1;
        self.logger.cleared(dropped);
        dropped
    }

    /// Filters run before any duplicate check; the fuzzy check relies on the
    /// length floor having already passed.
    fn screen(&self, message: &PagerMessage) -> Result<(), RejectReason> {
        if !passes_validity(&self.config, message) {
            return Err(RejectReason::InvalidDecode);
        }
        if !meets_length_floor(message) {
            return Err(RejectReason::TooShort);
        }
        if self.config.deduplicate && has_hash_match(message, &self.window) {
            return Err(RejectReason::HashDuplicate);
        }
        if is_fuzzy_duplicate(message, &self.window) {
            return Err(RejectReason::FuzzyDuplicate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::window::WINDOW_CAPACITY;
    use crate::persistence::{DailyLog, LineEnding};
    use crate::prelude::PersistError;
    use chrono::Local;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        lines: Vec<String>,
    }

    impl MessageSink for RecordingSink {
        fn append(&mut self, message: &PagerMessage) -> Result<(), PersistError> {
            self.lines.push(message.payload().to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl MessageSink for FailingSink {
        fn append(&mut self, _message: &PagerMessage) -> Result<(), PersistError> {
            Err(PersistError::Append {
                path: PathBuf::from("POCSAG/unwritable.txt"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    /// 60 characters with a unique interior at offset 30.
    fn page(idx: u64) -> PagerMessage {
        PagerMessage::new(format!("{idx:030}<KEY{idx:05}>{}", "-".repeat(20)), true, idx)
    }

    fn recording_pipeline() -> IntakePipeline<RecordingSink> {
        IntakePipeline::new(IntakeConfig::default(), RecordingSink::default())
    }

    #[test]
    fn single_message_lands_in_window_and_log() {
        let temp = TempDir::new().unwrap();
        let log = DailyLog::new(temp.path().join("POCSAG"), LineEnding::Lf);
        let mut pipeline = IntakePipeline::new(IntakeConfig::default(), log);

        let message = page(1);
        assert_eq!(message.payload_len(), 60);
        let outcome = pipeline.process(message.clone());

        assert!(outcome.is_accepted());
        assert_eq!(pipeline.window().len(), 1);
        let written =
            fs::read_to_string(pipeline.sink().path_for(Local::now().date_naive())).unwrap();
        assert_eq!(written, format!("{}\n", message.payload()));
    }

    #[test]
    fn repeated_message_is_kept_once() {
        let mut pipeline = recording_pipeline();
        assert!(pipeline.process(page(1)).is_accepted());

        let second = pipeline.process(page(1));
        assert_eq!(second.reject_reason(), Some(RejectReason::HashDuplicate));
        assert_eq!(pipeline.window().len(), 1);
        assert_eq!(pipeline.sink().lines.len(), 1);
    }

    #[test]
    fn window_holds_latest_twenty_five_while_log_keeps_all() {
        let mut pipeline = recording_pipeline();
        for idx in 1..=30 {
            assert!(pipeline.process(page(idx)).is_accepted());
            assert!(pipeline.window().len() <= WINDOW_CAPACITY);
        }

        let held: Vec<u64> = pipeline.window().iter().map(PagerMessage::hash).collect();
        assert_eq!(held, (6..=30).collect::<Vec<_>>());

        let logged: Vec<String> = (1..=30).map(|idx| page(idx).payload().to_string()).collect();
        assert_eq!(pipeline.sink().lines, logged);
        assert_eq!(pipeline.metrics().snapshot().evicted, 5);
    }

    #[test]
    fn short_message_is_rejected_before_duplicate_checks() {
        let mut pipeline = recording_pipeline();
        pipeline.process(page(1));

        let short = PagerMessage::new("X".repeat(40), true, 1);
        let outcome = pipeline.process(short);

        assert_eq!(outcome.reject_reason(), Some(RejectReason::TooShort));
        assert_eq!(pipeline.window().len(), 1);
        assert_eq!(pipeline.sink().lines.len(), 1);
    }

    #[test]
    fn bad_decode_is_hidden_when_configured() {
        let mut pipeline = recording_pipeline();
        let bad = PagerMessage::new(page(2).payload(), false, 2);

        let outcome = pipeline.process(bad.clone());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::InvalidDecode));
        assert!(pipeline.window().is_empty());
        assert!(pipeline.sink().lines.is_empty());

        pipeline.set_config(IntakeConfig {
            hide_bad_decodes: false,
            ..IntakeConfig::default()
        });
        assert!(pipeline.process(bad).is_accepted());
    }

    #[test]
    fn payloads_below_floor_never_reach_fuzzy_check() {
        let mut pipeline = recording_pipeline();
        pipeline.process(page(1));
        for len in 0..50 {
            let outcome = pipeline.process(PagerMessage::new("K".repeat(len), true, 100 + len as u64));
            assert_eq!(outcome.reject_reason(), Some(RejectReason::TooShort));
        }
        assert_eq!(pipeline.window().len(), 1);
    }

    #[test]
    fn noisy_repeat_is_caught_even_with_hash_dedup_disabled() {
        let mut pipeline = IntakePipeline::new(
            IntakeConfig {
                deduplicate: false,
                ..IntakeConfig::default()
            },
            RecordingSink::default(),
        );
        pipeline.process(page(1));

        let framed = format!("{}##", page(1).payload());
        let outcome = pipeline.process(PagerMessage::new(framed, true, 77));
        assert_eq!(outcome.reject_reason(), Some(RejectReason::FuzzyDuplicate));

        let exact = pipeline.process(page(1));
        assert_eq!(exact.reject_reason(), Some(RejectReason::FuzzyDuplicate));
    }

    #[test]
    fn persistence_failure_keeps_message_in_memory() {
        let mut pipeline = IntakePipeline::new(IntakeConfig::default(), FailingSink);

        let outcome = pipeline.process(page(1));
        match outcome {
            IntakeOutcome::Accepted(acceptance) => {
                assert!(acceptance.persist_error.unwrap().contains("denied"));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }

        assert!(pipeline.process(page(2)).is_accepted());
        assert_eq!(pipeline.window().len(), 2);
        assert_eq!(pipeline.metrics().snapshot().persist_failures, 2);
    }

    #[test]
    fn clear_empties_window_and_bumps_revision() {
        let mut pipeline = recording_pipeline();
        pipeline.process(page(1));
        pipeline.process(page(2));
        let before = pipeline.snapshot().revision;

        assert_eq!(pipeline.clear(), 2);
        assert!(pipeline.window().is_empty());
        assert!(pipeline.snapshot().revision > before);
        assert_eq!(pipeline.sink().lines.len(), 2);

        assert!(pipeline.process(page(1)).is_accepted());
    }
}
