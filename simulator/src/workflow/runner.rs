use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use pocsag_core::decoder_interface::forward_filter_depths;
use pocsag_core::intake::IntakeCoordinator;
use pocsag_core::persistence::DailyLog;
use pocsag_core::telemetry::MetricsSnapshot;
use pocsag_core::{IntakeHandle, IntakePipeline, WindowSnapshot};
use tokio::task::{self, JoinHandle};

use crate::generator::traffic::{DepthControl, TrafficGenerator};
use crate::workflow::config::StationConfig;

pub struct RunSummary {
    pub sent: usize,
    pub snapshot: WindowSnapshot,
    pub metrics: MetricsSnapshot,
    pub log_path: PathBuf,
}

#[derive(Clone)]
pub struct Runner {
    config: StationConfig,
    decoder: DepthControl,
}

impl Runner {
    pub fn new(config: StationConfig) -> Self {
        let mut decoder = DepthControl::default();
        forward_filter_depths(&config.intake.filter_depths, &mut decoder);
        Self { config, decoder }
    }

    pub fn decoder(&self) -> DepthControl {
        self.decoder.clone()
    }

    /// Spawns the intake coordinator. Must run inside a tokio runtime.
    pub fn start(&self) -> (IntakeHandle, JoinHandle<IntakePipeline<DailyLog>>) {
        let pipeline = IntakePipeline::new(self.config.intake.clone(), self.config.daily_log());
        IntakeCoordinator::spawn(pipeline)
    }

    /// Feeds synthetic decoder traffic from a blocking thread and waits for
    /// the coordinator to drain it.
    pub async fn execute(&self, handle: &IntakeHandle) -> anyhow::Result<RunSummary> {
        let traffic = self.config.traffic.clone();
        let count = traffic.messages;
        let interval = Duration::from_millis(traffic.interval_ms);
        let generator = TrafficGenerator::new(traffic, self.decoder.clone());
        let decoder_handle = handle.clone();

        let sent = task::spawn_blocking(move || -> anyhow::Result<usize> {
            let mut sent = 0;
            for message in generator.take(count) {
                decoder_handle
                    .submit(message)
                    .context("submitting decoded message")?;
                sent += 1;
                if !interval.is_zero() {
                    thread::sleep(interval);
                }
            }
            Ok(sent)
        })
        .await
        .context("joining decoder thread")??;

        handle.flush().await.context("flushing intake coordinator")?;

        Ok(RunSummary {
            sent,
            snapshot: handle.snapshot(),
            metrics: handle.metrics(),
            log_path: self.config.daily_log().path_for(Local::now().date_naive()),
        })
    }
}
