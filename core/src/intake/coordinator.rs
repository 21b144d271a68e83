//! Single-owner task that serialises all intake work.
//!
//! The decoder calls [`IntakeHandle::submit`] from whatever thread it runs
//! on. Each call becomes a command on an unbounded channel; the coordinator
//! task drains that channel and runs every command to completion before
//! taking the next, so the window and the log only ever see one writer.
//!
//! ```text
//! decoder thread ──submit──┐
//! HTTP bridge ──clear/cfg──┼──> mpsc ──> IntakeCoordinator ──┬──> watch<WindowSnapshot>
//!                          │             (IntakePipeline)    └──> broadcast<IntakeEvent>
//! ```

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::decoder_interface::PagerMessage;
use crate::intake::pipeline::IntakePipeline;
use crate::intake::window::WindowSnapshot;
use crate::prelude::{IntakeConfig, IntakeError, IntakeOutcome, IntakeResult, MessageSink};
use crate::telemetry::{IntakeMetrics, MetricsSnapshot};

const EVENT_BUFFER: usize = 64;

enum IntakeCommand {
    Submit(PagerMessage),
    Clear,
    UpdateConfig(IntakeConfig),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Notification sent after each command that touches the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    Processed { hash: u64, outcome: IntakeOutcome },
    Cleared { dropped: usize },
}

pub struct IntakeCoordinator<S> {
    pipeline: IntakePipeline<S>,
    commands: mpsc::UnboundedReceiver<IntakeCommand>,
    snapshots: watch::Sender<WindowSnapshot>,
    config: watch::Sender<IntakeConfig>,
    events: broadcast::Sender<IntakeEvent>,
}

impl<S: MessageSink + Send + 'static> IntakeCoordinator<S> {
    pub fn new(pipeline: IntakePipeline<S>) -> (Self, IntakeHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(pipeline.snapshot());
        let (config_tx, config_rx) = watch::channel(pipeline.config().clone());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = IntakeHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            config: config_rx,
            events: event_tx.clone(),
            metrics: pipeline.metrics(),
        };
        let coordinator = Self {
            pipeline,
            commands: command_rx,
            snapshots: snapshot_tx,
            config: config_tx,
            events: event_tx,
        };
        (coordinator, handle)
    }

    /// Spawns the coordinator on the current tokio runtime.
    ///
    /// The join handle yields the pipeline back once the task stops.
    pub fn spawn(pipeline: IntakePipeline<S>) -> (IntakeHandle, JoinHandle<IntakePipeline<S>>) {
        let (coordinator, handle) = Self::new(pipeline);
        (handle, tokio::spawn(coordinator.run()))
    }

    /// Processes commands until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> IntakePipeline<S> {
        info!("intake coordinator started");
        while let Some(command) = self.commands.recv().await {
            match command {
                IntakeCommand::Submit(message) => {
                    let hash = message.hash();
                    let outcome = self.pipeline.process(message);
                    if outcome.is_accepted() {
                        self.publish_snapshot();
                    }
                    let _ = self.events.send(IntakeEvent::Processed { hash, outcome });
                }
                IntakeCommand::Clear => {
                    let dropped = self.pipeline.clear();
                    self.publish_snapshot();
                    let _ = self.events.send(IntakeEvent::Cleared { dropped });
                }
                IntakeCommand::UpdateConfig(config) => {
                    debug!("intake config updated: {:?}", config);
                    self.pipeline.set_config(config.clone());
                    self.config.send_replace(config);
                }
                IntakeCommand::Flush(ack) => {
                    let _ = ack.send(());
                }
                IntakeCommand::Shutdown => break,
            }
        }
        info!("intake coordinator stopped");
        self.pipeline
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(self.pipeline.snapshot());
    }
}

/// Cloneable, thread-safe entry point to a running coordinator.
#[derive(Clone)]
pub struct IntakeHandle {
    commands: mpsc::UnboundedSender<IntakeCommand>,
    snapshots: watch::Receiver<WindowSnapshot>,
    config: watch::Receiver<IntakeConfig>,
    events: broadcast::Sender<IntakeEvent>,
    metrics: Arc<IntakeMetrics>,
}

impl IntakeHandle {
    /// Queues a decoded message. Never blocks and needs no runtime context,
    /// so it is safe to call straight from a decoder callback thread.
    pub fn submit(&self, message: PagerMessage) -> IntakeResult<()> {
        self.send(IntakeCommand::Submit(message))
    }

    pub fn clear(&self) -> IntakeResult<()> {
        self.send(IntakeCommand::Clear)
    }

    pub fn update_config(&self, config: IntakeConfig) -> IntakeResult<()> {
        self.send(IntakeCommand::UpdateConfig(config))
    }

    pub fn shutdown(&self) -> IntakeResult<()> {
        self.send(IntakeCommand::Shutdown)
    }

    /// Resolves once every command queued before it has been processed.
    pub async fn flush(&self) -> IntakeResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(IntakeCommand::Flush(ack_tx))?;
        ack_rx.await.map_err(|_| IntakeError::Closed)
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn watch_window(&self) -> watch::Receiver<WindowSnapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> IntakeConfig {
        self.config.borrow().clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn send(&self, command: IntakeCommand) -> IntakeResult<()> {
        self.commands.send(command).map_err(|_| IntakeError::Closed)
    }
}
