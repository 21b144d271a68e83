use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::StationConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "POCSAG message intake monitor")]
struct Args {
    /// Load a station config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for the daily message logs
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Synthetic decoder messages to push through the pipeline (0 to skip)
    #[arg(long)]
    messages: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Keep exact repeats (interior-slice matching still applies)
    #[arg(long, default_value_t = false)]
    no_dedupe: bool,
    /// Keep decodes the decoder flagged as bad
    #[arg(long, default_value_t = false)]
    show_bad: bool,
    #[arg(long, default_value_t = false)]
    multiline: bool,
    /// Keep the HTTP bridge alive for a display and live ingest
    #[arg(long, default_value_t = false)]
    serve: bool,
}

impl Args {
    fn station_config(&self) -> anyhow::Result<StationConfig> {
        let mut config = match &self.config {
            Some(path) => StationConfig::load(path)?,
            None => StationConfig::default(),
        };
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(messages) = self.messages {
            config.traffic.messages = messages;
        }
        if let Some(seed) = self.seed {
            config.traffic.seed = seed;
        }
        if self.no_dedupe {
            config.intake.deduplicate = false;
        }
        if self.show_bad {
            config.intake.hide_bad_decodes = false;
        }
        if self.multiline {
            config.intake.multiline_payload = true;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.station_config()?;

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;
    runtime.block_on(run(config, args.serve))
}

async fn run(config: StationConfig, serve: bool) -> anyhow::Result<()> {
    let runner = Runner::new(config.clone());
    let (handle, coordinator) = runner.start();
    let gui_bridge = GuiBridge::new(handle.clone(), runner.decoder());

    if serve {
        let (addr, _server) = gui_bridge.serve(config.bind)?;
        gui_bridge.publish_status(&format!("HTTP bridge listening on http://{}", addr));
    }

    if config.traffic.messages > 0 {
        let summary = runner.execute(&handle).await?;
        println!(
            "Traffic run -> sent {}, accepted {}, rejected {} (invalid {}, short {}, hash dup {}, fuzzy dup {}), window {}, log {}",
            summary.sent,
            summary.metrics.accepted,
            summary.metrics.rejected(),
            summary.metrics.rejected_invalid,
            summary.metrics.rejected_short,
            summary.metrics.rejected_hash_duplicate,
            summary.metrics.rejected_fuzzy_duplicate,
            summary.snapshot.messages.len(),
            summary.log_path.display()
        );
        if summary.metrics.persist_failures > 0 {
            println!(
                "{} accepted message(s) could not be written to the log",
                summary.metrics.persist_failures
            );
        }
    }

    if serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
    }

    handle.shutdown().context("stopping intake coordinator")?;
    coordinator.await.context("joining intake coordinator")?;
    Ok(())
}
