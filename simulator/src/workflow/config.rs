use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pocsag_core::persistence::{DailyLog, LineEnding, DEFAULT_LOG_DIR};
use pocsag_core::IntakeConfig;
use serde::{Deserialize, Serialize};

use crate::generator::traffic::TrafficConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub intake: IntakeConfig,
    pub log_dir: PathBuf,
    pub line_ending: LineEnding,
    pub bind: SocketAddr,
    pub traffic: TrafficConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            intake: IntakeConfig::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            line_ending: LineEnding::default(),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            traffic: TrafficConfig::default(),
        }
    }
}

impl StationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading station config {}", path_ref.display()))?;
        let config: StationConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing station config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(messages: usize, seed: u64) -> Self {
        let mut config = Self::default();
        config.traffic.messages = messages;
        config.traffic.seed = seed;
        config
    }

    pub fn daily_log(&self) -> DailyLog {
        DailyLog::new(&self.log_dir, self.line_ending)
    }
}
