pub mod log;
pub mod metrics;

pub use self::log::IntakeLog;
pub use self::metrics::{IntakeMetrics, MetricsSnapshot};
