pub mod daily_log;

pub use daily_log::{DailyLog, LineEnding, DEFAULT_LOG_DIR};
