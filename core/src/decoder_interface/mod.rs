pub mod control;
pub mod message;

pub use control::{forward_filter_depths, BaudRate, DecoderControl, FilterDepths};
pub use message::PagerMessage;
