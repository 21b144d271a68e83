pub mod coordinator;
pub mod duplicate;
pub mod filter;
pub mod pipeline;
pub mod window;

pub use coordinator::{IntakeCoordinator, IntakeEvent, IntakeHandle};
pub use pipeline::IntakePipeline;
pub use window::{RetentionWindow, WindowSnapshot, WINDOW_CAPACITY};
