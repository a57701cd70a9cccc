pub mod progress;
pub mod prompt;
pub mod report;

pub use progress::{emit, spinner, warn, ProgressTx};
