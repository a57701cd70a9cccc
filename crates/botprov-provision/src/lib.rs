pub mod ports;
pub mod stage;
mod stages;
pub mod system;
pub mod workflow;

pub use ports::Host;
pub use stage::{Outcome, Stage, StageReport, Tier};
pub use workflow::{SetupReport, Workflow};
