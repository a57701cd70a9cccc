use botprov_core::AppError;
use botprov_ui::progress::{self, ProgressTx};

/// The nine setup stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RootCheck,
    Cleanup,
    Dependencies,
    Runtime,
    Application,
    FirstRunLogin,
    Supervisor,
    LogRotation,
    Summary,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::RootCheck,
        Stage::Cleanup,
        Stage::Dependencies,
        Stage::Runtime,
        Stage::Application,
        Stage::FirstRunLogin,
        Stage::Supervisor,
        Stage::LogRotation,
        Stage::Summary,
    ];

    pub fn number(self) -> u32 {
        Stage::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(0, |i| i as u32 + 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::RootCheck => "Checking privileges",
            Stage::Cleanup => "Cleaning up previous installation",
            Stage::Dependencies => "Installing system packages",
            Stage::Runtime => "Installing Node.js",
            Stage::Application => "Setting up the application",
            Stage::FirstRunLogin => "First-run login",
            Stage::Supervisor => "Registering with pm2",
            Stage::LogRotation => "Configuring log rotation",
            Stage::Summary => "Done",
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            // The operator ends the foreground run with Ctrl+C once logged in.
            Stage::FirstRunLogin => Tier::Tolerated,
            _ => Tier::Fatal,
        }
    }

    pub fn header(self) -> String {
        format!(
            "\n[Step {}/{}] {}...",
            self.number(),
            Stage::ALL.len(),
            self.title()
        )
    }
}

/// How a failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Abort the run.
    Fatal,
    /// Report a warning and carry on.
    Tolerated,
}

impl Tier {
    /// Propagate or swallow `result` according to the tier. A swallowed
    /// failure is reported on the progress channel and yields `Ok(None)`.
    pub fn settle<T>(
        self,
        tx: &ProgressTx,
        label: &str,
        result: Result<T, AppError>,
    ) -> Result<Option<T>, AppError> {
        match (self, result) {
            (_, Ok(value)) => Ok(Some(value)),
            (Tier::Fatal, Err(e)) => Err(e),
            (Tier::Tolerated, Err(e)) => {
                progress::warn(tx, &format!("  {label} failed (ignored): {e}"));
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The operator declined; nothing was changed.
    Skipped,
    /// Failed in the tolerated tier; carries the error text.
    Tolerated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: Outcome,
}
