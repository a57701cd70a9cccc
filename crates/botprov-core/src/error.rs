use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("This installer must be run as root (effective uid {0})")]
    NotSuperuser(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {status}: {stderr}")]
    Command {
        program: String,
        status: i32,
        stderr: String,
    },

    #[error("Provision error ({phase}): {message}")]
    Provision { phase: String, message: String },

    #[error("Setup failed at step {step} ({name}): {message}")]
    SetupFailed {
        step: u32,
        name: String,
        message: String,
    },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Wrap any error as a provisioning failure for `phase`.
    pub fn provision(phase: &str, err: impl std::fmt::Display) -> Self {
        AppError::Provision {
            phase: phase.to_string(),
            message: err.to_string(),
        }
    }
}
