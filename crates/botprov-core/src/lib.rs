pub mod config;
pub mod ecosystem;
pub mod error;
pub mod record;

pub use config::SetupConfig;
pub use error::AppError;
