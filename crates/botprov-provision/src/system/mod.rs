//! Production implementations of the capability ports, all built on
//! [`TokioCommandRunner`].

mod apt;
mod git;
mod nodesource;
mod npm;
mod pm2;
mod procs;
mod runner;
mod terminal;

pub use apt::Apt;
pub use git::Git;
pub use nodesource::{setup_script_url, NodeSource};
pub use npm::Npm;
pub use pm2::Pm2;
pub use procs::{parse_pids, PgrepKiller};
pub use runner::TokioCommandRunner;
pub use terminal::{ProcessIdentity, TerminalOperator};

use crate::ports::{CommandRunner, Host};
use botprov_core::AppError;
use std::sync::Arc;

/// Wire every port to the real system tools.
pub fn system_host() -> Result<Host, AppError> {
    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner);
    Ok(Host {
        identity: Box::new(ProcessIdentity),
        operator: Box::new(TerminalOperator),
        packages: Box::new(Apt::new(runner.clone())),
        runtime: Box::new(NodeSource::new(runner.clone())?),
        source: Box::new(Git::new(runner.clone())),
        app: Box::new(Npm::new(runner.clone())),
        supervisor: Box::new(Pm2::new(runner.clone())),
        killer: Box::new(PgrepKiller::new(runner)),
    })
}
