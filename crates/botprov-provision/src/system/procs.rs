use crate::ports::{Cmd, CommandRunner, ProcessKiller};
use async_trait::async_trait;
use botprov_core::AppError;
use std::sync::Arc;

/// Finds processes with `pgrep -f` and sends them SIGKILL.
///
/// The installer's own pid and its parent are never signalled, even when
/// their command lines contain the pattern (e.g. `--install-dir /opt/userbot`).
pub struct PgrepKiller {
    runner: Arc<dyn CommandRunner>,
}

impl PgrepKiller {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

fn own_pids() -> Vec<u32> {
    let mut pids = vec![std::process::id()];
    #[cfg(unix)]
    pids.push(std::os::unix::process::parent_id());
    pids
}

/// Parse `pgrep` output, dropping anything in `exclude`.
pub fn parse_pids(stdout: &str, exclude: &[u32]) -> Vec<u32> {
    stdout
        .lines()
        .filter_map(|line| line.trim().parse::<u32>().ok())
        .filter(|pid| !exclude.contains(pid))
        .collect()
}

#[async_trait]
impl ProcessKiller for PgrepKiller {
    async fn kill_matching(&self, pattern: &str) -> Result<usize, AppError> {
        let find = Cmd::new("pgrep").args(["-f", pattern]);
        let out = self.runner.run(&find).await?;
        // pgrep exits 1 when nothing matched.
        if out.status == Some(1) {
            return Ok(0);
        }
        let out = out.check(&find)?;

        let pids = parse_pids(&out.stdout, &own_pids());
        if pids.is_empty() {
            return Ok(0);
        }

        let kill = Cmd::new("kill")
            .arg("-KILL")
            .args(pids.iter().map(|p| p.to_string()));
        // Processes may exit between pgrep and kill; a partial failure is fine.
        let _ = self.runner.run(&kill).await?;
        Ok(pids.len())
    }
}
