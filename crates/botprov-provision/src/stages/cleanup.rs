use crate::stage::{Outcome, Tier};
use crate::workflow::Workflow;
use botprov_core::AppError;
use botprov_ui::progress;
use std::path::Path;

impl Workflow<'_> {
    /// Ask, then remove every trace of a previous install. Each removal is
    /// best-effort: "nothing to clean" must never abort the run.
    pub(crate) async fn cleanup(&mut self) -> Result<Outcome, AppError> {
        let cfg = self.cfg;
        let accepted = cfg.assume_yes
            || self.host.operator.confirm(&format!(
                "Remove any existing installation at {} and the '{}' pm2 service?",
                cfg.install_dir.display(),
                cfg.service_name
            ))?;
        if !accepted {
            progress::emit(&self.tx, "  Keeping existing installation");
            return Ok(Outcome::Skipped);
        }

        let name = &cfg.service_name;
        let stopped = self.host.supervisor.stop(name).await;
        if Tier::Tolerated
            .settle(&self.tx, &format!("pm2 stop {name}"), stopped)?
            .is_some()
        {
            progress::emit(&self.tx, &format!("  Stopped pm2 service '{name}'"));
        }
        let deleted = self.host.supervisor.delete(name).await;
        if Tier::Tolerated
            .settle(&self.tx, &format!("pm2 delete {name}"), deleted)?
            .is_some()
        {
            progress::emit(&self.tx, &format!("  Removed '{name}' from pm2"));
        }

        for pattern in &cfg.kill_patterns {
            let killed = self.host.killer.kill_matching(pattern).await;
            match Tier::Tolerated.settle(&self.tx, &format!("kill '{pattern}'"), killed)? {
                Some(0) => progress::emit(&self.tx, &format!("  No processes matching '{pattern}'")),
                Some(n) => progress::emit(&self.tx, &format!("  Killed {n} process(es) matching '{pattern}'")),
                None => {}
            }
        }

        if !cfg.settle_delay.is_zero() {
            tokio::time::sleep(cfg.settle_delay).await;
        }

        self.remove_path(&cfg.install_dir).await?;
        for cache in &cfg.cache_paths {
            self.remove_path(cache).await?;
        }

        Ok(Outcome::Done)
    }

    async fn remove_path(&self, path: &Path) -> Result<(), AppError> {
        if !path.exists() {
            return Ok(());
        }
        let removed = if path.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        let label = format!("remove {}", path.display());
        if Tier::Tolerated
            .settle(&self.tx, &label, removed.map_err(AppError::from))?
            .is_some()
        {
            progress::emit(&self.tx, &format!("  Removed {}", path.display()));
        }
        Ok(())
    }
}
