use crate::stage::Outcome;
use crate::workflow::Workflow;
use botprov_core::record::SourceAction;
use botprov_core::AppError;
use botprov_ui::progress;

impl Workflow<'_> {
    /// Clone or fast-forward the bot, then install its dependencies.
    pub(crate) async fn setup_application(&mut self) -> Result<Outcome, AppError> {
        let cfg = self.cfg;
        let dir = cfg.install_dir.as_path();
        tokio::fs::create_dir_all(dir).await?;

        let action = if cfg.git_dir().is_dir() {
            progress::emit(&self.tx, &format!("  Updating existing checkout in {}", dir.display()));
            self.host
                .source
                .pull(dir)
                .await
                .map_err(|e| AppError::provision("git pull", e))?;
            SourceAction::Pulled
        } else {
            progress::emit(&self.tx, &format!("  Cloning {} into {}", cfg.repo_url, dir.display()));
            self.host
                .source
                .clone_repo(&cfg.repo_url, dir)
                .await
                .map_err(|e| AppError::provision("git clone", e))?;
            SourceAction::Cloned
        };
        self.state.source = Some(action);

        let sp = progress::spinner("Installing application dependencies...");
        let installed = self.host.app.install(dir).await;
        sp.finish_and_clear();
        installed.map_err(|e| AppError::provision("npm install", e))?;
        progress::emit(&self.tx, "  Dependencies installed");

        let native = &cfg.native_rebuild;
        let sp = progress::spinner(&format!("Rebuilding {native}..."));
        let rebuilt = self.host.app.rebuild(dir, native).await;
        sp.finish_and_clear();
        rebuilt.map_err(|e| AppError::provision("npm rebuild", e))?;
        progress::emit(&self.tx, &format!("  Rebuilt {native} for this host"));

        Ok(Outcome::Done)
    }
}
