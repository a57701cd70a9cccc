use crate::stage::Outcome;
use crate::workflow::Workflow;
use botprov_core::AppError;
use botprov_ui::progress;

impl Workflow<'_> {
    pub(crate) async fn install_dependencies(&mut self) -> Result<Outcome, AppError> {
        let packages = &self.cfg.apt_packages;

        let sp = progress::spinner("Updating package index...");
        let updated = self.host.packages.update_index().await;
        sp.finish_and_clear();
        updated.map_err(|e| AppError::provision("apt-get update", e))?;

        let sp = progress::spinner(&format!("Installing {}...", packages.join(" ")));
        let installed = self.host.packages.install(packages).await;
        sp.finish_and_clear();
        installed.map_err(|e| AppError::provision("apt-get install", e))?;

        progress::emit(&self.tx, &format!("  Installed: {}", packages.join(", ")));
        Ok(Outcome::Done)
    }

    pub(crate) async fn install_runtime(&mut self) -> Result<Outcome, AppError> {
        let major = self.cfg.runtime_major;

        let sp = progress::spinner(&format!("Installing Node.js {major}.x from NodeSource..."));
        let installed = self.host.runtime.install(major).await;
        sp.finish_and_clear();
        installed.map_err(|e| AppError::provision("node install", e))?;

        // Version output is informational only.
        match self.host.runtime.versions().await {
            Ok(v) => {
                progress::emit(&self.tx, &format!("  Node.js: {}", v.node));
                progress::emit(&self.tx, &format!("  npm:     {}", v.npm));
                self.state.versions = Some(v);
            }
            Err(e) => progress::warn(&self.tx, &format!("  Could not read installed versions: {e}")),
        }
        Ok(Outcome::Done)
    }
}
