use crate::stage::{Outcome, Tier};
use crate::workflow::Workflow;
use botprov_core::config::LOGROTATE_MODULE;
use botprov_core::ecosystem::EcosystemConfig;
use botprov_core::record::InstallRecord;
use botprov_core::AppError;
use botprov_ui::progress;
use chrono::Utc;
use std::path::PathBuf;

impl Workflow<'_> {
    pub(crate) async fn register_service(&mut self) -> Result<Outcome, AppError> {
        let cfg = self.cfg;
        let supervisor = &self.host.supervisor;

        let sp = progress::spinner("Installing pm2...");
        let installed = supervisor.install().await;
        sp.finish_and_clear();
        installed.map_err(|e| AppError::provision("pm2 install", e))?;

        let config_path = cfg.supervisor_config_path();
        EcosystemConfig::for_setup(cfg).write(&config_path)?;
        progress::emit(&self.tx, &format!("  Wrote {}", config_path.display()));
        tokio::fs::create_dir_all(cfg.logs_dir()).await?;

        supervisor
            .start(&config_path)
            .await
            .map_err(|e| AppError::provision("pm2 start", e))?;
        progress::emit(&self.tx, &format!("  Started '{}'", cfg.service_name));

        supervisor
            .save()
            .await
            .map_err(|e| AppError::provision("pm2 save", e))?;
        supervisor
            .startup(&cfg.supervisor_user, &cfg.supervisor_home)
            .await
            .map_err(|e| AppError::provision("pm2 startup", e))?;
        progress::emit(
            &self.tx,
            &format!("  Process list saved; autostart enabled for {}", cfg.supervisor_user),
        );

        let saved = self.save_record();
        self.state.record_path = Tier::Tolerated.settle(&self.tx, "saving install record", saved)?;

        Ok(Outcome::Done)
    }

    pub(crate) async fn configure_log_rotation(&mut self) -> Result<Outcome, AppError> {
        let cfg = self.cfg;
        let supervisor = &self.host.supervisor;

        supervisor
            .install_module(LOGROTATE_MODULE)
            .await
            .map_err(|e| AppError::provision("pm2 install pm2-logrotate", e))?;

        let settings = [
            ("max_size", cfg.logrotate_max_size.clone()),
            ("retain", cfg.logrotate_retain.to_string()),
        ];
        for (key, value) in settings {
            let key = format!("{LOGROTATE_MODULE}:{key}");
            supervisor
                .set(&key, &value)
                .await
                .map_err(|e| AppError::provision("pm2 set", e))?;
            progress::emit(&self.tx, &format!("  {key} = {value}"));
        }
        Ok(Outcome::Done)
    }

    fn save_record(&self) -> Result<PathBuf, AppError> {
        let cfg = self.cfg;
        let versions = self.state.versions.as_ref();
        let record = InstallRecord {
            id: uuid::Uuid::new_v4().to_string(),
            service_name: cfg.service_name.clone(),
            install_dir: cfg.install_dir.display().to_string(),
            repo_url: cfg.repo_url.clone(),
            runtime_major: cfg.runtime_major,
            node_version: versions.map(|v| v.node.clone()),
            npm_version: versions.map(|v| v.npm.clone()),
            source: self.state.source,
            login_exit_code: self.state.login_exit_code,
            created_at: Utc::now(),
        };
        let path = record.save(&cfg.installs_dir())?;
        progress::emit(&self.tx, &format!("  Install record: {}", path.display()));
        Ok(path)
    }
}
