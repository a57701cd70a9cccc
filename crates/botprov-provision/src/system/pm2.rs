use crate::ports::{Cmd, CommandRunner, ServiceSupervisor};
use async_trait::async_trait;
use botprov_core::AppError;
use std::path::Path;
use std::sync::Arc;

/// The pm2 process manager, installed globally through npm.
pub struct Pm2 {
    runner: Arc<dyn CommandRunner>,
}

impl Pm2 {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn pm2(&self, args: &[&str]) -> Result<(), AppError> {
        let cmd = Cmd::new("pm2").args(args.iter().copied());
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }
}

fn startup_args(user: &str, home: &Path) -> Vec<String> {
    vec![
        "startup".to_string(),
        "systemd".to_string(),
        "-u".to_string(),
        user.to_string(),
        "--hp".to_string(),
        home.display().to_string(),
    ]
}

#[async_trait]
impl ServiceSupervisor for Pm2 {
    async fn install(&self) -> Result<(), AppError> {
        let cmd = Cmd::new("npm").args(["install", "-g", "pm2"]);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), AppError> {
        self.pm2(&["stop", name]).await
    }

    async fn delete(&self, name: &str) -> Result<(), AppError> {
        self.pm2(&["delete", name]).await
    }

    async fn start(&self, config: &Path) -> Result<(), AppError> {
        let config = config.display().to_string();
        self.pm2(&["start", config.as_str()]).await
    }

    async fn save(&self) -> Result<(), AppError> {
        self.pm2(&["save"]).await
    }

    async fn startup(&self, user: &str, home: &Path) -> Result<(), AppError> {
        let cmd = Cmd::new("pm2").args(startup_args(user, home));
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn install_module(&self, module: &str) -> Result<(), AppError> {
        self.pm2(&["install", module]).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.pm2(&["set", key, value]).await
    }
}
