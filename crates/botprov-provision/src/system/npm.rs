use crate::ports::{AppPackages, Cmd, CommandRunner};
use async_trait::async_trait;
use botprov_core::AppError;
use std::path::Path;
use std::sync::Arc;

pub struct Npm {
    runner: Arc<dyn CommandRunner>,
}

impl Npm {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

fn rebuild_cmd(dir: &Path, dependency: &str) -> Cmd {
    Cmd::new("npm").args(["rebuild", dependency]).cwd(dir)
}

#[async_trait]
impl AppPackages for Npm {
    async fn install(&self, dir: &Path) -> Result<(), AppError> {
        let cmd = Cmd::new("npm").arg("install").cwd(dir);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn rebuild(&self, dir: &Path, dependency: &str) -> Result<(), AppError> {
        let cmd = rebuild_cmd(dir, dependency);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn start_foreground(&self, dir: &Path) -> Result<Option<i32>, AppError> {
        let cmd = Cmd::new("npm").arg("start").cwd(dir);
        self.runner.run_foreground(&cmd).await
    }
}
