use crate::ports::{Cmd, CommandRunner, SourceControl};
use async_trait::async_trait;
use botprov_core::AppError;
use std::path::Path;
use std::sync::Arc;

pub struct Git {
    runner: Arc<dyn CommandRunner>,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

fn clone_cmd(url: &str, dir: &Path) -> Cmd {
    Cmd::new("git")
        .arg("clone")
        .arg(url)
        .arg(dir.display().to_string())
}

fn pull_cmd(dir: &Path) -> Cmd {
    Cmd::new("git")
        .arg("-C")
        .arg(dir.display().to_string())
        .args(["pull", "--ff-only"])
}

#[async_trait]
impl SourceControl for Git {
    async fn clone_repo(&self, url: &str, dir: &Path) -> Result<(), AppError> {
        let cmd = clone_cmd(url, dir);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn pull(&self, dir: &Path) -> Result<(), AppError> {
        let cmd = pull_cmd(dir);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }
}
