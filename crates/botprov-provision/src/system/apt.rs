use crate::ports::{Cmd, CommandRunner, PackageInstaller};
use async_trait::async_trait;
use botprov_core::AppError;
use std::sync::Arc;

/// `apt-get` with prompts disabled.
pub struct Apt {
    runner: Arc<dyn CommandRunner>,
}

impl Apt {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

pub(crate) fn apt_get() -> Cmd {
    Cmd::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
}

fn install_cmd(packages: &[String]) -> Cmd {
    apt_get().args(["install", "-y"]).args(packages.iter().cloned())
}

#[async_trait]
impl PackageInstaller for Apt {
    async fn update_index(&self) -> Result<(), AppError> {
        let cmd = apt_get().arg("update");
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }

    async fn install(&self, packages: &[String]) -> Result<(), AppError> {
        if packages.is_empty() {
            return Ok(());
        }
        let cmd = install_cmd(packages);
        self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_noninteractive() {
        let cmd = install_cmd(&["git".to_string(), "libvips-dev".to_string()]);
        assert_eq!(cmd.to_string(), "apt-get install -y git libvips-dev");
        assert!(cmd
            .env
            .contains(&("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())));
    }
}
