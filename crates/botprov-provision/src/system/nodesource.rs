use super::apt::apt_get;
use crate::ports::{Cmd, CommandRunner, RuntimeInstaller, RuntimeVersions};
use async_trait::async_trait;
use botprov_core::AppError;
use std::sync::Arc;

const NODESOURCE_BASE: &str = "https://deb.nodesource.com";

/// Node.js from the NodeSource apt repository, pinned to one major line.
pub struct NodeSource {
    runner: Arc<dyn CommandRunner>,
    client: reqwest::Client,
}

impl NodeSource {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("botprov/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { runner, client })
    }

    async fn fetch_setup_script(&self, major: u32) -> Result<String, AppError> {
        let url = setup_script_url(major);
        let script = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(script)
    }

    async fn version_of(&self, program: &str) -> Result<String, AppError> {
        let cmd = Cmd::new(program).arg("--version");
        let out = self.runner.run(&cmd).await?.check(&cmd)?;
        Ok(out.stdout.trim().to_string())
    }
}

pub fn setup_script_url(major: u32) -> String {
    format!("{NODESOURCE_BASE}/setup_{major}.x")
}

#[async_trait]
impl RuntimeInstaller for NodeSource {
    async fn install(&self, major: u32) -> Result<(), AppError> {
        let script = self.fetch_setup_script(major).await?;

        let setup = Cmd::new("bash").arg("-");
        self.runner
            .run_with_stdin(&setup, script.as_bytes())
            .await?
            .check(&setup)?;

        let install = apt_get().args(["install", "-y", "nodejs"]);
        self.runner.run(&install).await?.check(&install)?;
        Ok(())
    }

    async fn versions(&self) -> Result<RuntimeVersions, AppError> {
        Ok(RuntimeVersions {
            node: self.version_of("node").await?,
            npm: self.version_of("npm").await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::setup_script_url;

    #[test]
    fn setup_url_is_pinned_to_major() {
        assert_eq!(setup_script_url(20), "https://deb.nodesource.com/setup_20.x");
        assert_eq!(setup_script_url(22), "https://deb.nodesource.com/setup_22.x");
    }
}
