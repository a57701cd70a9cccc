//! pm2 ecosystem file for the bot.
//!
//! pm2 loads `ecosystem.config.js` as a CommonJS module, so the file is the
//! pretty-printed JSON model behind a `module.exports =` prefix.

use crate::config::SetupConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const MAX_RESTARTS: u32 = 10;
pub const MIN_UPTIME: &str = "10s";
pub const RESTART_DELAY_MS: u64 = 4000;
pub const LOG_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss Z";

const EXPORT_PREFIX: &str = "module.exports = ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemConfig {
    pub apps: Vec<AppEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    pub name: String,
    pub script: String,
    pub args: String,
    pub cwd: String,
    pub out_file: String,
    pub error_file: String,
    pub merge_logs: bool,
    pub time: bool,
    pub log_date_format: String,
    pub autorestart: bool,
    pub max_restarts: u32,
    pub min_uptime: String,
    pub restart_delay: u64,
    pub env: BTreeMap<String, String>,
}

impl EcosystemConfig {
    /// The single-app config registered for `cfg.service_name`.
    pub fn for_setup(cfg: &SetupConfig) -> Self {
        let logs = cfg.logs_dir();
        let mut env = BTreeMap::new();
        env.insert("NODE_ENV".to_string(), "production".to_string());

        Self {
            apps: vec![AppEntry {
                name: cfg.service_name.clone(),
                script: "npm".to_string(),
                args: "start".to_string(),
                cwd: cfg.install_dir.display().to_string(),
                out_file: logs.join("out.log").display().to_string(),
                error_file: logs.join("error.log").display().to_string(),
                merge_logs: true,
                time: true,
                log_date_format: LOG_DATE_FORMAT.to_string(),
                autorestart: true,
                max_restarts: MAX_RESTARTS,
                min_uptime: MIN_UPTIME.to_string(),
                restart_delay: RESTART_DELAY_MS,
                env,
            }],
        }
    }

    pub fn render(&self) -> Result<String, AppError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!("{EXPORT_PREFIX}{json};\n"))
    }

    /// Read back a file produced by [`EcosystemConfig::render`].
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let body = text
            .trim()
            .strip_prefix(EXPORT_PREFIX)
            .and_then(|rest| rest.strip_suffix(';'))
            .ok_or_else(|| AppError::Other("not a generated ecosystem file".into()))?;
        Ok(serde_json::from_str(body)?)
    }

    /// Write the rendered config to `path`, replacing any previous file.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        std::fs::write(path, self.render()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cfg() -> SetupConfig {
        SetupConfig {
            install_dir: PathBuf::from("/opt/testbot"),
            service_name: "testbot".into(),
            ..SetupConfig::default()
        }
    }

    #[test]
    fn declares_restart_policy_and_logging() {
        let eco = EcosystemConfig::for_setup(&cfg());
        assert_eq!(eco.apps.len(), 1);
        let app = &eco.apps[0];
        assert_eq!(app.name, "testbot");
        assert_eq!(app.script, "npm");
        assert_eq!(app.args, "start");
        assert_eq!(app.cwd, "/opt/testbot");
        assert_eq!(app.out_file, "/opt/testbot/logs/out.log");
        assert_eq!(app.error_file, "/opt/testbot/logs/error.log");
        assert!(app.merge_logs);
        assert!(app.time);
        assert!(app.autorestart);
        assert_eq!(app.max_restarts, 10);
        assert_eq!(app.min_uptime, "10s");
        assert_eq!(app.restart_delay, 4000);
        assert_eq!(app.env.len(), 1);
        assert_eq!(app.env.get("NODE_ENV").map(String::as_str), Some("production"));
    }

    #[test]
    fn rendered_file_is_a_commonjs_export() {
        let text = EcosystemConfig::for_setup(&cfg()).render().unwrap();
        assert!(text.starts_with("module.exports = {"));
        assert!(text.ends_with("};\n"));
        assert!(text.contains("\"restart_delay\": 4000"));
    }

    #[test]
    fn parse_reads_back_rendered_file() {
        let eco = EcosystemConfig::for_setup(&cfg());
        let parsed = EcosystemConfig::parse(&eco.render().unwrap()).unwrap();
        assert_eq!(parsed, eco);
    }

    #[test]
    fn parse_rejects_foreign_files() {
        assert!(EcosystemConfig::parse("module.exports = { apps: [] }").is_err());
        assert!(EcosystemConfig::parse("{}").is_err());
    }

    #[test]
    fn write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecosystem.config.js");
        std::fs::write(&path, "x".repeat(10_000)).unwrap();

        let eco = EcosystemConfig::for_setup(&cfg());
        eco.write(&path).unwrap();
        eco.write(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, eco.render().unwrap());
    }
}
