use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the application source arrived in the install dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceAction {
    Cloned,
    Pulled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRecord {
    pub id: String,
    pub service_name: String,
    pub install_dir: String,
    pub repo_url: String,
    pub runtime_major: u32,
    pub node_version: Option<String>,
    pub npm_version: Option<String>,
    pub source: Option<SourceAction>,
    /// Exit code of the foreground login run; `None` if it was interrupted.
    pub login_exit_code: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl InstallRecord {
    /// Save as `<dir>/<id>.json`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, AppError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", self.id));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
