use crate::error::AppError;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_INSTALL_DIR: &str = "/opt/userbot";
pub const DEFAULT_SERVICE_NAME: &str = "userbot";
pub const DEFAULT_REPO_URL: &str = "https://github.com/userbot-org/userbot.git";
pub const DEFAULT_NODE_MAJOR: u32 = 20;
pub const DEFAULT_NATIVE_REBUILD: &str = "sharp";
pub const DEFAULT_SUPERVISOR_USER: &str = "root";
pub const DEFAULT_LOGROTATE_MAX_SIZE: &str = "10M";
pub const DEFAULT_LOGROTATE_RETAIN: u32 = 7;
pub const DEFAULT_STATE_DIR: &str = "/var/lib/botprov";
pub const DEFAULT_SETTLE_SECS: u64 = 2;

/// Packages needed to build the bot's native modules (sharp links against libvips).
pub const DEFAULT_APT_PACKAGES: &[&str] = &["build-essential", "git", "curl", "libvips", "libvips-dev"];

/// npm and node-gyp caches left behind by earlier installs.
pub const DEFAULT_CACHE_PATHS: &[&str] = &["/root/.npm/_cacache", "/root/.cache/node-gyp"];

pub const SUPERVISOR_CONFIG_FILE: &str = "ecosystem.config.js";
pub const LOGS_SUBDIR: &str = "logs";
pub const LOGROTATE_MODULE: &str = "pm2-logrotate";

/// Everything the setup workflow needs to know about the target host.
///
/// Built once at startup and passed by reference to every stage, so tests
/// can point it at a temporary directory and a throwaway service name.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub install_dir: PathBuf,
    pub service_name: String,
    pub repo_url: String,
    pub runtime_major: u32,
    pub apt_packages: Vec<String>,
    pub native_rebuild: String,
    pub cache_paths: Vec<PathBuf>,
    pub kill_patterns: Vec<String>,
    pub settle_delay: Duration,
    pub supervisor_user: String,
    pub supervisor_home: PathBuf,
    pub logrotate_max_size: String,
    pub logrotate_retain: u32,
    /// Session file the bot writes after a successful login, if known.
    pub session_path: Option<PathBuf>,
    pub state_dir: PathBuf,
    /// Accept the cleanup prompt without asking.
    pub assume_yes: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            runtime_major: DEFAULT_NODE_MAJOR,
            apt_packages: DEFAULT_APT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            native_rebuild: DEFAULT_NATIVE_REBUILD.to_string(),
            cache_paths: DEFAULT_CACHE_PATHS.iter().map(PathBuf::from).collect(),
            kill_patterns: default_kill_patterns(DEFAULT_SERVICE_NAME),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            supervisor_user: DEFAULT_SUPERVISOR_USER.to_string(),
            supervisor_home: supervisor_home(DEFAULT_SUPERVISOR_USER),
            logrotate_max_size: DEFAULT_LOGROTATE_MAX_SIZE.to_string(),
            logrotate_retain: DEFAULT_LOGROTATE_RETAIN,
            session_path: None,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            assume_yes: false,
        }
    }
}

/// Command-line patterns matching stray bot processes: the service name
/// itself and the foreground start invocation.
pub fn default_kill_patterns(service_name: &str) -> Vec<String> {
    vec![service_name.to_string(), "npm start".to_string()]
}

/// Home directory passed to `pm2 startup --hp`. Root's home is fixed;
/// any other account is assumed to live under /home.
pub fn supervisor_home(user: &str) -> PathBuf {
    if user == "root" {
        return PathBuf::from("/root");
    }
    match dirs::home_dir() {
        Some(home) if home.ends_with(user) => home,
        _ => Path::new("/home").join(user),
    }
}

/// Cleanup deletes these paths recursively: they must be absolute, free of
/// `..` (which could walk back up to `/`), and name something below the root.
fn check_removable(label: &str, path: &Path) -> Result<(), AppError> {
    if !path.is_absolute() {
        return Err(AppError::InvalidConfig(format!(
            "{label} {} must be an absolute path",
            path.display()
        )));
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(AppError::InvalidConfig(format!(
            "{label} {} must not contain '..'",
            path.display()
        )));
    }
    if !path.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(AppError::InvalidConfig(format!(
            "{label} must not be the filesystem root"
        )));
    }
    Ok(())
}

impl SetupConfig {
    /// install_dir/logs
    pub fn logs_dir(&self) -> PathBuf {
        self.install_dir.join(LOGS_SUBDIR)
    }

    /// install_dir/ecosystem.config.js
    pub fn supervisor_config_path(&self) -> PathBuf {
        self.install_dir.join(SUPERVISOR_CONFIG_FILE)
    }

    /// install_dir/.git
    pub fn git_dir(&self) -> PathBuf {
        self.install_dir.join(".git")
    }

    /// state_dir/installs
    pub fn installs_dir(&self) -> PathBuf {
        self.state_dir.join("installs")
    }

    /// Session file location with relative paths resolved against the install dir.
    pub fn resolved_session_path(&self) -> Option<PathBuf> {
        self.session_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.install_dir.join(p)
            }
        })
    }

    /// Reject configurations that would make cleanup or pm2 registration unsafe.
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.service_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidConfig("service name is empty".into()));
        }
        if name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(AppError::InvalidConfig(format!(
                "service name '{name}' must not contain whitespace or '/'"
            )));
        }
        check_removable("install dir", &self.install_dir)?;
        for cache in &self.cache_paths {
            check_removable("cache path", cache)?;
        }
        if self.runtime_major == 0 {
            return Err(AppError::InvalidConfig("node major version must be > 0".into()));
        }
        if self.repo_url.trim().is_empty() {
            return Err(AppError::InvalidConfig("repository URL is empty".into()));
        }
        if self.kill_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(AppError::InvalidConfig("empty process kill pattern".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SetupConfig::default().validate().unwrap();
    }

    #[test]
    fn derived_paths_live_under_install_dir() {
        let cfg = SetupConfig {
            install_dir: PathBuf::from("/srv/bot"),
            ..SetupConfig::default()
        };
        assert_eq!(cfg.logs_dir(), PathBuf::from("/srv/bot/logs"));
        assert_eq!(
            cfg.supervisor_config_path(),
            PathBuf::from("/srv/bot/ecosystem.config.js")
        );
        assert_eq!(cfg.git_dir(), PathBuf::from("/srv/bot/.git"));
    }

    #[test]
    fn rejects_root_and_relative_install_dirs() {
        let root = SetupConfig {
            install_dir: PathBuf::from("/"),
            ..SetupConfig::default()
        };
        assert!(matches!(root.validate(), Err(AppError::InvalidConfig(_))));

        for escaping in ["/opt/..", "/tmp/../", "/a/b/../..", "/opt/../srv/bot", "/.", "//"] {
            let cfg = SetupConfig {
                install_dir: PathBuf::from(escaping),
                ..SetupConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(AppError::InvalidConfig(_))),
                "accepted {escaping:?}"
            );
        }

        let relative = SetupConfig {
            install_dir: PathBuf::from("bot"),
            ..SetupConfig::default()
        };
        assert!(matches!(relative.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_cache_paths_that_escape_to_root() {
        for bad in ["/root/..", "/", "relative/cache"] {
            let cfg = SetupConfig {
                cache_paths: vec![PathBuf::from("/root/.npm"), PathBuf::from(bad)],
                ..SetupConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(AppError::InvalidConfig(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_service_names_pm2_cannot_address() {
        for bad in ["", "   ", "my bot", "a/b"] {
            let cfg = SetupConfig {
                service_name: bad.to_string(),
                ..SetupConfig::default()
            };
            assert!(cfg.validate().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn relative_session_path_resolves_against_install_dir() {
        let cfg = SetupConfig {
            install_dir: PathBuf::from("/srv/bot"),
            session_path: Some(PathBuf::from("session/bot.session")),
            ..SetupConfig::default()
        };
        assert_eq!(
            cfg.resolved_session_path(),
            Some(PathBuf::from("/srv/bot/session/bot.session"))
        );
    }

    #[test]
    fn root_supervisor_home_is_fixed() {
        assert_eq!(supervisor_home("root"), PathBuf::from("/root"));
    }
}
