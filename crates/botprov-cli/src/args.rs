use botprov_core::config::{
    self, SetupConfig, DEFAULT_INSTALL_DIR, DEFAULT_LOGROTATE_MAX_SIZE, DEFAULT_LOGROTATE_RETAIN,
    DEFAULT_NATIVE_REBUILD, DEFAULT_NODE_MAJOR, DEFAULT_REPO_URL, DEFAULT_SERVICE_NAME,
    DEFAULT_SETTLE_SECS, DEFAULT_STATE_DIR, DEFAULT_SUPERVISOR_USER,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "botprov",
    version,
    about = "Install the userbot on a Debian/Ubuntu host and keep it running under pm2"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub setup: SetupArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full install: packages → Node.js → app → first login → pm2 → log rotation (default)
    Setup,

    /// Stop the pm2 service, kill stray processes, and delete the install and caches
    Clean,

    /// Print the pm2 ecosystem file setup would write
    RenderConfig,
}

#[derive(Args)]
pub struct SetupArgs {
    /// Directory the bot is cloned into
    #[arg(long, global = true, env = "BOTPROV_INSTALL_DIR", default_value = DEFAULT_INSTALL_DIR)]
    pub install_dir: PathBuf,

    /// pm2 process name
    #[arg(long, global = true, env = "BOTPROV_SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME)]
    pub service_name: String,

    /// Git URL of the bot repository
    #[arg(long, global = true, env = "BOTPROV_REPO_URL", default_value = DEFAULT_REPO_URL)]
    pub repo_url: String,

    /// Node.js major version installed from NodeSource
    #[arg(long, global = true, env = "BOTPROV_NODE_MAJOR", default_value_t = DEFAULT_NODE_MAJOR)]
    pub node_major: u32,

    /// apt packages to install (comma separated); defaults to the build toolchain + libvips
    #[arg(long, global = true, env = "BOTPROV_APT_PACKAGES", value_delimiter = ',')]
    pub apt_packages: Vec<String>,

    /// Native npm dependency rebuilt after install
    #[arg(long, global = true, env = "BOTPROV_NATIVE_REBUILD", default_value = DEFAULT_NATIVE_REBUILD)]
    pub native_rebuild: String,

    /// Cache paths removed during cleanup (comma separated)
    #[arg(long, global = true, env = "BOTPROV_CACHE_PATHS", value_delimiter = ',')]
    pub cache_paths: Vec<PathBuf>,

    /// Seconds to wait after killing stray processes
    #[arg(long, global = true, env = "BOTPROV_SETTLE_SECS", default_value_t = DEFAULT_SETTLE_SECS)]
    pub settle_secs: u64,

    /// Account pm2's boot-time hook runs as
    #[arg(long, global = true, env = "BOTPROV_PM2_USER", default_value = DEFAULT_SUPERVISOR_USER)]
    pub pm2_user: String,

    /// pm2-logrotate max_size
    #[arg(long, global = true, env = "BOTPROV_LOG_MAX_SIZE", default_value = DEFAULT_LOGROTATE_MAX_SIZE)]
    pub log_max_size: String,

    /// pm2-logrotate retain (rotated files kept)
    #[arg(long, global = true, env = "BOTPROV_LOG_RETAIN", default_value_t = DEFAULT_LOGROTATE_RETAIN)]
    pub log_retain: u32,

    /// Session file written by a successful login (relative to the install dir)
    #[arg(long, global = true, env = "BOTPROV_SESSION_PATH")]
    pub session_path: Option<PathBuf>,

    /// Where install records are kept
    #[arg(long, global = true, env = "BOTPROV_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Remove the previous installation without asking
    #[arg(long, short = 'y', global = true, env = "BOTPROV_ASSUME_YES")]
    pub yes: bool,
}

impl SetupArgs {
    pub fn to_config(&self) -> SetupConfig {
        let defaults = SetupConfig::default();
        SetupConfig {
            install_dir: self.install_dir.clone(),
            service_name: self.service_name.clone(),
            repo_url: self.repo_url.clone(),
            runtime_major: self.node_major,
            apt_packages: if self.apt_packages.is_empty() {
                defaults.apt_packages
            } else {
                self.apt_packages.clone()
            },
            native_rebuild: self.native_rebuild.clone(),
            cache_paths: if self.cache_paths.is_empty() {
                defaults.cache_paths
            } else {
                self.cache_paths.clone()
            },
            kill_patterns: config::default_kill_patterns(&self.service_name),
            settle_delay: Duration::from_secs(self.settle_secs),
            supervisor_user: self.pm2_user.clone(),
            supervisor_home: config::supervisor_home(&self.pm2_user),
            logrotate_max_size: self.log_max_size.clone(),
            logrotate_retain: self.log_retain,
            session_path: self.session_path.clone(),
            state_dir: self.state_dir.clone(),
            assume_yes: self.yes,
        }
    }
}
