//! Narrow capability interfaces the workflow drives.
//!
//! Each external tool (apt, NodeSource, git, npm, pm2, process table, the
//! operator's terminal) sits behind one trait so the workflow can run
//! against fakes in tests.

use async_trait::async_trait;
use botprov_core::AppError;
use std::fmt;
use std::path::{Path, PathBuf};

/// An external command line: program, arguments, optional cwd and extra env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Cmd {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into [`AppError::Command`] carrying the stderr tail.
    pub fn check(self, cmd: &Cmd) -> Result<CommandOutput, AppError> {
        if self.success() {
            return Ok(self);
        }
        Err(AppError::Command {
            program: cmd.to_string(),
            status: self.status.unwrap_or(-1),
            stderr: tail(&self.stderr, 20),
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion with stdout/stderr captured. A non-zero exit is not an error here.
    async fn run(&self, cmd: &Cmd) -> Result<CommandOutput, AppError>;

    /// Same as [`CommandRunner::run`] with `input` fed to stdin.
    async fn run_with_stdin(&self, cmd: &Cmd, input: &[u8]) -> Result<CommandOutput, AppError>;

    /// Run attached to the operator's terminal and return the exit code.
    async fn run_foreground(&self, cmd: &Cmd) -> Result<Option<i32>, AppError>;
}

#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn update_index(&self) -> Result<(), AppError>;
    async fn install(&self, packages: &[String]) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersions {
    pub node: String,
    pub npm: String,
}

#[async_trait]
pub trait RuntimeInstaller: Send + Sync {
    /// Install the given Node.js major line.
    async fn install(&self, major: u32) -> Result<(), AppError>;
    async fn versions(&self) -> Result<RuntimeVersions, AppError>;
}

#[async_trait]
pub trait SourceControl: Send + Sync {
    async fn clone_repo(&self, url: &str, dir: &Path) -> Result<(), AppError>;
    async fn pull(&self, dir: &Path) -> Result<(), AppError>;
}

#[async_trait]
pub trait AppPackages: Send + Sync {
    async fn install(&self, dir: &Path) -> Result<(), AppError>;
    /// Rebuild one native dependency against the installed runtime.
    async fn rebuild(&self, dir: &Path, dependency: &str) -> Result<(), AppError>;
    /// Start the application attached to the terminal; returns its exit code.
    async fn start_foreground(&self, dir: &Path) -> Result<Option<i32>, AppError>;
}

#[async_trait]
pub trait ServiceSupervisor: Send + Sync {
    async fn install(&self) -> Result<(), AppError>;
    async fn stop(&self, name: &str) -> Result<(), AppError>;
    async fn delete(&self, name: &str) -> Result<(), AppError>;
    async fn start(&self, config: &Path) -> Result<(), AppError>;
    /// Persist the current process list.
    async fn save(&self) -> Result<(), AppError>;
    /// Install the boot-time autostart hook for `user`.
    async fn startup(&self, user: &str, home: &Path) -> Result<(), AppError>;
    async fn install_module(&self, module: &str) -> Result<(), AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProcessKiller: Send + Sync {
    /// Kill every process whose command line matches `pattern`; returns how many were signalled.
    async fn kill_matching(&self, pattern: &str) -> Result<usize, AppError>;
}

/// The person at the terminal.
pub trait Operator: Send + Sync {
    fn confirm(&self, question: &str) -> Result<bool, AppError>;
    fn pause(&self, message: &str) -> Result<(), AppError>;
}

pub trait HostIdentity: Send + Sync {
    fn effective_uid(&self) -> u32;
}

/// All capabilities the workflow needs, injected as one value.
pub struct Host {
    pub identity: Box<dyn HostIdentity>,
    pub operator: Box<dyn Operator>,
    pub packages: Box<dyn PackageInstaller>,
    pub runtime: Box<dyn RuntimeInstaller>,
    pub source: Box<dyn SourceControl>,
    pub app: Box<dyn AppPackages>,
    pub supervisor: Box<dyn ServiceSupervisor>,
    pub killer: Box<dyn ProcessKiller>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = Cmd::new("pgrep").args(["-f", "npm start"]);
        assert_eq!(cmd.to_string(), "pgrep -f 'npm start'");
    }

    #[test]
    fn check_keeps_only_stderr_tail() {
        let stderr: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let out = CommandOutput {
            status: Some(100),
            stdout: String::new(),
            stderr,
        };
        let cmd = Cmd::new("apt-get").arg("update");
        match out.check(&cmd) {
            Err(AppError::Command {
                program,
                status,
                stderr,
            }) => {
                assert_eq!(program, "apt-get update");
                assert_eq!(status, 100);
                assert!(stderr.starts_with("line 11"));
                assert!(stderr.ends_with("line 30"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn signal_exit_is_reported_as_minus_one() {
        let out = CommandOutput {
            status: None,
            ..CommandOutput::default()
        };
        let err = out.check(&Cmd::new("npm")).unwrap_err();
        assert!(matches!(err, AppError::Command { status: -1, .. }));
    }
}
