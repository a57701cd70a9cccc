use crate::ports::{Cmd, CommandOutput, CommandRunner};
use async_trait::async_trait;
use botprov_core::AppError;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs commands with `tokio::process`. There is no timeout: package
/// installs can take as long as they take and the operator can interrupt.
pub struct TokioCommandRunner;

fn command(cmd: &Cmd) -> Command {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    if let Some(dir) = &cmd.cwd {
        command.current_dir(dir);
    }
    for (key, value) in &cmd.env {
        command.env(key, value);
    }
    command
}

fn spawn_error(cmd: &Cmd, source: std::io::Error) -> AppError {
    AppError::Spawn {
        program: cmd.program.clone(),
        source,
    }
}

fn captured(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> CommandOutput {
    CommandOutput {
        status: status.code(),
        stdout: String::from_utf8_lossy(stdout).into_owned(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, cmd: &Cmd) -> Result<CommandOutput, AppError> {
        let output = command(cmd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(cmd, e))?;
        Ok(captured(output.status, &output.stdout, &output.stderr))
    }

    async fn run_with_stdin(&self, cmd: &Cmd, input: &[u8]) -> Result<CommandOutput, AppError> {
        let mut child = command(cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(cmd, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input).await?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        let output = child.wait_with_output().await?;
        Ok(captured(output.status, &output.stdout, &output.stderr))
    }

    async fn run_foreground(&self, cmd: &Cmd) -> Result<Option<i32>, AppError> {
        let mut command = command(cmd);
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Ctrl+C reaches the whole foreground process group. The installer
        // ignores it only while the child runs; the child gets the default back.
        #[cfg(unix)]
        let _sigint = {
            // SAFETY: the closure runs between fork and exec and only calls
            // the async-signal-safe signal(2).
            unsafe {
                command.pre_exec(|| {
                    libc::signal(libc::SIGINT, libc::SIG_DFL);
                    Ok(())
                });
            }
            IgnoreSigint::install()
        };

        let mut child = command.spawn().map_err(|e| spawn_error(cmd, e))?;
        let status = child.wait().await?;
        Ok(status.code())
    }
}

/// Ignores SIGINT for this process until dropped, then restores the
/// previous disposition.
#[cfg(unix)]
struct IgnoreSigint {
    previous: libc::sighandler_t,
}

#[cfg(unix)]
impl IgnoreSigint {
    fn install() -> Self {
        // SAFETY: swapping a signal disposition has no memory-safety preconditions.
        let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for IgnoreSigint {
    fn drop(&mut self) {
        if self.previous != libc::SIG_ERR {
            // SAFETY: restores the disposition saved in `install`.
            unsafe {
                libc::signal(libc::SIGINT, self.previous);
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Cmd {
        Cmd::new("sh").args(["-c", script])
    }

    #[tokio::test]
    async fn run_maps_exit_codes() {
        let out = TokioCommandRunner.run(&sh("echo out; echo err >&2; exit 3")).await.unwrap();
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert!(!out.success());

        let ok = TokioCommandRunner.run(&sh("true")).await.unwrap();
        assert!(ok.success());
    }

    #[tokio::test]
    async fn run_reports_signal_death_as_no_status() {
        let out = TokioCommandRunner.run(&sh("kill -KILL $$")).await.unwrap();
        assert_eq!(out.status, None);
        assert!(out.check(&sh("kill -KILL $$")).is_err());
    }

    #[tokio::test]
    async fn run_applies_cwd_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = sh("pwd; echo $BOTPROV_TEST_VAR").cwd(dir.path()).env("BOTPROV_TEST_VAR", "set");
        let out = TokioCommandRunner.run(&cmd).await.unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        let mut lines = out.stdout.lines();
        assert_eq!(lines.next().map(std::path::PathBuf::from), Some(canonical));
        assert_eq!(lines.next(), Some("set"));
    }

    #[tokio::test]
    async fn run_with_stdin_feeds_input() {
        let out = TokioCommandRunner
            .run_with_stdin(&Cmd::new("cat"), b"echo from stdin\n")
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "echo from stdin\n");

        let piped = TokioCommandRunner
            .run_with_stdin(&sh("sh -"), b"exit 4\n")
            .await
            .unwrap();
        assert_eq!(piped.status, Some(4));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = TokioCommandRunner
            .run(&Cmd::new("botprov-no-such-program"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Spawn { ref program, .. } if program == "botprov-no-such-program"));
    }

    #[tokio::test]
    async fn foreground_child_keeps_default_sigint_and_installer_restores_it() {
        // A shell that inherited an ignored SIGINT could not be killed by it
        // and would exit 0 instead.
        let status = TokioCommandRunner
            .run_foreground(&sh("kill -INT $$; exit 0"))
            .await
            .unwrap();
        assert_eq!(status, None);

        let status = TokioCommandRunner.run_foreground(&sh("exit 5")).await.unwrap();
        assert_eq!(status, Some(5));

        // SAFETY: reads the disposition back by swapping in the default.
        let current = unsafe { libc::signal(libc::SIGINT, libc::SIG_DFL) };
        assert_eq!(current, libc::SIG_DFL);
    }
}
