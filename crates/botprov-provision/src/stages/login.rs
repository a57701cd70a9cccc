use crate::stage::Outcome;
use crate::workflow::Workflow;
use botprov_core::AppError;
use botprov_ui::progress;
use botprov_ui::report::login_instructions;

impl Workflow<'_> {
    /// Run the bot in the foreground once so the operator can log in.
    ///
    /// A non-zero exit is the normal way out (Ctrl+C after login), so the
    /// error returned here is tolerated by the stage tier.
    pub(crate) async fn first_run_login(&mut self) -> Result<Outcome, AppError> {
        for line in login_instructions(self.cfg) {
            progress::emit(&self.tx, &line);
        }
        self.host.operator.pause("Press Enter to start the bot")?;

        let result = self.host.app.start_foreground(&self.cfg.install_dir).await;
        self.state.login_exit_code = result.as_ref().ok().copied().flatten();
        self.check_session();

        match result? {
            Some(0) => Ok(Outcome::Done),
            Some(code) => Err(AppError::provision(
                "first-run login",
                format!("npm start exited with status {code}"),
            )),
            None => Err(AppError::provision(
                "first-run login",
                "npm start was terminated by a signal",
            )),
        }
    }

    /// Warn, without gating, when the configured session file never appeared.
    fn check_session(&self) {
        let Some(path) = self.cfg.resolved_session_path() else {
            return;
        };
        if path.exists() {
            progress::emit(&self.tx, &format!("  Session file found: {}", path.display()));
        } else {
            progress::warn(
                &self.tx,
                &format!(
                    "  Session file {} not found; login may not have completed",
                    path.display()
                ),
            );
        }
    }
}
