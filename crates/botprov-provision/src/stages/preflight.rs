use crate::stage::Outcome;
use crate::workflow::Workflow;
use botprov_core::AppError;
use botprov_ui::progress;

impl Workflow<'_> {
    /// Nothing on the host is touched before this passes.
    pub(crate) fn root_check(&self) -> Result<Outcome, AppError> {
        let uid = self.host.identity.effective_uid();
        if uid != 0 {
            return Err(AppError::NotSuperuser(uid));
        }
        self.cfg.validate()?;
        progress::emit(&self.tx, "  Running as root");
        Ok(Outcome::Done)
    }
}
