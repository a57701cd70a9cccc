use crate::ports::{HostIdentity, Operator};
use botprov_core::AppError;
use botprov_ui::prompt;

/// Prompts on the controlling terminal.
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn confirm(&self, question: &str) -> Result<bool, AppError> {
        prompt::confirm(question)
    }

    fn pause(&self, message: &str) -> Result<(), AppError> {
        prompt::pause(message)
    }
}

/// Identity of the running process.
pub struct ProcessIdentity;

impl HostIdentity for ProcessIdentity {
    #[cfg(unix)]
    fn effective_uid(&self) -> u32 {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() }
    }

    #[cfg(not(unix))]
    fn effective_uid(&self) -> u32 {
        u32::MAX
    }
}
