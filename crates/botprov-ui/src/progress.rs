use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Optional transcript channel threaded through the workflow.
pub type ProgressTx = Option<UnboundedSender<String>>;

/// Print a message to stdout and optionally send it through a channel.
///
/// From the CLI `tx` is `None` and this just prints. Tests and embedding
/// front ends pass `Some(sender)` to capture the transcript.
pub fn emit(tx: &ProgressTx, msg: &str) {
    println!("{msg}");
    if let Some(tx) = tx {
        let _ = tx.send(msg.to_string());
    }
}

/// Like [`emit`], styled as a warning. The channel gets the plain text.
pub fn warn(tx: &ProgressTx, msg: &str) {
    println!("{}", style(msg).yellow());
    if let Some(tx) = tx {
        let _ = tx.send(msg.to_string());
    }
}

/// Create a spinner with a message.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_and_warn_forward_plain_text() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let tx = Some(tx);
        emit(&tx, "[Step 1/9] Checking privileges...");
        warn(&tx, "  pm2 stop failed (ignored)");
        assert_eq!(rx.try_recv().unwrap(), "[Step 1/9] Checking privileges...");
        assert_eq!(rx.try_recv().unwrap(), "  pm2 stop failed (ignored)");
        assert!(rx.try_recv().is_err());
    }
}
