use botprov_core::SetupConfig;
use std::path::Path;

/// Printed by the bot once the interactive login has gone through.
pub const LOGIN_SUCCESS_MARKER: &str = "Login successful";

/// Instructions shown before the foreground first-run login.
pub fn login_instructions(cfg: &SetupConfig) -> Vec<String> {
    let divider = "=".repeat(60);
    vec![
        String::new(),
        divider.clone(),
        "  First-run login".to_string(),
        divider.clone(),
        "  The bot will now start in the foreground so you can log in.".to_string(),
        String::new(),
        "  1. Get your API ID and API hash from https://my.telegram.org".to_string(),
        "     (API development tools).".to_string(),
        "  2. Enter your phone number in international format,".to_string(),
        "     including the country code, e.g. +14155552671.".to_string(),
        "  3. Enter the login code sent to your Telegram app.".to_string(),
        format!("  4. Wait for \"{LOGIN_SUCCESS_MARKER}\", then press Ctrl+C."),
        String::new(),
        format!("  Working directory: {}", cfg.install_dir.display()),
        divider,
    ]
}

/// Final summary with the pm2 commands the operator will need.
pub fn completion_lines(cfg: &SetupConfig, record_path: Option<&Path>) -> Vec<String> {
    let divider = "=".repeat(60);
    let name = &cfg.service_name;
    let mut lines = vec![
        String::new(),
        divider.clone(),
        format!("  {name} installation complete"),
        divider.clone(),
        format!("  Directory:        {}", cfg.install_dir.display()),
        format!("  Supervisor file:  {}", cfg.supervisor_config_path().display()),
        format!("  Logs:             {}", cfg.logs_dir().display()),
    ];
    if let Some(path) = record_path {
        lines.push(format!("  Install record:   {}", path.display()));
    }
    lines.extend([
        String::new(),
        "  Manage the bot with pm2:".to_string(),
        format!("    pm2 status {name}         # process status"),
        format!("    pm2 logs {name}           # stream logs"),
        format!("    pm2 logs {name} --lines 100  # tail recent output"),
        format!("    pm2 restart {name}        # restart"),
        format!("    pm2 stop {name}           # stop"),
        format!("    pm2 delete {name}         # remove from pm2"),
        divider,
    ]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn completion_lists_every_management_command() {
        let cfg = SetupConfig {
            service_name: "mybot".into(),
            install_dir: PathBuf::from("/srv/mybot"),
            ..SetupConfig::default()
        };
        let text = completion_lines(&cfg, None).join("\n");
        assert!(text.contains("/srv/mybot"));
        for verb in ["status", "logs", "restart", "stop", "delete"] {
            assert!(text.contains(&format!("pm2 {verb} mybot")), "missing {verb}");
        }
        assert!(text.contains("--lines 100"));
        assert!(!text.contains("Install record"));
    }

    #[test]
    fn completion_shows_record_path_when_saved() {
        let cfg = SetupConfig::default();
        let path = PathBuf::from("/var/lib/botprov/installs/abc.json");
        let text = completion_lines(&cfg, Some(&path)).join("\n");
        assert!(text.contains("/var/lib/botprov/installs/abc.json"));
    }

    #[test]
    fn login_instructions_name_success_marker() {
        let text = login_instructions(&SetupConfig::default()).join("\n");
        assert!(text.contains("my.telegram.org"));
        assert!(text.contains("country code"));
        assert!(text.contains(LOGIN_SUCCESS_MARKER));
    }
}
