//! End-to-end checks of the `botprov` binary that need neither root nor network.

use assert_cmd::Command;
use predicates::prelude::*;

fn botprov(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("botprov").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BOTPROV_ASSUME_YES")
        .env_remove("BOTPROV_SERVICE_NAME")
        .env_remove("BOTPROV_INSTALL_DIR");
    cmd
}

#[test]
fn setup_failure_is_reported_once_with_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = botprov(&dir)
        .args(["--service-name", "bad name", "--install-dir"])
        .arg(dir.path().join("app"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Setup failed at step 1").count(), 1, "{stderr}");
    assert!(!stderr.contains("Error:"), "{stderr}");
    assert!(!dir.path().join("app").exists());
}

#[test]
fn escaping_install_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    botprov(&dir)
        .args(["render-config", "--install-dir", "/opt/.."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not contain '..'"));
}

#[test]
fn render_config_prints_pm2_ecosystem() {
    let dir = tempfile::tempdir().unwrap();
    botprov(&dir)
        .args(["render-config", "--service-name", "mybot", "--install-dir", "/srv/mybot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("module.exports = {"))
        .stdout(predicate::str::contains("\"name\": \"mybot\""))
        .stdout(predicate::str::contains("\"cwd\": \"/srv/mybot\""))
        .stdout(predicate::str::contains("\"restart_delay\": 4000"));
}
