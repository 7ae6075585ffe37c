use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn billed(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("billed").unwrap();
    cmd.env("BILLED_CONFIG_DIR", config).env_remove("RUST_LOG");
    cmd
}

/// A config dir with an initialized database under a sibling data dir.
fn setup() -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config");
    let data = tmp.path().join("data");
    billed(&config)
        .args(["init", "--data-dir", data.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("billed.db"));
    (tmp, config)
}

fn login(config: &Path, email: &str, role: &str) {
    billed(config)
        .args(["login", "--email", email, "--role", role, "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Signed in as {email}")));
}

fn file_report(tmp: &TempDir, config: &Path, receipt: &str) -> assert_cmd::assert::Assert {
    let file = tmp.path().join(receipt);
    std::fs::write(&file, [137u8, 80, 78, 71]).unwrap();
    billed(config)
        .args([
            "new",
            "--file",
            file.to_str().unwrap(),
            "--type",
            "Transports",
            "--name",
            "Taxi gare",
            "--amount",
            "42.5",
            "--date",
            "2004-04-04",
            "--vat",
            "20",
        ])
        .assert()
}

#[test]
fn test_status_before_login() {
    let (_tmp, config) = setup();
    billed(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(signed out)"))
        .stdout(predicate::str::contains("Reports:    0"));
}

#[test]
fn test_protected_screen_without_session_shows_login() {
    let (_tmp, config) = setup();
    billed(&config)
        .args(["open", "#employee/bills"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[form-employee]"));
}

#[test]
fn test_employee_files_a_report() {
    let (tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");

    file_report(&tmp, &config, "ticket.png")
        .success()
        .stdout(predicate::str::contains("Report sent."))
        .stdout(predicate::str::contains("Taxi gare"))
        .stdout(predicate::str::contains("4 Avr. 04"))
        .stdout(predicate::str::contains("En attente"));

    billed(&config)
        .arg("open")
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi gare"))
        .stdout(predicate::str::contains("[form-employee]").not());
}

#[test]
fn test_rejected_proof_is_not_sent() {
    let (tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");

    file_report(&tmp, &config, "ticket.pdf")
        .failure()
        .stderr(predicate::str::contains(
            "Seuls les fichiers jpg, jpeg et png sont acceptés.",
        ));

    billed(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reports:    0"));
}

#[test]
fn test_admin_reviews_a_report() {
    let (tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");
    file_report(&tmp, &config, "ticket.jpg").success();

    login(&config, "boss@company.tld", "admin");
    let listing = billed(&config)
        .args(["review", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane doe"))
        .get_output()
        .stdout
        .clone();
    let listing = String::from_utf8(listing).unwrap();
    let id = listing
        .lines()
        .find_map(|line| line.strip_prefix("[open-bill"))
        .and_then(|rest| rest.split(']').next())
        .unwrap()
        .to_string();

    billed(&config)
        .args(["review", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi gare"))
        .stdout(predicate::str::contains("[bill-proof-container]"));

    billed(&config)
        .args(["review", "refuse", &id, "--comment", "pas de TVA"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Report {id} refused.")));

    billed(&config)
        .args(["review", "accept", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown report: nope"));
}

#[test]
fn test_employee_cannot_open_dashboard() {
    let (_tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");
    billed(&config)
        .args(["review", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin session"));
}

#[test]
fn test_login_rejects_wrong_password() {
    let (_tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");
    billed(&config).arg("logout").assert().success();

    billed(&config)
        .args([
            "login",
            "--email",
            "jane.doe@company.tld",
            "--role",
            "employee",
            "--password",
            "guess",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    billed(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(signed out)"));
}

#[test]
fn test_logout_returns_to_login() {
    let (_tmp, config) = setup();
    login(&config, "jane.doe@company.tld", "employee");
    billed(&config).arg("logout").assert().success();
    billed(&config)
        .arg("open")
        .assert()
        .success()
        .stdout(predicate::str::contains("[form-admin]"));
}
