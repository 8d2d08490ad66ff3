//! End-to-end CLI runs against a temporary local database.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use support::{local_config, write_config};

fn dukkan() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dukkan"));
    cmd.env_remove("RUST_LOG").env_remove("DUKKAN_REMOTE_API_KEY");
    cmd
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is a JSON document")
}

#[test]
fn supplier_add_then_list_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    let added = dukkan()
        .arg("--config")
        .arg(&config)
        .args(["--json", "supplier", "add", "ACME", "--phone", "+966500000000"])
        .args(["--email", "a@x.com"])
        .output()
        .unwrap();
    assert!(added.status.success(), "stderr: {}", String::from_utf8_lossy(&added.stderr));
    let added = json_stdout(&added);
    let id = added["supplier"]["id"].as_str().unwrap().to_string();
    assert!(added["account"]["code"].as_str().unwrap().starts_with("AP-"));

    let listed = dukkan()
        .arg("--config")
        .arg(&config)
        .args(["--json", "supplier", "list"])
        .output()
        .unwrap();
    assert!(listed.status.success());
    let listed = json_stdout(&listed);
    let suppliers = listed["suppliers"].as_array().unwrap();
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0]["id"], id.as_str());
    assert_eq!(suppliers[0]["name"], "ACME");
    assert_eq!(suppliers[0]["phone"], "+966500000000");
}

#[test]
fn purchase_then_delete_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    let added = dukkan()
        .arg("-c")
        .arg(&config)
        .args(["--json", "supplier", "add", "Gulf Trading"])
        .output()
        .unwrap();
    let id = json_stdout(&added)["supplier"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    dukkan()
        .arg("-c")
        .arg(&config)
        .args(["supplier", "purchase", &id, "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Purchase recorded"));

    dukkan()
        .arg("-c")
        .arg(&config)
        .args(["supplier", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted supplier Gulf Trading"));

    let listed = dukkan()
        .arg("-c")
        .arg(&config)
        .args(["--json", "supplier", "list"])
        .output()
        .unwrap();
    assert!(json_stdout(&listed)["suppliers"].as_array().unwrap().is_empty());
}

#[test]
fn invalid_email_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    dukkan()
        .arg("-c")
        .arg(&config)
        .args(["customer", "add", "Riyadh Mart", "--email", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid email address"));
}

#[test]
fn unknown_supplier_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    dukkan()
        .arg("-c")
        .arg(&config)
        .args(["supplier", "delete", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("suppliers record not found: missing"));
}

#[test]
fn menu_for_cashier_lists_three_entries() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    let output = dukkan()
        .arg("-c")
        .arg(&config)
        .args(["--json", "menu", "--role", "cashier"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let menu = json_stdout(&output);
    assert_eq!(menu["role"], "cashier");
    let paths: Vec<&str> = menu["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/", "/sales", "/customers"]);
}

#[test]
fn config_validate_reports_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let config = local_config(dir.path());

    dukkan()
        .args(["config", "validate", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("local"));
}

#[test]
fn config_validate_rejects_remote_without_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[persistence]\nstrategy = \"remote\"\n");

    dukkan()
        .args(["config", "validate", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("persistence.remote.base_url"));
}

#[test]
fn config_validate_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();

    dukkan()
        .args(["config", "validate", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}
