use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const IDL: &str = include_str!("../../../idl/solana_pinocchio_starter.json");

fn clientgen(dir: &Path) -> Command {
    let mut command = Command::cargo_bin("clientgen").unwrap();
    command
        .current_dir(dir)
        .env_remove("CLIENTGEN_IDL")
        .env_remove("CLIENTGEN_TS_OUTPUT")
        .env_remove("CLIENTGEN_RUST_OUTPUT")
        .env("RUST_LOG", "off");
    command
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("idl")).unwrap();
    fs::write(dir.path().join("idl/solana_pinocchio_starter.json"), IDL).unwrap();
    dir
}

#[test]
fn missing_language_prints_usage() {
    let dir = workspace();
    clientgen(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage: clientgen <typescript|rust|all>"));
}

#[test]
fn unknown_language_is_rejected() {
    let dir = workspace();
    clientgen(dir.path())
        .arg("cobol")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown language: cobol"));

    assert!(!dir.path().join("ts").exists());
}

#[test]
fn typescript_client_is_written() {
    let dir = workspace();
    let output = dir.path().join("client");
    clientgen(dir.path())
        .arg("typescript")
        .arg("--ts-output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ TypeScript client generated in"));

    assert!(output.join("index.ts").exists());
    assert!(output.join("instructions/tapeCreate.ts").exists());
    assert!(!dir.path().join("rust").exists());
}

#[test]
fn rust_client_uses_the_default_paths() {
    let dir = workspace();
    clientgen(dir.path())
        .arg("rust")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✅ Rust client generated in ./rust/generated!",
        ));

    assert!(dir.path().join("rust/generated/mod.rs").exists());
    assert!(dir.path().join("rust/generated/errors/tape.rs").exists());
}

#[test]
fn all_is_an_unknown_language() {
    let dir = workspace();
    clientgen(dir.path())
        .arg("all")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown language: all"));

    assert!(!dir.path().join("ts").exists());
    assert!(!dir.path().join("rust").exists());
}

#[test]
fn print_writes_nothing() {
    let dir = workspace();
    clientgen(dir.path())
        .arg("rust")
        .arg("--print")
        .assert()
        .success()
        .stdout(predicate::str::contains("pub const TAPE_ID: Pubkey"));

    assert!(!dir.path().join("rust").exists());
}

#[test]
fn invalid_idl_fails_generation() {
    let dir = workspace();
    fs::write(dir.path().join("broken.json"), "{ \"instructions\": ").unwrap();
    clientgen(dir.path())
        .arg("typescript")
        .arg("--idl")
        .arg("broken.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Generation failed:"));

    assert!(!dir.path().join("ts").exists());
}

#[test]
fn missing_idl_fails_generation() {
    let dir = tempfile::tempdir().unwrap();
    clientgen(dir.path())
        .arg("rust")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Generation failed: could not read"));
}
