//! Integration tests for CLI
//!
//! These run the built binary for the sub-commands that need no network.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    // Empty working directory so no stray config.toml is picked up
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_geocoder-cli"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("GEOCODER_SIGNING_KEY")
        .env_remove("GEOCODER_GEOCODING__SIGNING_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn sign_prints_reference_url() {
    let output = run(&[
        "sign",
        "--key",
        "vNIXE0xscrmjlyV-12Nj_BvUPaw=",
        "http://maps.googleapis.com/maps/api/geocode/json?address=New+York&sensor=false&client=clientID",
    ]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "http://maps.googleapis.com/maps/api/geocode/json?address=New+York&sensor=false\
         &client=clientID&signature=KrU1TzVQM7Ur0i8i7K3huiw3MsA="
    );
}

#[test]
fn sign_without_key_fails() {
    let output = run(&["sign", "http://example.com/geocode/xml?address=x"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("signing key is required"));
}

#[test]
fn sign_with_invalid_key_fails() {
    let output = run(&["sign", "-k", "%%%", "http://example.com/geocode/xml?address=x"]);
    assert!(!output.status.success());
}

#[test]
fn distance_between_coordinates() {
    let output = run(&["distance", "0,0", "0,1"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("From:     0.00000,0.00000"));
    assert!(text.contains("Distance: 110950.6 m"));
}

#[test]
fn missing_explicit_config_fails() {
    let output = run(&["--config", "/nonexistent/geocoder.toml", "distance", "0,0", "0,1"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_subcommand_fails() {
    let output = run(&["teleport"]);
    assert!(!output.status.success());
}
