//! Integration test: the binary reports its version.

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_vgrid"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected output to contain version '{}', but got: {}",
        env!("CARGO_PKG_VERSION"),
        stdout
    );
}

#[test]
fn zero_min_item_width_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_vgrid"))
        .args(["--min-item-width", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
