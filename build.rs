//! Build script for annex.
//!
//! Emits feature-configuration notes for users integrating annex into
//! their projects.

use std::env;

fn main() {
    // Re-run if features change
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PARKING_LOT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LOG");

    let parking_lot_enabled = env::var("CARGO_FEATURE_PARKING_LOT").is_ok();
    let log_enabled = env::var("CARGO_FEATURE_LOG").is_ok();

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let is_release = profile == "release";

    if parking_lot_enabled {
        emit_info("Using parking_lot for table locks (faster lock implementation)");
    } else if is_release {
        emit_note("Tip: consider enabling 'parking_lot' for better lock performance:");
        emit_note("  annex = { version = \"0.3\", features = [\"parking_lot\"] }");
    }

    if log_enabled {
        emit_info("Log integration enabled - table traffic is recorded at trace level");
    }
}

fn emit_info(msg: &str) {
    println!("cargo:warning=[annex] {}", msg);
}

fn emit_note(msg: &str) {
    println!("cargo:warning=[annex]    {}", msg);
}
