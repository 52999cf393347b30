// src/commands/version.rs
use std::process::ExitCode;

use crate::config::TRACK_ERRORS;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn make_version_string() -> String {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    let errors = if TRACK_ERRORS { ", track-errors" } else { "" };
    format!("{VERSION} ({profile}{errors})")
}

pub fn version_string() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(make_version_string)
}

pub fn print_version() -> ExitCode {
    println!("rankfix {}", version_string());
    ExitCode::SUCCESS
}
