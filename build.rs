// ClockTimerEmulator - Build Script
//
// Stamps the version string and forwards build-time clock options.

use std::env;
use std::process::Command;

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=VERSION_STRING=ClockTimer v{}-g{}", version, git_hash);

    // Fixed output frequency: CLOCK_FREQ=<hz> disables the potentiometer sampler
    let clock_freq = env::var("CLOCK_FREQ").unwrap_or_default();
    if !clock_freq.is_empty() && clock_freq.parse::<u32>().is_err() {
        panic!("CLOCK_FREQ must be an unsigned integer, got {:?}", clock_freq);
    }
    println!("cargo:rustc-env=CLOCK_FREQ_HZ={}", clock_freq);
    println!("cargo:rerun-if-env-changed=CLOCK_FREQ");

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
}
