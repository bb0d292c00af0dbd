#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use cardroom::EngineConfig;

// Logging is auto-installed for every test binary that declares `mod common`
#[ctor::ctor]
fn init_logging() {
    cardroom_test_support::logging::init();
}

/// Deterministic config with a short bot delay and the default vote window.
pub fn seeded_config(seed: u64) -> EngineConfig {
    EngineConfig {
        rng_seed: Some(seed),
        bot_delay: time::Duration::milliseconds(10),
        ..EngineConfig::default()
    }
}
