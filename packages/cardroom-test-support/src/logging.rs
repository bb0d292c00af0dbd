//! Test logging for integration test binaries.
//!
//! Same precedence as the unit-test bootstrap:
//!
//! 1. `TEST_LOG`
//! 2. `RUST_LOG`
//! 3. `"warn"`
//!
//! Safe to call from every test; only the first call installs a subscriber.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
