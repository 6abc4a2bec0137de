//! Test logging initialization shared by unit and integration tests.
//!
//! The engine's own unit tests reach this through a `ctor` hook in `lib.rs`;
//! integration test binaries install it from `tests/common`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests.
///
/// Idempotent and race-safe: every test binary may call it any number of
/// times. The level comes from, in order:
///
/// 1. `TEST_LOG` (preferred)
/// 2. `RUST_LOG` (fallback)
/// 3. `"warn"` (default, keeps outbox retry noise visible but quiet otherwise)
///
/// ```bash
/// TEST_LOG=bondebridge=debug cargo test -p bondebridge
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // captured per test by cargo/nextest
            .without_time() // stable output across runs
            .try_init()
            .ok(); // another subscriber may already be installed
    });
}
