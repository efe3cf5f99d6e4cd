//! Log subscriber setup.
//!
//! stdout carries the MCP transport, so logs go to stderr (or to the test
//! harness's captured output under a test runner).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Crate log level when `RUST_LOG` is unset.
fn default_directive(under_test: bool) -> &'static str {
    if under_test {
        "opdocs_mcp=debug"
    } else {
        "opdocs_mcp=info"
    }
}

/// Install the global subscriber. Later calls do nothing.
pub fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let under_test =
            std::env::var_os("NEXTEST").is_some() || std::env::var_os("CARGO_TARGET_TMPDIR").is_some();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(under_test)));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(false);

        let installed = if under_test {
            builder.with_test_writer().try_init()
        } else {
            builder.with_writer(std::io::stderr).try_init()
        };
        if let Err(e) = installed {
            eprintln!("Logging disabled: {}", e);
        }
    });
}
