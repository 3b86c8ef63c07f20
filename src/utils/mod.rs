pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Default directive applied when `RUST_LOG` does not mention this crate.
const DEFAULT_DIRECTIVE: &str = "dre_core=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Safe to call repeatedly; only the first call installs a subscriber, and an
/// already-installed global subscriber (for example from a host application)
/// is left untouched.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
            filter = filter.add_directive(directive);
        }

        // stdout carries report output
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
