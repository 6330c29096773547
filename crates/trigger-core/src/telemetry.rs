//! Tracing initialisation for the build-trigger binary.
//!
//! Our own crates log at the requested level; the HTTP stack underneath the
//! tracker and webhook adapters stays at `warn` unless `RUST_LOG` says
//! otherwise. JSON output carries the active `trigger` span so every line of
//! a dispatch can be grouped by repository and version.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events follow the requested verbosity.
const OWN_TARGETS: &[&str] = &["trigger_core", "trigger_http", "buildtrigger"];

/// Default filter directives for `level`.
pub fn default_directives(level: Level) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|target| format!("{}={}", target, level)));
    directives.join(",")
}

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`default_directives`]. Only the first
/// call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .ok();
}
