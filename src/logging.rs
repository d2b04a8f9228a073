//! Logger bootstrap for the game binary and tests.
//!
//! `env_logger` owns output; the binary keeps Bevy's `LogPlugin` disabled so
//! every message goes through the `log` facade.
use env_logger::{Builder, Env};
use log::debug;

/// Crates whose info-level chatter drowns out gameplay messages.
const QUIET_CRATES: [&str; 3] = ["wgpu", "naga", "winit"];

/// Filter directives used when `RUST_LOG` is unset.
///
/// # Examples
/// ```
/// use brood::logging::default_filter;
/// assert!(default_filter(true).starts_with("info,brood=debug"));
/// assert!(default_filter(false).contains("wgpu=warn"));
/// ```
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let own_level = if verbose { "debug" } else { "info" };
    let mut directives = vec![format!("info,brood={own_level}")];
    directives.extend(QUIET_CRATES.iter().map(|name| format!("{name}=warn")));
    directives.join(",")
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, per-duckling state transitions and other debug
/// messages from this crate are printed. `RUST_LOG` still overrides either
/// default. Calling it again is harmless, so tests may call it freely.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        debug!("logger already installed");
    }
}
