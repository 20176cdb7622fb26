//! Console logging for the front ends.
//!
//! The library modules never log; `main` calls [`init`] once and the CLI and
//! GUI report through the `log` macros.
//!
//! ```no_run
//! tidyframe::logging::init();
//! log::info!("ready");
//! ```

use env_logger::Env;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialises `env_logger` with [`DEFAULT_FILTER`], overridable through
/// `RUST_LOG`. Calling it twice is harmless.
pub fn init() {
    let env = Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_target(false)
        .try_init();
}
