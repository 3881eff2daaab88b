//! Sign-in rate limiting knobs.

use std::{env::var, str::FromStr, sync::LazyLock};

/// Maximum sign-in attempts per account within one window.
pub static LOGIN_RATE_LIMIT: LazyLock<usize> = LazyLock::new(|| env_parse("LOGIN_RATE_LIMIT", 5));

/// Width of the sliding rate limit window in seconds.
pub static LOGIN_RATE_WINDOW_SECS: LazyLock<u64> =
    LazyLock::new(|| env_parse("LOGIN_RATE_WINDOW_SECS", 60));

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
