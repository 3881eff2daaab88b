//! Redis connection related constants.
use std::env::var;
use std::sync::LazyLock;

/// The hostname where the Redis session store can be found.
pub static REDIS_HOST: LazyLock<String> = LazyLock::new(|| {
    var("REDIS_HOST").expect("REDIS_HOST not provided in environment variables")
});

/// The full Redis connection URL. `REDIS_URL` overrides the one composed
/// from [`REDIS_HOST`].
pub static REDIS_URL: LazyLock<String> = LazyLock::new(|| {
    var("REDIS_URL").unwrap_or_else(|_| format!("redis://{}/", REDIS_HOST.clone()))
});
