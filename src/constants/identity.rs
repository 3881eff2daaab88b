//! Constants for reaching the institutional identity provider.

use super::secrets::read_secret;
use std::{env::var, sync::LazyLock};

/// Base URL of the identity provider, without a trailing slash.
pub static IDENTITY_URL: LazyLock<String> = LazyLock::new(|| {
    var("IDENTITY_URL").expect("IDENTITY_URL not provided in environment variables")
});

/// Project API key sent alongside every identity provider request.
pub static IDENTITY_API_KEY: LazyLock<String> = LazyLock::new(|| {
    var("IDENTITY_API_KEY").unwrap_or_else(|_| {
        let secret_path = var("IDENTITY_API_KEY_DOCKER_SECRET").expect(
            "Neither IDENTITY_API_KEY nor IDENTITY_API_KEY_DOCKER_SECRET provided in environment variables",
        );
        read_secret(&secret_path).expect("Failed to read IDENTITY_API_KEY docker secret")
    })
});
