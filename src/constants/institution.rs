//! Constants describing the institution this deployment serves.

use std::{env::var, sync::LazyLock};

/// Email domain sign-ins must belong to, e.g. `vitstudent.ac.in`.
pub static INSTITUTION_EMAIL_DOMAIN: LazyLock<String> = LazyLock::new(|| {
    var("INSTITUTION_EMAIL_DOMAIN")
        .expect("INSTITUTION_EMAIL_DOMAIN not provided in environment variables")
});
