//! Validated email address handling.
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
        .expect("Email regex invalid")
});

/// An error raised when parsing an invalid email address.
#[derive(Error, Debug)]
#[error("Not a valid email address.")]
pub struct InvalidEmailError;

/// A syntactically valid email address. Can only be constructed through the
/// fallible conversions, so holding one implies it already passed validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// The domain part of the address, after the final `@`.
    pub fn domain(&self) -> &str {
        self.0
            .rsplit('@')
            .next()
            .expect("rsplit always yields at least one part")
    }

    /// Whether the address belongs to the given domain, ignoring case.
    pub fn in_domain(&self, domain: &str) -> bool {
        self.domain().eq_ignore_ascii_case(domain)
    }

    /// The canonical form used to key per-account bookkeeping.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// The address as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = InvalidEmailError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = InvalidEmailError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if EMAIL_REGEX.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidEmailError)
        }
    }
}

impl From<EmailAddress> for String {
    fn from(addr: EmailAddress) -> Self {
        let EmailAddress(s) = addr;
        s
    }
}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "email_test.rs"]
mod tests;
