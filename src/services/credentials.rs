//! Extraction of raw request credentials into a typed bundle. This is the
//! only place that knows which cookies carry what; everything downstream
//! works with [`CredentialBundle`].
use crate::{
    constants::sessions::{
        ID_TOKEN_COOKIE, PROFILE_COOKIE, SESSION_ID_COOKIE, SESSION_SECRET_COOKIE, SUBJECT_COOKIE,
    },
    services::profiles::Principal,
};
use axum_extra::extract::CookieJar;
use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine as _};
use uuid::Uuid;

/// Everything a request offered as proof of identity. Every field is raw
/// client input and individually untrusted until reconciled.
#[derive(Clone, Default)]
pub struct CredentialBundle {
    /// The session identifier, from its cookie.
    pub session_id: Option<String>,
    /// The session secret, from its companion cookie.
    pub session_secret: Option<String>,
    /// The subject id the client claims to act as.
    pub subject_id: Option<Uuid>,
    /// The cached profile blob, when it parsed cleanly.
    pub cached_profile: Option<Principal>,
    /// An identity provider access token, for the optional cross-check.
    pub bearer_token: Option<String>,
}

/// The parts of a bundle which address a stored session. Exists only for
/// bundles carrying all three.
pub struct SessionKey {
    /// The session identifier.
    pub session_id: String,
    /// The session secret.
    pub session_secret: String,
    /// The subject the session supposedly belongs to.
    pub subject_id: Uuid,
}

impl CredentialBundle {
    /// Extract whatever credentials the request carries. Never fails: a
    /// missing or malformed carrier is simply absent from the bundle.
    pub fn extract(cookie_jar: &CookieJar) -> Self {
        let cached_profile = cookie_jar
            .get(PROFILE_COOKIE)
            .and_then(|cookie| decode_profile(cookie.value()));
        let claimed_subject =
            cookie_value(cookie_jar, SUBJECT_COOKIE).and_then(|raw| match Uuid::parse_str(&raw) {
                Ok(subject_id) => Some(subject_id),
                Err(err) => {
                    eprintln!("Discarding subject cookie that failed to parse: {err}");
                    None
                }
            });
        // A parsed blob already names its subject, which beats the bare
        // subject cookie when the two disagree.
        let subject_id = cached_profile
            .as_ref()
            .map(|profile| profile.subject_id)
            .or(claimed_subject);
        Self {
            session_id: cookie_value(cookie_jar, SESSION_ID_COOKIE),
            session_secret: cookie_value(cookie_jar, SESSION_SECRET_COOKIE),
            subject_id,
            cached_profile,
            bearer_token: cookie_value(cookie_jar, ID_TOKEN_COOKIE),
        }
    }

    /// The session triple, present only when all three parts were supplied.
    pub fn session_key(&self) -> Option<SessionKey> {
        Some(SessionKey {
            session_id: self.session_id.clone()?,
            session_secret: self.session_secret.clone()?,
            subject_id: self.subject_id?,
        })
    }
}

/// Read a cookie, treating an empty value the same as an absent cookie.
fn cookie_value(cookie_jar: &CookieJar, name: &str) -> Option<String> {
    cookie_jar
        .get(name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

/// Encode a profile for the cookie cache.
pub fn encode_profile(profile: &Principal) -> String {
    let serialized =
        serde_json::to_vec(profile).expect("Serializing a well-formed profile cannot fail.");
    BASE64_URL_SAFE_NO_PAD.encode(serialized)
}

fn decode_profile(raw: &str) -> Option<Principal> {
    let Ok(bytes) = BASE64_URL_SAFE_NO_PAD.decode(raw) else {
        eprintln!("Discarding profile cookie containing invalid base64.");
        return None;
    };
    match serde_json::from_slice(&bytes) {
        Ok(profile) => Some(profile),
        Err(err) => {
            eprintln!("Discarding profile cookie that failed to parse: {err}");
            None
        }
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
