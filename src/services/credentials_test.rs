use super::*;
use axum_extra::extract::cookie::Cookie;

fn sample_profile(subject_id: Uuid) -> Principal {
    Principal {
        subject_id,
        display_name: "Jane Doe".to_owned(),
        registration_number: "21BCE1000".to_owned(),
        email: "jane.doe2021@vitstudent.ac.in".to_owned(),
        avatar_url: None,
    }
}

fn jar_with(cookies: &[(&str, String)]) -> CookieJar {
    cookies.iter().fold(CookieJar::new(), |jar, (name, value)| {
        jar.add(Cookie::new((*name).to_owned(), value.clone()))
    })
}

#[test]
fn empty_jar_yields_empty_bundle() {
    let bundle = CredentialBundle::extract(&CookieJar::new());
    assert!(bundle.session_id.is_none());
    assert!(bundle.session_secret.is_none());
    assert!(bundle.subject_id.is_none());
    assert!(bundle.cached_profile.is_none());
    assert!(bundle.bearer_token.is_none());
    assert!(bundle.session_key().is_none());
}

#[test]
fn full_triple_yields_session_key() {
    let subject_id = Uuid::new_v4();
    let jar = jar_with(&[
        (SESSION_ID_COOKIE, "sess-1".to_owned()),
        (SESSION_SECRET_COOKIE, "secret-1".to_owned()),
        (SUBJECT_COOKIE, subject_id.to_string()),
    ]);
    let key = CredentialBundle::extract(&jar).session_key().unwrap();
    assert_eq!(key.session_id, "sess-1");
    assert_eq!(key.session_secret, "secret-1");
    assert_eq!(key.subject_id, subject_id);
}

#[test]
fn missing_secret_yields_no_session_key() {
    let jar = jar_with(&[
        (SESSION_ID_COOKIE, "sess-1".to_owned()),
        (SUBJECT_COOKIE, Uuid::new_v4().to_string()),
    ]);
    assert!(CredentialBundle::extract(&jar).session_key().is_none());
}

#[test]
fn empty_cookie_value_counts_as_absent() {
    let jar = jar_with(&[
        (SESSION_ID_COOKIE, String::new()),
        (SESSION_SECRET_COOKIE, "secret-1".to_owned()),
        (SUBJECT_COOKIE, Uuid::new_v4().to_string()),
    ]);
    let bundle = CredentialBundle::extract(&jar);
    assert!(bundle.session_id.is_none());
    assert!(bundle.session_key().is_none());
}

#[test]
fn malformed_subject_cookie_is_ignored() {
    let jar = jar_with(&[(SUBJECT_COOKIE, "not-a-uuid".to_owned())]);
    assert!(CredentialBundle::extract(&jar).subject_id.is_none());
}

#[test]
fn profile_blob_round_trips() {
    let profile = sample_profile(Uuid::new_v4());
    let jar = jar_with(&[(PROFILE_COOKIE, encode_profile(&profile))]);
    let bundle = CredentialBundle::extract(&jar);
    assert_eq!(bundle.cached_profile, Some(profile));
}

#[test]
fn blob_subject_beats_subject_cookie() {
    let blob_subject = Uuid::new_v4();
    let cookie_subject = Uuid::new_v4();
    let jar = jar_with(&[
        (PROFILE_COOKIE, encode_profile(&sample_profile(blob_subject))),
        (SUBJECT_COOKIE, cookie_subject.to_string()),
    ]);
    assert_eq!(CredentialBundle::extract(&jar).subject_id, Some(blob_subject));
}

#[test]
fn subject_cookie_used_when_no_blob() {
    let subject_id = Uuid::new_v4();
    let jar = jar_with(&[(SUBJECT_COOKIE, subject_id.to_string())]);
    assert_eq!(CredentialBundle::extract(&jar).subject_id, Some(subject_id));
}

#[test]
fn garbage_blob_degrades_to_absent() {
    let jar = jar_with(&[(PROFILE_COOKIE, "!!not-base64!!".to_owned())]);
    let bundle = CredentialBundle::extract(&jar);
    assert!(bundle.cached_profile.is_none());
    assert!(bundle.subject_id.is_none());
}

#[test]
fn blob_with_unexpected_fields_degrades_to_absent() {
    let tampered = BASE64_URL_SAFE_NO_PAD.encode(
        "{\"subject_id\":\"3fa85f64-5717-4562-b3fc-2c963f66afa6\",\"display_name\":\"Jane\",\
         \"registration_number\":\"21BCE1000\",\"email\":\"jane@vitstudent.ac.in\",\
         \"role\":\"admin\"}",
    );
    let jar = jar_with(&[(PROFILE_COOKIE, tampered)]);
    assert!(CredentialBundle::extract(&jar).cached_profile.is_none());
}

#[test]
fn blob_missing_required_fields_degrades_to_absent() {
    let truncated = BASE64_URL_SAFE_NO_PAD
        .encode("{\"subject_id\":\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"}");
    let jar = jar_with(&[(PROFILE_COOKIE, truncated)]);
    assert!(CredentialBundle::extract(&jar).cached_profile.is_none());
}

#[test]
fn bearer_token_is_carried_through() {
    let jar = jar_with(&[(ID_TOKEN_COOKIE, "provider-token".to_owned())]);
    assert_eq!(
        CredentialBundle::extract(&jar).bearer_token,
        Some("provider-token".to_owned())
    );
}
