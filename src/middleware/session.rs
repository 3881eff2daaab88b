//! Middleware used for checking student authentication.
use crate::{
    constants::sessions::PROFILE_COOKIE,
    services::{
        credentials::{self, CredentialBundle},
        verification,
    },
    state::AppState,
    utils::httperror::HttpError,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use axum_extra::extract::{cookie::Cookie, CookieJar};

/// Middleware to verify the session credential cookies and identify the
/// student making the request.
///
/// On success the reconciled session record and the student's profile are
/// inserted as request extensions for handlers behind this middleware. When
/// the profile had to be fetched from the database, the response additionally
/// carries a refreshed profile cookie.
pub async fn session_middleware(
    State(state): State<AppState>,
    cookie_jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let bundle = CredentialBundle::extract(&cookie_jar);
    let verified = verification::verify(
        &bundle,
        &mut state.session_store_conn.clone(),
        &state.db_conn,
        &state.identity,
    )
    .await?;

    let refreshed_profile = verified
        .profile
        .needs_refresh()
        .then(|| credentials::encode_profile(verified.profile.principal()));

    req.extensions_mut().insert(verified.session);
    req.extensions_mut()
        .insert(verified.profile.into_principal());
    let response = next.run(req).await;

    Ok(match refreshed_profile {
        Some(encoded) => {
            let jar = cookie_jar.add(Cookie::build((PROFILE_COOKIE, encoded)).path("/"));
            (jar, response).into_response()
        }
        None => response,
    })
}
