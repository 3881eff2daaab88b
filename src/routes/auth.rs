//! Routes under /auth handling sign-in and session related mechanisms.
use crate::{
    constants::{
        institution::INSTITUTION_EMAIL_DOMAIN,
        sessions::{
            ID_TOKEN_COOKIE, PROFILE_COOKIE, SESSION_ID_COOKIE, SESSION_SECRET_COOKIE,
            SUBJECT_COOKIE,
        },
    },
    middleware::session::session_middleware,
    services::{
        auth::{self, SignedIn},
        credentials,
        errors::StorageError,
        identity::{IdentityGrant, IdentityProvider as _, PasswordGrantOutcome, TokenValidation},
        profiles::Principal,
        sessions::{self, SessionRecord},
    },
    state::AppState,
    utils::{email::EmailAddress, httperror::HttpError},
};
use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Create a router for the /auth route.
pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/session", get(session_info))
        .route("/logout", post(logout))
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .route("/", get(root))
        .route("/login", post(login))
        .route("/token", post(token_login))
}

/// Simply returns a happy message :)
async fn root() -> Json<String> {
    Json("Authentication service is running!".to_owned())
}

#[derive(Deserialize)]
/// A request to /auth/login.
struct LoginRequest {
    /// The institutional email provided at sign-in.
    pub email: EmailAddress,
    /// The password provided at sign-in.
    pub password: String,
}

#[derive(Serialize)]
/// A response to a successful sign-in.
struct LoginResponse {
    /// The signed-in student's profile.
    pub profile: Principal,
}

/// Set every session credential cookie and echo the student's profile.
fn respond_signed_in(cookies: CookieJar, signed_in: SignedIn) -> (CookieJar, Json<LoginResponse>) {
    let SignedIn {
        session,
        principal,
        access_token,
    } = signed_in;
    let jar = cookies
        .add(
            Cookie::build((SESSION_ID_COOKIE, session.record.session_id))
                .path("/")
                .http_only(true),
        )
        .add(
            Cookie::build((SESSION_SECRET_COOKIE, session.secret))
                .path("/")
                .http_only(true),
        )
        .add(Cookie::build((SUBJECT_COOKIE, session.record.subject_id.to_string())).path("/"))
        .add(
            Cookie::build((PROFILE_COOKIE, credentials::encode_profile(&principal))).path("/"),
        )
        .add(
            Cookie::build((ID_TOKEN_COOKIE, access_token))
                .path("/")
                .http_only(true),
        );
    (jar, Json(LoginResponse { profile: principal }))
}

/// Sign in with institutional email and password.
async fn login(
    cookies: CookieJar,
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), HttpError> {
    state.login_limiter.check_and_record(&body.email.normalized())?;
    if !body.email.in_domain(&INSTITUTION_EMAIL_DOMAIN) {
        eprintln!("Refused sign-in for {}: outside the institution domain.", body.email);
        return Err(HttpError::new(
            StatusCode::FORBIDDEN,
            Some("This account does not belong to the institution.".to_owned()),
        ));
    }
    let outcome = state
        .identity
        .password_grant(body.email.as_str(), &body.password)
        .await
        .map_err(StorageError::from)?;
    let grant = match outcome {
        PasswordGrantOutcome::Granted(grant) => grant,
        PasswordGrantOutcome::Denied => {
            eprintln!("Failed sign-in as {}.", body.email);
            return Err(HttpError::new(
                StatusCode::UNAUTHORIZED,
                Some("Incorrect email or password.".to_owned()),
            ));
        }
    };
    let signed_in = auth::establish_session(
        grant,
        &INSTITUTION_EMAIL_DOMAIN,
        &mut state.session_store_conn.clone(),
        &state.db_conn,
    )
    .await?;
    Ok(respond_signed_in(cookies, signed_in))
}

#[derive(Deserialize)]
/// A request to /auth/token, signing in with a provider-issued access token.
struct TokenLoginRequest {
    /// The access token to sign in with.
    pub access_token: String,
}

/// Sign in with an access token issued by the identity provider.
async fn token_login(
    cookies: CookieJar,
    State(state): State<AppState>,
    Json(body): Json<TokenLoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), HttpError> {
    let identity = match state
        .identity
        .validate_token(&body.access_token)
        .await
        .map_err(StorageError::from)?
    {
        TokenValidation::Valid(identity) => identity,
        TokenValidation::Invalid => {
            eprintln!("Refused token sign-in: the provider rejected the token.");
            return Err(HttpError::new(
                StatusCode::UNAUTHORIZED,
                Some("The provider rejected this token.".to_owned()),
            ));
        }
    };
    let signed_in = auth::establish_session(
        IdentityGrant {
            subject_id: identity.subject_id,
            email: identity.email,
            access_token: body.access_token,
        },
        &INSTITUTION_EMAIL_DOMAIN,
        &mut state.session_store_conn.clone(),
        &state.db_conn,
    )
    .await?;
    Ok(respond_signed_in(cookies, signed_in))
}

/// Revoke the current session and clear every credential cookie.
async fn logout(
    cookies: CookieJar,
    State(state): State<AppState>,
    Extension(session): Extension<SessionRecord>,
) -> Result<CookieJar, HttpError> {
    sessions::revoke_session(&session.session_id, &mut state.session_store_conn.clone())
        .await
        .map_err(StorageError::from)?;
    eprintln!("Student {} signed out.", session.subject_id);
    Ok([
        SESSION_ID_COOKIE,
        SESSION_SECRET_COOKIE,
        SUBJECT_COOKIE,
        PROFILE_COOKIE,
        ID_TOKEN_COOKIE,
    ]
    .into_iter()
    .fold(cookies, |jar, name| {
        jar.remove(Cookie::build(name).path("/"))
    }))
}

#[derive(Serialize)]
/// A response to /auth/session.
struct SessionInfoResponse {
    /// The authenticated student's profile.
    pub profile: Principal,
    /// When the current session expires.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

/// Describe the session of the student making the request.
async fn session_info(
    Extension(session): Extension<SessionRecord>,
    Extension(principal): Extension<Principal>,
) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        profile: principal,
        expires_at: session.expires_at,
    })
}
