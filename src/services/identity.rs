//! Client for the institutional identity provider, which owns passwords and
//! bearer tokens. Nothing else in the application ever sees a password.
use crate::constants::identity as constants;
use serde::Deserialize;
use uuid::Uuid;

/// The identity a bearer token vouches for, as reported by the provider.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenIdentity {
    /// The subject id the provider vouches for.
    #[serde(rename = "id")]
    pub subject_id: Uuid,
    /// The email registered with the provider, when it exposes one.
    pub email: Option<String>,
}

/// The provider's verdict on a bearer token.
pub enum TokenValidation {
    /// The provider recognized the token as live.
    Valid(TokenIdentity),
    /// The provider rejected the token as expired, revoked or forged.
    Invalid,
}

/// Upstream verifier for bearer tokens.
pub trait IdentityProvider: Send + Sync {
    /// Ask the provider who a bearer token belongs to.
    async fn validate_token(
        &self,
        token: &str,
    ) -> Result<TokenValidation, errors::IdentityProviderError>;
}

/// A grant handed back by a successful password sign-in.
pub struct IdentityGrant {
    /// The subject the provider authenticated.
    pub subject_id: Uuid,
    /// The email the provider has on file for the subject.
    pub email: Option<String>,
    /// The provider access token, relayed to the client for later
    /// cross-checks.
    pub access_token: String,
}

/// The outcome of a password sign-in attempt against the provider.
pub enum PasswordGrantOutcome {
    /// The provider accepted the credentials and issued a grant.
    Granted(IdentityGrant),
    /// The provider rejected the credentials.
    Denied,
}

#[derive(Deserialize)]
/// The body returned by the provider's password grant endpoint.
struct PasswordGrantResponse {
    access_token: String,
    user: TokenIdentity,
}

#[derive(Clone)]
/// HTTP client for the identity provider. Cheap to clone and safe to share.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Client {
    /// Construct a client against the configured provider deployment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_base_url(
            constants::IDENTITY_URL.clone(),
            constants::IDENTITY_API_KEY.clone(),
        )
    }

    /// Construct a client against an explicit deployment. Mainly useful for
    /// pointing tests at a local stub.
    #[must_use]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Exchange institutional credentials for a provider grant.
    pub async fn password_grant(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordGrantOutcome, errors::IdentityProviderError> {
        let response = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(PasswordGrantOutcome::Denied);
        }
        if !status.is_success() {
            return Err(errors::IdentityProviderError::UnexpectedStatus(status));
        }
        let granted: PasswordGrantResponse = response.json().await?;
        Ok(PasswordGrantOutcome::Granted(IdentityGrant {
            subject_id: granted.user.subject_id,
            email: granted.user.email,
            access_token: granted.access_token,
        }))
    }
}

impl IdentityProvider for Client {
    async fn validate_token(
        &self,
        token: &str,
    ) -> Result<TokenValidation, errors::IdentityProviderError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(TokenValidation::Invalid);
        }
        if !status.is_success() {
            return Err(errors::IdentityProviderError::UnexpectedStatus(status));
        }
        let identity: TokenIdentity = response.json().await?;
        Ok(TokenValidation::Valid(identity))
    }
}

/// Errors returned by functions within this module.
pub mod errors {
    use thiserror::Error;

    /// An error while talking to the identity provider. Anything here means
    /// the provider could not give a verdict, never that it said no.
    #[derive(Error, Debug)]
    pub enum IdentityProviderError {
        /// The request never completed, or the body did not parse.
        #[error(transparent)]
        Transport(#[from] reqwest::Error),
        /// The provider answered with a status outside its contract.
        #[error("Identity provider returned unexpected status {0}.")]
        UnexpectedStatus(reqwest::StatusCode),
    }
}
