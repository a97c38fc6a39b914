//! Authentication against the remote auth subsystem.
//!
//! Password sign-in, sign-up, sign-out, and external-provider authorization
//! URLs. A [`Session`] is the proof of authentication the data-side
//! services (orders, wishlist) require; its absence means anonymous.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use chronos_core::{Email, EmailError, UserId};

use super::error_message;
use crate::supabase::SupabaseClient;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid email format (rejected before any network call).
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong email/password combination.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password rejected by the service's policy.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unclassified error response from the auth endpoints.
    #[error("auth service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// External sign-in providers the storefront offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    /// The provider name as the authorize endpoint expects it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }
}

/// The authenticated user carried inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// The auth subsystem's user ID.
    pub id: UserId,
    /// Email address, when the provider supplied one.
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Held in memory by the UI shell for the lifetime of the page; the access
/// token becomes the bearer token on data-side requests so the service can
/// enforce row-level ownership.
#[derive(Clone)]
pub struct Session {
    /// Bearer token for the data endpoints.
    pub access_token: SecretString,
    /// The signed-in user.
    pub user: SessionUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    #[cfg(test)]
    pub(crate) fn for_tests(token: &str) -> Self {
        Self {
            access_token: SecretString::from(token),
            user: SessionUser {
                id: UserId::new(Uuid::nil()),
                email: None,
            },
        }
    }
}

/// Outcome of a sign-up request.
#[derive(Debug)]
pub enum SignUp {
    /// The service signed the new user straight in.
    SignedIn(Session),
    /// The user must confirm their email before signing in.
    ConfirmationRequired,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Sign-up responses carry either a full session or a bare user record,
/// depending on whether email confirmation is enabled on the project.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<UserRecord>,
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
            user: SessionUser {
                id: UserId::new(response.user.id),
                email: response.user.email,
            },
        }
    }
}

// =============================================================================
// Auth operations
// =============================================================================

impl SupabaseClient {
    fn auth_url(&self, segment: &str) -> Url {
        let mut url = self.inner().project_url.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().extend(["auth", "v1", segment]);
            })
            .unwrap_or_default();
        url
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` without contacting the service if
    /// the email is malformed, `AuthError::InvalidCredentials` if the
    /// service rejects the pair.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;

        let mut url = self.auth_url("token");
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .inner()
            .http
            .post(url)
            .header("apikey", self.inner().anon_key.expose_secret())
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let body = check_auth_status(response).await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(Session::from(token))
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` without contacting the service if
    /// the email is malformed, `AuthError::UserAlreadyExists` or
    /// `AuthError::WeakPassword` per the service's response.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError> {
        let email = Email::parse(email)?;

        let response = self
            .inner()
            .http
            .post(self.auth_url("signup"))
            .header("apikey", self.inner().anon_key.expose_secret())
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let body = check_auth_status(response).await?;
        let signup: SignUpResponse = serde_json::from_str(&body)?;
        match (signup.access_token, signup.user) {
            (Some(access_token), Some(user)) => Ok(SignUp::SignedIn(Session::from(TokenResponse {
                access_token,
                user,
            }))),
            _ => Ok(SignUp::ConfirmationRequired),
        }
    }

    /// Invalidate a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the caller should drop its
    /// `Session` either way.
    #[instrument(skip(self, session))]
    pub async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let response = self
            .inner()
            .http
            .post(self.auth_url("logout"))
            .header("apikey", self.inner().anon_key.expose_secret())
            .bearer_auth(session.access_token.expose_secret())
            .send()
            .await?;

        check_auth_status(response).await?;
        Ok(())
    }

    /// Re-validate a session against the service and return its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the token has expired or
    /// been revoked.
    #[instrument(skip(self, session))]
    pub async fn get_user(&self, session: &Session) -> Result<SessionUser, AuthError> {
        let response = self
            .inner()
            .http
            .get(self.auth_url("user"))
            .header("apikey", self.inner().anon_key.expose_secret())
            .bearer_auth(session.access_token.expose_secret())
            .send()
            .await?;

        let body = check_auth_status(response).await?;
        let user: UserRecord = serde_json::from_str(&body)?;
        Ok(SessionUser {
            id: UserId::new(user.id),
            email: user.email,
        })
    }

    /// Build the external-provider authorization URL.
    ///
    /// The UI navigates the browser here; the provider redirects back to
    /// `redirect_to` with the session in the fragment.
    #[must_use]
    pub fn authorize_url(&self, provider: Provider, redirect_to: Option<&str>) -> Url {
        let mut url = self.auth_url("authorize");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("provider", provider.as_str());
            if let Some(redirect_to) = redirect_to {
                pairs.append_pair("redirect_to", redirect_to);
            }
        }
        url
    }
}

/// Read the body, classifying auth error responses.
async fn check_auth_status(response: reqwest::Response) -> Result<String, AuthError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        return Ok(body);
    }

    let message = error_message(&body);
    tracing::warn!(status = %status, message = %message, "auth request rejected");
    Err(classify_auth_error(status.as_u16(), &message))
}

/// Map an auth error response to its variant by status and message.
fn classify_auth_error(status: u16, message: &str) -> AuthError {
    let lower = message.to_lowercase();
    if lower.contains("invalid login credentials") || lower.contains("invalid_grant") {
        return AuthError::InvalidCredentials;
    }
    if lower.contains("already registered") || lower.contains("already exists") {
        return AuthError::UserAlreadyExists;
    }
    if lower.contains("password") && (status == 422 || status == 400) {
        return AuthError::WeakPassword(message.to_string());
    }
    AuthError::Api {
        status,
        message: message.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;

    fn test_client() -> SupabaseClient {
        let config = SupabaseConfig {
            project_url: Url::parse("https://proj.supabase.co").unwrap(),
            anon_key: SecretString::from("anon-key"),
        };
        SupabaseClient::new(&config)
    }

    #[test]
    fn test_authorize_url() {
        let client = test_client();
        let url = client.authorize_url(Provider::Google, Some("https://shop.example/index.html"));
        assert_eq!(
            url.as_str(),
            "https://proj.supabase.co/auth/v1/authorize\
             ?provider=google&redirect_to=https%3A%2F%2Fshop.example%2Findex.html"
        );
    }

    #[test]
    fn test_authorize_url_without_redirect() {
        let client = test_client();
        let url = client.authorize_url(Provider::Facebook, None);
        assert_eq!(
            url.as_str(),
            "https://proj.supabase.co/auth/v1/authorize?provider=facebook"
        );
    }

    #[test]
    fn test_classify_invalid_credentials() {
        let err = classify_auth_error(400, "Invalid login credentials");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_classify_already_registered() {
        let err = classify_auth_error(422, "User already registered");
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[test]
    fn test_classify_weak_password() {
        let err = classify_auth_error(422, "Password should be at least 6 characters");
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_classify_fallback() {
        let err = classify_auth_error(500, "internal error");
        assert!(matches!(err, AuthError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_email_before_network() {
        // The client points at a real-looking host, but a malformed email
        // must fail validation before any request is attempted.
        let client = test_client();
        let result = client.sign_in_with_password("not-an-email", "pw").await;
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::for_tests("token-value");
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("token-value"));
    }
}
