//! Token verification and the route gate.
//!
//! Tokens are issued by an external identity provider and only verified
//! here. Format: `base64url(json claims) "." hex(HMAC-SHA256(encoded claims))`.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::{TypedHeader, TypedHeaderRejection};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cinedeck_core::config::AuthConfig;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::server::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session token.
pub const TOKEN_COOKIE_NAME: &str = "authToken";

/// Auth views an authenticated visitor is sent away from.
const REGISTER_PATH: &str = "/register";

/// Routes reachable without a token.
const PUBLIC_PATHS: &[&str] = &["/api/health"];

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id at the identity provider)
    pub sub: String,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Why a token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Verifies tokens signed with a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Verifier for the configured secret, `None` when the gate is disabled.
    pub fn from_config(auth: &AuthConfig) -> Option<Self> {
        if !auth.is_enabled() {
            return None;
        }
        auth.token_secret.as_deref().map(Self::new)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, TokenError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::BadSignature)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    /// Produces a token in the identity provider's format.
    ///
    /// # Errors
    ///
    /// - `TokenError::Malformed` - Claims could not be encoded
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let json = serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Checks signature and expiry against the current time.
    ///
    /// # Errors
    ///
    /// - `TokenError::Malformed` - Token is not `payload.signature` or the payload is not claims JSON
    /// - `TokenError::BadSignature` - Signature does not match the payload
    /// - `TokenError::Expired` - The `exp` claim is in the past
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Checks signature and expiry against `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// See [`TokenVerifier::verify`].
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (payload, signature) = token.trim().split_once('.').ok_or(TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Where a request goes after the gate.
#[derive(Debug, PartialEq, Eq)]
enum GateDecision {
    Pass,
    RedirectTo(String),
    Unauthorized,
}

fn decide(auth: &AuthConfig, path: &str, authenticated: bool) -> GateDecision {
    if PUBLIC_PATHS.contains(&path) {
        return GateDecision::Pass;
    }

    let auth_view = path == auth.login_path || path == REGISTER_PATH;
    match (authenticated, auth_view) {
        (true, true) => GateDecision::RedirectTo(auth.home_path.clone()),
        (false, false) if path.starts_with("/api/") => GateDecision::Unauthorized,
        (false, false) => GateDecision::RedirectTo(auth.login_path.clone()),
        _ => GateDecision::Pass,
    }
}

/// Route gate middleware.
///
/// Unauthenticated page requests are redirected to the login view and API
/// requests get `401`; authenticated visitors of the login or register
/// views are sent home. A no-op when no secret is configured. An
/// `Authorization` header that is not a bearer token is ignored.
pub async fn auth_gate(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(verifier) = state.verifier.as_ref() else {
        return next.run(request).await;
    };

    let token = bearer
        .ok()
        .map(|header| header.token().to_string())
        .or_else(|| jar.get(TOKEN_COOKIE_NAME).map(|c| c.value().to_string()));
    let authenticated = match token.as_deref().map(|t| verifier.verify(t)) {
        Some(Ok(_)) => true,
        Some(Err(err)) => {
            debug!(error = %err, "Rejected session token");
            false
        }
        None => false,
    };

    match decide(&state.config.auth, request.uri().path(), authenticated) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectTo(target) => Redirect::to(&target).into_response(),
        GateDecision::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            exp,
        }
    }

    #[test]
    fn test_signed_token_verifies_until_expiry() {
        let verifier = TokenVerifier::new("secret");
        let token = verifier.sign(&claims(1_000)).unwrap();

        assert_eq!(verifier.verify_at(&token, 999), Ok(claims(1_000)));
        assert_eq!(verifier.verify_at(&token, 1_000), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_or_foreign_tokens_are_rejected() {
        let verifier = TokenVerifier::new("secret");
        let token = verifier.sign(&claims(1_000)).unwrap();

        let foreign = TokenVerifier::new("other").sign(&claims(1_000)).unwrap();
        assert_eq!(verifier.verify_at(&foreign, 0), Err(TokenError::BadSignature));

        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"admin","exp":99999}"#);
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{forged_payload}.{signature}");
        assert_eq!(verifier.verify_at(&forged, 0), Err(TokenError::BadSignature));

        assert_eq!(verifier.verify_at("no-dot", 0), Err(TokenError::Malformed));
        assert_eq!(verifier.verify_at("abc.zz", 0), Err(TokenError::Malformed));
    }

    #[test]
    fn test_gate_decisions() {
        let auth = AuthConfig::default();

        assert_eq!(decide(&auth, "/api/health", false), GateDecision::Pass);
        assert_eq!(decide(&auth, "/api/trending", false), GateDecision::Unauthorized);
        assert_eq!(
            decide(&auth, "/", false),
            GateDecision::RedirectTo("/login".to_string())
        );
        assert_eq!(decide(&auth, "/login", false), GateDecision::Pass);
        assert_eq!(decide(&auth, "/register", false), GateDecision::Pass);
        assert_eq!(
            decide(&auth, "/register", true),
            GateDecision::RedirectTo("/".to_string())
        );
        assert_eq!(decide(&auth, "/api/trending", true), GateDecision::Pass);
    }

    #[test]
    fn test_verifier_disabled_without_secret() {
        let mut auth = AuthConfig::default();
        assert!(TokenVerifier::from_config(&auth).is_none());

        auth.token_secret = Some("s3cret".to_string());
        assert!(TokenVerifier::from_config(&auth).is_some());
    }
}
