//! Identity gate: resolves a verified user from the session credential or
//! fails closed. Sign-up and sign-in live with the managed identity
//! provider; this service only validates the signed session token it issued.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

/// Cookie holding the session token. An `Authorization: Bearer` header is
/// accepted as an equivalent transport.
pub const SESSION_COOKIE: &str = "session_token";

/// Claims carried by the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (stable user id).
    pub sub: String,
    /// Verified email address; storage namespaces derive from this.
    pub email: String,
    /// Expiry (seconds since epoch).
    pub exp: usize,
}

/// Verified caller identity, inserted into request extensions by the gate.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// Validates session tokens against the shared signing secret.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Checks signature and expiry; any defect fails closed.
    pub fn verify(&self, token: &str) -> Result<SessionUser, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;
        Ok(SessionUser {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Middleware applied to every storage-backed route. A request without a
/// verifiable session never reaches a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(&headers);
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| bearer_token(&headers));

    let Some(token) = token else {
        tracing::warn!("session token missing, request rejected");
        return Err(AppError::Unauthorized);
    };

    let user = state.sessions.verify(&token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}
