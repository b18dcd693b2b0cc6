//! Bearer-token verification, password checking, and the [`CurrentActor`]
//! extractor.
//!
//! Tokens are HS256 JWTs whose `sub` carries the identity claim handed to
//! [`cohort_core::identity::resolve_claim`] — a stringified member id, or
//! `-1` for the bootstrap administrator.

use argon2::{Argon2, PasswordHash, PasswordVerifier as _};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use cohort_core::{identity::resolve_claim, member::Actor, store::MemberStore};

use crate::{AppState, error::Error};

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Registered claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The identity claim: a stringified member id, or `-1`.
  pub sub: String,
  pub iat: i64,
  pub exp: i64,
}

/// Issues and verifies access tokens for one server instance.
pub struct TokenKeeper {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl TokenKeeper {
  pub fn new(secret: &str, ttl_minutes: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl:      Duration::minutes(ttl_minutes),
    }
  }

  /// Sign a token whose `sub` is the given identity claim.
  pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
      sub: subject.to_string(),
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
  }

  /// Verify a token and return its `sub` claim. Any failure — bad signature,
  /// expiry, malformed token — reads as "no identity".
  pub fn verify(&self, token: &str) -> Option<String> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims.sub)
      .ok()
  }
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Check a password against a stored argon2 PHC string. A malformed stored
/// hash reads as a failed check, never a fault.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(Error::Unauthorized)
}

/// The resolved identity of the request. Present in a handler's signature
/// means verify-then-resolve already succeeded.
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<AppState<S>> for CurrentActor
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let claim = state.tokens.verify(token).ok_or(Error::Unauthorized)?;

    let actor = resolve_claim(state.store.as_ref(), &claim)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound("member not found".to_string()))?;

    Ok(Self(actor))
  }
}
