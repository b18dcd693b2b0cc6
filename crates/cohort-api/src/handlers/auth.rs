//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Public; admin accounts cannot be created here |
//! | `POST` | `/auth/login`    | Public; also serves the bootstrap admin |
//! | `GET`  | `/auth/me`       | Echo of the resolved identity |

use argon2::{Argon2, PasswordHasher as _, password_hash::SaltString};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use cohort_core::{
  guard::DenyReason,
  member::{Actor, MemberSummary, NewMember, Role, SUPERUSER_ID},
  store::MemberStore,
};

use crate::{
  AppState,
  auth::{CurrentActor, verify_password},
  error::Error,
};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    Option<String>,
  pub password: Option<String>,
  pub name:     Option<String>,
  pub role:     Option<Role>,
}

/// `POST /auth/register` — body: `{"email", "password", "name", "role"?}`.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  let (Some(email), Some(password), Some(name)) =
    (body.email, body.password, body.name)
  else {
    return Err(Error::BadRequest(
      "email, password, and name are required".to_string(),
    ));
  };

  let role = body.role.unwrap_or(Role::Student);
  if role == Role::Admin {
    return Err(Error::denied(
      DenyReason::RoleMismatch,
      "cannot register an admin account",
    ));
  }

  if state
    .store
    .get_member_by_email(&email)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    return Err(Error::BadRequest("email already registered".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let password_hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| Error::Internal(format!("argon2: {e}")))?
    .to_string();

  let member = state
    .store
    .add_member(NewMember::new(email, password_hash, name, role))
    .await
    .map_err(Error::store)?;

  Ok((StatusCode::CREATED, Json(member)))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub access_token: String,
  pub user:         MemberSummary,
}

/// `POST /auth/login` — body: `{"email", "password"}`.
///
/// The bootstrap admin authenticates against the hash in the server config
/// and receives a token whose claim is the reserved `-1`; everyone else
/// authenticates against their stored hash.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  let (Some(email), Some(password)) = (body.email, body.password) else {
    return Err(Error::BadRequest(
      "email and password are required".to_string(),
    ));
  };

  if email == state.config.admin_email {
    if !verify_password(&password, &state.config.admin_password_hash) {
      return Err(Error::Unauthorized);
    }

    let access_token = state
      .tokens
      .issue(&SUPERUSER_ID.to_string())
      .map_err(Error::store)?;

    return Ok(Json(LoginResponse {
      access_token,
      user: Actor::Superuser.summary(),
    }));
  }

  let record = state
    .store
    .get_login_record(&email)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;

  if !verify_password(&password, &record.password_hash) {
    return Err(Error::Unauthorized);
  }

  let access_token = state
    .tokens
    .issue(&record.member.id.to_string())
    .map_err(Error::store)?;

  Ok(Json(LoginResponse {
    access_token,
    user: Actor::Member(record.member).summary(),
  }))
}

// ─── Me ──────────────────────────────────────────────────────────────────────

/// `GET /auth/me` — the resolved identity behind the presented token.
pub async fn me<S>(
  State(_): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
) -> Json<MemberSummary>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  Json(actor.summary())
}
