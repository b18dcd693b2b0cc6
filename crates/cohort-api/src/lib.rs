//! JSON REST layer for the Cohort membership platform.
//!
//! Exposes an axum [`Router`] backed by any [`cohort_core::store::MemberStore`].
//! Identity arrives as a bearer JWT; the verified claim is resolved to an
//! [`cohort_core::member::Actor`] before any privileged handler runs.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use cohort_core::store::MemberStore;
use serde::Deserialize;

use auth::TokenKeeper;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub database_path:       PathBuf,
  pub jwt_secret:          String,
  pub token_ttl_minutes:   i64,
  /// Login email of the bootstrap administrator (claim `-1`; no user row).
  pub admin_email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: MemberStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub tokens: Arc<TokenKeeper>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the REST API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Identity
    .route("/auth/register", post(handlers::auth::register::<S>))
    .route("/auth/login", post(handlers::auth::login::<S>))
    .route("/auth/me", get(handlers::auth::me::<S>))
    // Scholarships
    .route(
      "/scholarships",
      get(handlers::scholarships::list::<S>).post(handlers::scholarships::create::<S>),
    )
    .route(
      "/scholarships/{id}",
      get(handlers::scholarships::get_one::<S>)
        .put(handlers::scholarships::update_one::<S>)
        .delete(handlers::scholarships::delete_one::<S>),
    )
    .route(
      "/scholarships/{id}/apply",
      post(handlers::scholarships::apply_one::<S>),
    )
    // Administration
    .route("/admin/users/{id}", delete(handlers::admin::kick_member::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
