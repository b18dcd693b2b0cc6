//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use cohort_core::guard::DenyReason;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden ({reason}): {message}")]
  Forbidden {
    /// Machine-readable reason code, e.g. `role_mismatch`.
    reason:  &'static str,
    message: String,
  },

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// A 403 from a guard decision, keeping the deny reason distinguishable.
  pub fn denied(reason: DenyReason, message: impl Into<String>) -> Self {
    Self::Forbidden {
      reason:  reason.as_str(),
      message: message.into(),
    }
  }

  /// A 403 from the eligibility evaluator.
  pub fn ineligible(message: impl Into<String>) -> Self {
    Self::Forbidden {
      reason:  "ineligible",
      message: message.into(),
    }
  }

  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "invalid or missing credentials" })),
      )
        .into_response(),
      Error::Forbidden { reason, message } => (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": message, "reason": reason })),
      )
        .into_response(),
      Error::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      Error::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      // Internal detail is logged, never echoed to the caller.
      Error::Internal(m) => {
        tracing::error!(error = %m, "internal error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "storage fault");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal storage error" })),
        )
          .into_response()
      }
    }
  }
}
