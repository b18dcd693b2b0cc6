//! Handlers for `/admin` endpoints.
//!
//! | Method   | Path | Guard |
//! |----------|------|-------|
//! | `DELETE` | `/admin/users/{id}` | admin; removes the member and all dependent rows |

use axum::{
  Json,
  extract::{Path, State},
};

use cohort_core::{
  guard::{Decision, Rule, authorize},
  member::Role,
  store::{DeletionReport, MemberStore},
};

use crate::{AppState, auth::CurrentActor, error::Error};

/// `DELETE /admin/users/{id}` — cascade-delete a member.
///
/// The whole cascade runs in one transaction; the response reports exactly
/// what was removed, per collection.
pub async fn kick_member<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<i64>,
) -> Result<Json<DeletionReport>, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  if let Decision::Deny(reason) = authorize(&actor, Rule::Role(Role::Admin)) {
    return Err(Error::denied(reason, "admin access required"));
  }

  let report = state
    .store
    .delete_member_cascade(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("member {id} not found")))?;

  tracing::info!(
    member = report.member.id,
    email = %report.member.email,
    "member removed with full cascade"
  );

  Ok(Json(report))
}
