//! Handlers for `/scholarships` endpoints.
//!
//! | Method   | Path | Guard |
//! |----------|------|-------|
//! | `GET`    | `/scholarships` | public |
//! | `POST`   | `/scholarships` | alumni |
//! | `GET`    | `/scholarships/{id}` | any authenticated; students get `is_eligible` |
//! | `PUT`    | `/scholarships/{id}` | alumni AND owner (no admin bypass) |
//! | `DELETE` | `/scholarships/{id}` | owner or admin (logical delete) |
//! | `POST`   | `/scholarships/{id}/apply` | student, eligible, first time |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use cohort_core::{
  application::NewApplication,
  eligibility::is_eligible,
  guard::{Decision, Rule, authorize},
  member::{Actor, Role},
  scholarship::{NewScholarship, Scholarship},
  store::{MemberStore, ScholarshipPatch},
};

use crate::{AppState, auth::CurrentActor, error::Error};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /scholarships` — active scholarships, soonest deadline first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Scholarship>>, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  let scholarships = state
    .store
    .list_scholarships()
    .await
    .map_err(Error::store)?;
  Ok(Json(scholarships))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Created {
  pub id: i64,
}

/// `POST /scholarships` — body: [`NewScholarship`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<NewScholarship>,
) -> Result<impl IntoResponse, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  if let Decision::Deny(reason) = authorize(&actor, Rule::Role(Role::Alumni)) {
    return Err(Error::denied(reason, "only alumni can post scholarships"));
  }

  let id = state
    .store
    .add_scholarship(actor.id(), body)
    .await
    .map_err(Error::store)?;

  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// A scholarship as returned to one specific viewer. `is_eligible` is only
/// computed for student viewers.
#[derive(Debug, Serialize)]
pub struct ScholarshipView {
  #[serde(flatten)]
  pub scholarship: Scholarship,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_eligible: Option<bool>,
}

/// `GET /scholarships/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<i64>,
) -> Result<Json<ScholarshipView>, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  let scholarship = state
    .store
    .get_scholarship(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("scholarship {id} not found")))?;

  let is_eligible = match &actor {
    Actor::Member(m) if m.role == Role::Student => {
      Some(is_eligible(m, &scholarship))
    }
    _ => None,
  };

  Ok(Json(ScholarshipView {
    scholarship,
    is_eligible,
  }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /scholarships/{id}` — body: [`ScholarshipPatch`].
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<i64>,
  Json(body): Json<ScholarshipPatch>,
) -> Result<StatusCode, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  if let Decision::Deny(reason) = authorize(&actor, Rule::Role(Role::Alumni)) {
    return Err(Error::denied(reason, "only alumni can update scholarships"));
  }

  let scholarship = state
    .store
    .get_scholarship(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("scholarship {id} not found")))?;

  let rule = Rule::OwnerForUpdate {
    owner_id: scholarship.posted_by,
  };
  if let Decision::Deny(reason) = authorize(&actor, rule) {
    return Err(Error::denied(
      reason,
      "you can only update your own scholarships",
    ));
  }

  state
    .store
    .update_scholarship(id, body)
    .await
    .map_err(Error::store)?;

  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /scholarships/{id}` — logical delete; the owner or any admin.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<i64>,
) -> Result<StatusCode, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  let scholarship = state
    .store
    .get_scholarship(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("scholarship {id} not found")))?;

  let rule = Rule::OwnerForDelete {
    owner_id: scholarship.posted_by,
  };
  if let Decision::Deny(reason) = authorize(&actor, rule) {
    return Err(Error::denied(
      reason,
      "you can only delete your own scholarships",
    ));
  }

  state
    .store
    .deactivate_scholarship(id)
    .await
    .map_err(Error::store)?;

  Ok(StatusCode::NO_CONTENT)
}

// ─── Apply ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApplyBody {
  pub cover_letter:  Option<String>,
  #[serde(default)]
  pub document_urls: Vec<String>,
}

/// `POST /scholarships/{id}/apply` — body: [`ApplyBody`].
pub async fn apply_one<S>(
  State(state): State<AppState<S>>,
  CurrentActor(actor): CurrentActor,
  Path(id): Path<i64>,
  Json(body): Json<ApplyBody>,
) -> Result<impl IntoResponse, Error>
where
  S: MemberStore + Clone + Send + Sync + 'static,
{
  if let Decision::Deny(reason) = authorize(&actor, Rule::Role(Role::Student)) {
    return Err(Error::denied(
      reason,
      "only students can apply for scholarships",
    ));
  }

  // The student role check above guarantees a backing member row.
  let member = actor
    .member()
    .ok_or_else(|| Error::Internal("student actor without member row".to_string()))?;

  let scholarship = state
    .store
    .get_scholarship(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("scholarship {id} not found")))?;

  if !is_eligible(member, &scholarship) {
    return Err(Error::ineligible(
      "you are not eligible for this scholarship",
    ));
  }

  if state
    .store
    .has_applied(member.id, id)
    .await
    .map_err(Error::store)?
  {
    return Err(Error::BadRequest(
      "you have already applied for this scholarship".to_string(),
    ));
  }

  state
    .store
    .add_application(NewApplication::for_scholarship(
      member.id,
      id,
      body.cover_letter,
      body.document_urls,
    ))
    .await
    .map_err(Error::store)?;

  Ok((
    StatusCode::CREATED,
    Json(serde_json::json!({ "message": "application submitted" })),
  ))
}
