//! The `MemberStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `cohort-store-sqlite`).
//! Higher layers (`cohort-api`) depend on this abstraction, not on any
//! concrete backend, and thread the handle explicitly — no component reaches
//! into ambient global state.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  application::NewApplication,
  member::{Member, MemberSummary, NewMember},
  scholarship::{NewScholarship, Scholarship},
};

// ─── Deletion report ─────────────────────────────────────────────────────────

/// Rows removed per dependent collection by a member cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeCounts {
  pub stories:             usize,
  pub opportunities:       usize,
  pub scholarships:        usize,
  pub mentorship_requests: usize,
  pub messages:            usize,
  pub applications:        usize,
}

/// What a member cascade removed: the member's identifying fields captured
/// before deletion, plus per-collection row counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReport {
  pub member: MemberSummary,
  pub counts: CascadeCounts,
}

// ─── Login ───────────────────────────────────────────────────────────────────

/// A member row paired with its stored password hash. Only the login path
/// sees this; [`Member`] itself never carries the hash.
#[derive(Debug, Clone)]
pub struct LoginRecord {
  pub member:        Member,
  pub password_hash: String,
}

// ─── Fields accepted by a scholarship update ─────────────────────────────────

/// Replacement values for an existing scholarship. Ownership and the active
/// flag are not touched here; retirement goes through
/// [`MemberStore::deactivate_scholarship`].
#[derive(Debug, Clone, Deserialize)]
pub struct ScholarshipPatch {
  pub title:                 String,
  pub description:           Option<String>,
  pub amount:                Option<f64>,
  pub deadline:              Option<chrono::NaiveDate>,
  pub requirements:          Option<String>,
  pub min_gpa:               Option<f64>,
  pub reservation_category:  Option<String>,
  #[serde(default = "default_lateral_entry")]
  pub lateral_entry_allowed: bool,
  #[serde(default)]
  pub eligible_years:        Vec<String>,
  #[serde(default)]
  pub eligible_majors:       Vec<String>,
  pub other_criteria:        Option<String>,
}

fn default_lateral_entry() -> bool { true }

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Cohort storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Each call owns its
/// connection for its duration; nothing is retained across requests.
pub trait MemberStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Members ───────────────────────────────────────────────────────────

  /// Persist a new member. Fails if the email is already registered.
  fn add_member(
    &self,
    input: NewMember,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Retrieve a member by id. Returns `None` if not found; storage faults
  /// surface as `Err`, never as `None`.
  fn get_member(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  /// Retrieve a member by unique email. Returns `None` if not found.
  fn get_member_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + 'a;

  /// Retrieve a member plus stored password hash for credential checking.
  fn get_login_record<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<LoginRecord>, Self::Error>> + Send + 'a;

  // ── Scholarships ──────────────────────────────────────────────────────

  /// Persist a new scholarship owned by `posted_by` and return its id.
  fn add_scholarship(
    &self,
    posted_by: i64,
    input: NewScholarship,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Retrieve an active scholarship by id. Retired rows read as `None`.
  fn get_scholarship(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Scholarship>, Self::Error>> + Send + '_;

  /// List active scholarships, soonest deadline first.
  fn list_scholarships(
    &self,
  ) -> impl Future<Output = Result<Vec<Scholarship>, Self::Error>> + Send + '_;

  /// Replace an existing scholarship's fields.
  fn update_scholarship(
    &self,
    id: i64,
    patch: ScholarshipPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retire a scholarship (logical delete; the row is kept).
  fn deactivate_scholarship(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Whether `applicant_id` already has an application for `scholarship_id`.
  fn has_applied(
    &self,
    applicant_id: i64,
    scholarship_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Persist a new application.
  fn add_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cascade deletion ──────────────────────────────────────────────────

  /// Remove a member and every dependent row across the six dependent
  /// collections as one atomic unit.
  ///
  /// Returns `Ok(None)` without mutating anything if the member does not
  /// exist. On any mid-sequence fault the whole transaction rolls back; no
  /// partial cascade is ever observable.
  fn delete_member_cascade(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<DeletionReport>, Self::Error>> + Send + '_;
}
