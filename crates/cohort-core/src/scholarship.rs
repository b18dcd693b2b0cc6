//! Scholarship — a funding policy posted by an alumni member.
//!
//! Scholarships are never physically deleted; retirement flips `is_active`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for the reservation-category field meaning "open to all".
pub const CATEGORY_ALL: &str = "All";

/// A persisted scholarship row, as read back from the store.
///
/// `eligible_years` and `eligible_majors` are decoded from their serialised
/// set encodings at the storage boundary; an empty set means "no
/// restriction" (see [`crate::eligibility`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
  pub id:                    i64,
  pub title:                 String,
  pub description:           Option<String>,
  pub amount:                Option<f64>,
  pub deadline:              Option<NaiveDate>,
  pub requirements:          Option<String>,
  pub min_gpa:               Option<f64>,
  /// Required reservation category; `None` or [`CATEGORY_ALL`] means open.
  pub reservation_category:  Option<String>,
  pub lateral_entry_allowed: bool,
  pub eligible_years:        Vec<String>,
  pub eligible_majors:       Vec<String>,
  pub other_criteria:        Option<String>,
  pub posted_by:             i64,
  pub posted_by_name:        Option<String>,
  pub is_active:             bool,
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
}

/// Input to [`crate::store::MemberStore::add_scholarship`].
/// Timestamps and the active flag are set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewScholarship {
  pub title:                 String,
  pub description:           Option<String>,
  pub amount:                Option<f64>,
  pub deadline:              Option<NaiveDate>,
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

impl NewScholarship {
  /// Convenience constructor with every constraint left unset.
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      title:                 title.into(),
      description:           None,
      amount:                None,
      deadline:              None,
      requirements:          None,
      min_gpa:               None,
      reservation_category:  None,
      lateral_entry_allowed: true,
      eligible_years:        Vec::new(),
      eligible_majors:       Vec::new(),
      other_criteria:        None,
    }
  }
}
