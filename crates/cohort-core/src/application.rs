//! Application — a student's submission against a scholarship or an
//! opportunity posting.
//!
//! An application targets exactly one of the two; the constructors keep the
//! other reference empty. At most one application may exist per
//! (applicant, scholarship) pair, enforced by the store.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// What kind of posting an application targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationKind {
  Scholarship,
  Opportunity,
}

impl ApplicationKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Scholarship => "scholarship",
      Self::Opportunity => "opportunity",
    }
  }
}

impl fmt::Display for ApplicationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ApplicationKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "scholarship" => Ok(Self::Scholarship),
      "opportunity" => Ok(Self::Opportunity),
      other => Err(Error::UnknownApplicationKind(other.to_string())),
    }
  }
}

/// Input to [`crate::store::MemberStore::add_application`].
/// `created_at` is set by the store.
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub applicant_id:   i64,
  pub scholarship_id: Option<i64>,
  pub opportunity_id: Option<i64>,
  pub kind:           ApplicationKind,
  pub cover_letter:   Option<String>,
  /// Ordered list of supporting-document URLs.
  pub document_urls:  Vec<String>,
}

impl NewApplication {
  pub fn for_scholarship(
    applicant_id: i64,
    scholarship_id: i64,
    cover_letter: Option<String>,
    document_urls: Vec<String>,
  ) -> Self {
    Self {
      applicant_id,
      scholarship_id: Some(scholarship_id),
      opportunity_id: None,
      kind: ApplicationKind::Scholarship,
      cover_letter,
      document_urls,
    }
  }
}
