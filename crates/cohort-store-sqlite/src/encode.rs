//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`.
//! The eligible-year/eligible-major sets are stored as compact JSON arrays
//! of strings; a malformed encoding decodes to the empty (unrestricted) set
//! rather than raising.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use cohort_core::{
  member::{Member, MemberSummary, Role},
  scholarship::Scholarship,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str { r.as_str() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(Role::from_str(s)?) }

// ─── String sets ─────────────────────────────────────────────────────────────

pub fn encode_string_set(set: &[String]) -> Result<String> {
  Ok(serde_json::to_string(set)?)
}

/// Decode a JSON-array-of-strings column. A malformed encoding is logged and
/// degrades to the empty set, which downstream eligibility checks read as
/// "no restriction".
pub fn decode_string_set_lossy(s: &str, column: &str) -> Vec<String> {
  match serde_json::from_str(s) {
    Ok(set) => set,
    Err(e) => {
      tracing::warn!(column, error = %e, "malformed set encoding; treating as unrestricted");
      Vec::new()
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawMember {
  pub id:                   i64,
  pub email:                String,
  pub name:                 String,
  pub role:                 String,
  pub created_at:           String,
  pub gpa:                  Option<f64>,
  pub reservation_category: Option<String>,
  pub is_lateral_entry:     bool,
  pub graduation_year:      Option<i32>,
  pub major:                Option<String>,
  pub company:              Option<String>,
  pub position:             Option<String>,
}

impl RawMember {
  pub fn into_member(self) -> Result<Member> {
    Ok(Member {
      id:                   self.id,
      email:                self.email,
      name:                 self.name,
      role:                 decode_role(&self.role)?,
      created_at:           decode_dt(&self.created_at)?,
      gpa:                  self.gpa,
      reservation_category: self.reservation_category,
      is_lateral_entry:     self.is_lateral_entry,
      graduation_year:      self.graduation_year,
      major:                self.major,
      company:              self.company,
      position:             self.position,
    })
  }
}

/// Raw identifying fields of a member, captured before a cascade removes the
/// row.
pub struct RawMemberSummary {
  pub id:    i64,
  pub email: String,
  pub name:  String,
  pub role:  String,
}

impl RawMemberSummary {
  pub fn into_summary(self) -> Result<MemberSummary> {
    Ok(MemberSummary {
      id:    self.id,
      email: self.email,
      name:  self.name,
      role:  decode_role(&self.role)?,
    })
  }
}

/// Raw values read from a `scholarships` row joined with the poster's name.
pub struct RawScholarship {
  pub id:                    i64,
  pub title:                 String,
  pub description:           Option<String>,
  pub amount:                Option<f64>,
  pub deadline:              Option<String>,
  pub requirements:          Option<String>,
  pub min_gpa:               Option<f64>,
  pub reservation_category:  Option<String>,
  pub lateral_entry_allowed: bool,
  pub eligible_years:        String,
  pub eligible_majors:       String,
  pub other_criteria:        Option<String>,
  pub posted_by:             i64,
  pub posted_by_name:        Option<String>,
  pub is_active:             bool,
  pub created_at:            String,
  pub updated_at:            String,
}

impl RawScholarship {
  pub fn into_scholarship(self) -> Result<Scholarship> {
    let deadline = self.deadline.as_deref().map(decode_date).transpose()?;

    Ok(Scholarship {
      id:                    self.id,
      title:                 self.title,
      description:           self.description,
      amount:                self.amount,
      deadline,
      requirements:          self.requirements,
      min_gpa:               self.min_gpa,
      reservation_category:  self.reservation_category,
      lateral_entry_allowed: self.lateral_entry_allowed,
      eligible_years:        decode_string_set_lossy(&self.eligible_years, "eligible_years"),
      eligible_majors:       decode_string_set_lossy(&self.eligible_majors, "eligible_majors"),
      other_criteria:        self.other_criteria,
      posted_by:             self.posted_by,
      posted_by_name:        self.posted_by_name,
      is_active:             self.is_active,
      created_at:            decode_dt(&self.created_at)?,
      updated_at:            decode_dt(&self.updated_at)?,
    })
  }
}
