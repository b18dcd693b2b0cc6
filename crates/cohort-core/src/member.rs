//! Member — a registered user of the platform, plus the [`Actor`] wrapper
//! that distinguishes persisted members from the synthetic superuser.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role a member holds on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Alumni,
  Admin,
}

impl Role {
  /// The discriminant string stored in the `role` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Alumni => "alumni",
      Self::Admin => "admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "student" => Ok(Self::Student),
      "alumni" => Ok(Self::Alumni),
      "admin" => Ok(Self::Admin),
      other => Err(Error::UnknownRole(other.to_string())),
    }
  }
}

// ─── Member ──────────────────────────────────────────────────────────────────

/// A persisted member row. The password hash never travels on this type; the
/// login path uses [`crate::store::LoginRecord`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
  pub id:                   i64,
  pub email:                String,
  pub name:                 String,
  pub role:                 Role,
  pub created_at:           DateTime<Utc>,
  /// Cumulative grade-point average; absent until the member fills it in.
  pub gpa:                  Option<f64>,
  pub reservation_category: Option<String>,
  pub is_lateral_entry:     bool,
  pub graduation_year:      Option<i32>,
  pub major:                Option<String>,
  pub company:              Option<String>,
  pub position:             Option<String>,
}

/// Input to [`crate::store::MemberStore::add_member`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewMember {
  pub email:                String,
  pub password_hash:        String,
  pub name:                 String,
  pub role:                 Role,
  pub gpa:                  Option<f64>,
  pub reservation_category: Option<String>,
  pub is_lateral_entry:     bool,
  pub graduation_year:      Option<i32>,
  pub major:                Option<String>,
  pub company:              Option<String>,
  pub position:             Option<String>,
}

impl NewMember {
  /// Convenience constructor with all profile fields left unset.
  pub fn new(
    email: impl Into<String>,
    password_hash: impl Into<String>,
    name: impl Into<String>,
    role: Role,
  ) -> Self {
    Self {
      email:                email.into(),
      password_hash:        password_hash.into(),
      name:                 name.into(),
      role,
      gpa:                  None,
      reservation_category: None,
      is_lateral_entry:     false,
      graduation_year:      None,
      major:                None,
      company:              None,
      position:             None,
    }
  }
}

/// The identifying fields of a member, echoed in deletion reports and
/// `/auth/me` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
  pub id:    i64,
  pub email: String,
  pub name:  String,
  pub role:  Role,
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// The reserved identifier of the bootstrap administrator. No row with this
/// id ever exists in the store.
pub const SUPERUSER_ID: i64 = -1;

/// The email the synthetic superuser presents as.
pub const SUPERUSER_EMAIL: &str = "admin@cohort.local";

/// A resolved request identity.
///
/// The bootstrap administrator has no backing row, so it is a distinct
/// variant rather than a sentinel member flowing through ordinary lookup
/// code; every consumer has to say what it means for the superuser.
#[derive(Debug, Clone)]
pub enum Actor {
  /// The bootstrap administrator. Presents as an admin, owns nothing.
  Superuser,
  Member(Member),
}

impl Actor {
  pub fn id(&self) -> i64 {
    match self {
      Self::Superuser => SUPERUSER_ID,
      Self::Member(m) => m.id,
    }
  }

  pub fn role(&self) -> Role {
    match self {
      Self::Superuser => Role::Admin,
      Self::Member(m) => m.role,
    }
  }

  /// The backing member row, if this actor is persisted.
  pub fn member(&self) -> Option<&Member> {
    match self {
      Self::Superuser => None,
      Self::Member(m) => Some(m),
    }
  }

  pub fn summary(&self) -> MemberSummary {
    match self {
      Self::Superuser => MemberSummary {
        id:    SUPERUSER_ID,
        email: SUPERUSER_EMAIL.to_string(),
        name:  "Administrator".to_string(),
        role:  Role::Admin,
      },
      Self::Member(m) => MemberSummary {
        id:    m.id,
        email: m.email.clone(),
        name:  m.name.clone(),
        role:  m.role,
      },
    }
  }
}
