//! Eligibility evaluator — a pure predicate over a member's profile and a
//! scholarship's constraints.
//!
//! Every constraint degrades to "passes" when the data needed to enforce it
//! is absent: an unset scholarship field constrains nothing, and an unset
//! member field never disqualifies. Disqualification requires explicit data
//! on both sides. Tightening this would silently reject members with
//! incomplete profiles, so the lenient defaults must be preserved exactly.

use crate::{member::Member, scholarship::{CATEGORY_ALL, Scholarship}};

/// Decide whether `member` qualifies for `scholarship`.
///
/// Checks run in a fixed order and the first failure short-circuits:
/// gpa floor, reservation category, lateral entry, graduation-year set,
/// major set.
pub fn is_eligible(member: &Member, scholarship: &Scholarship) -> bool {
  // GPA floor.
  if let (Some(min_gpa), Some(gpa)) = (scholarship.min_gpa, member.gpa)
    && gpa < min_gpa
  {
    return false;
  }

  // Reservation category; the "All" sentinel constrains nothing.
  if let Some(required) = scholarship.reservation_category.as_deref()
    && required != CATEGORY_ALL
    && let Some(category) = member.reservation_category.as_deref()
    && category != required
  {
    return false;
  }

  // Lateral entry.
  if !scholarship.lateral_entry_allowed && member.is_lateral_entry {
    return false;
  }

  // Graduation-year membership; an empty set is unrestricted.
  if !scholarship.eligible_years.is_empty()
    && let Some(year) = member.graduation_year
    && !scholarship.eligible_years.iter().any(|y| y == &year.to_string())
  {
    return false;
  }

  // Major membership, symmetric to the year check.
  if !scholarship.eligible_majors.is_empty()
    && let Some(major) = member.major.as_deref()
    && !scholarship.eligible_majors.iter().any(|m| m == major)
  {
    return false;
  }

  true
}
