//! Identity resolution — from a verified token claim to an [`Actor`].
//!
//! The claim is an opaque string: conventionally a stringified member id,
//! or the literal `-1` for the bootstrap administrator. Anything else is
//! tolerated and resolves to "nobody" rather than an error; only genuine
//! storage faults propagate as `Err`.

use crate::{
  member::{Actor, SUPERUSER_ID},
  store::MemberStore,
};

/// Resolve a verified claim string to an actor.
///
/// - `"-1"` yields [`Actor::Superuser`] without touching storage.
/// - A claim that parses as an integer is looked up; an absent row yields
///   `Ok(None)`.
/// - A claim that does not parse as an integer also yields `Ok(None)`.
pub async fn resolve_claim<S: MemberStore>(
  store: &S,
  claim: &str,
) -> Result<Option<Actor>, S::Error> {
  let Ok(id) = claim.trim().parse::<i64>() else {
    return Ok(None);
  };

  if id == SUPERUSER_ID {
    return Ok(Some(Actor::Superuser));
  }

  Ok(store.get_member(id).await?.map(Actor::Member))
}
