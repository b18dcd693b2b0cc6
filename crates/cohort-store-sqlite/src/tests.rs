//! Integration tests for `SqliteStore` against an in-memory database.

use cohort_core::{
  application::NewApplication,
  identity::resolve_claim,
  member::{Actor, NewMember, Role, SUPERUSER_ID},
  scholarship::NewScholarship,
  store::{MemberStore, ScholarshipPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_member(email: &str, role: Role) -> NewMember {
  NewMember::new(email, "$argon2id$stub", email.split('@').next().unwrap(), role)
}

/// Run raw SQL against the underlying connection — used for seeding the
/// dependent collections and for fault injection.
async fn exec(s: &SqliteStore, sql: &str) {
  let sql = sql.to_owned();
  s.conn
    .call(move |conn| {
      conn.execute_batch(&sql)?;
      Ok(())
    })
    .await
    .unwrap();
}

/// Count rows referencing `id` via the given single-parameter query.
async fn count(s: &SqliteStore, sql: &'static str, id: i64) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(sql, rusqlite::params![id], |row| row.get(0))?)
    })
    .await
    .unwrap()
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_member() {
  let s = store().await;

  let mut input = new_member("alice@example.com", Role::Student);
  input.gpa = Some(8.4);
  input.graduation_year = Some(2026);
  input.major = Some("Physics".into());

  let added = s.add_member(input).await.unwrap();
  assert!(added.id > 0);

  let fetched = s.get_member(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.role, Role::Student);
  assert_eq!(fetched.gpa, Some(8.4));
  assert_eq!(fetched.graduation_year, Some(2026));
  assert_eq!(fetched.major.as_deref(), Some("Physics"));
  assert!(!fetched.is_lateral_entry);
}

#[tokio::test]
async fn get_member_missing_returns_none() {
  let s = store().await;
  assert!(s.get_member(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn get_member_by_email_and_login_record() {
  let s = store().await;
  let added = s
    .add_member(new_member("bob@example.com", Role::Alumni))
    .await
    .unwrap();

  let by_email = s
    .get_member_by_email("bob@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_email.id, added.id);

  let record = s
    .get_login_record("bob@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(record.member.id, added.id);
  assert_eq!(record.password_hash, "$argon2id$stub");

  assert!(s.get_login_record("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.add_member(new_member("dup@example.com", Role::Student))
    .await
    .unwrap();

  let err = s
    .add_member(new_member("dup@example.com", Role::Alumni))
    .await;
  assert!(err.is_err());
}

// ─── Identity resolution ─────────────────────────────────────────────────────

#[tokio::test]
async fn superuser_claim_resolves_without_storage() {
  let s = store().await;

  // No rows at all — the synthetic identity must still resolve.
  let actor = resolve_claim(&s, "-1").await.unwrap().unwrap();
  assert!(matches!(actor, Actor::Superuser));
  assert_eq!(actor.id(), SUPERUSER_ID);
  assert_eq!(actor.role(), Role::Admin);

  let summary = actor.summary();
  assert_eq!(summary.name, "Administrator");
}

#[tokio::test]
async fn numeric_claim_resolves_member() {
  let s = store().await;
  let added = s
    .add_member(new_member("carol@example.com", Role::Alumni))
    .await
    .unwrap();

  let actor = resolve_claim(&s, &added.id.to_string())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(actor.id(), added.id);
  assert_eq!(actor.role(), Role::Alumni);
}

#[tokio::test]
async fn unknown_and_non_numeric_claims_resolve_to_nobody() {
  let s = store().await;
  assert!(resolve_claim(&s, "424242").await.unwrap().is_none());
  assert!(resolve_claim(&s, "not-a-number").await.unwrap().is_none());
  assert!(resolve_claim(&s, "").await.unwrap().is_none());
}

// ─── Scholarships ────────────────────────────────────────────────────────────

async fn alumni(s: &SqliteStore, email: &str) -> i64 {
  s.add_member(new_member(email, Role::Alumni)).await.unwrap().id
}

#[tokio::test]
async fn scholarship_roundtrip() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;

  let mut input = NewScholarship::new("Merit Award");
  input.min_gpa = Some(7.5);
  input.eligible_years = vec!["2025".into(), "2026".into()];
  input.eligible_majors = vec!["Physics".into()];
  input.deadline = Some("2026-01-31".parse().unwrap());

  let id = s.add_scholarship(poster, input).await.unwrap();
  let fetched = s.get_scholarship(id).await.unwrap().unwrap();

  assert_eq!(fetched.title, "Merit Award");
  assert_eq!(fetched.min_gpa, Some(7.5));
  assert_eq!(fetched.eligible_years, vec!["2025", "2026"]);
  assert_eq!(fetched.eligible_majors, vec!["Physics"]);
  assert_eq!(fetched.deadline, Some("2026-01-31".parse().unwrap()));
  assert_eq!(fetched.posted_by, poster);
  assert_eq!(fetched.posted_by_name.as_deref(), Some("poster"));
  assert!(fetched.is_active);
}

#[tokio::test]
async fn deactivated_scholarship_reads_as_absent() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;
  let id = s
    .add_scholarship(poster, NewScholarship::new("Short-lived"))
    .await
    .unwrap();

  s.deactivate_scholarship(id).await.unwrap();

  assert!(s.get_scholarship(id).await.unwrap().is_none());
  assert!(s.list_scholarships().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_orders_by_deadline() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;

  let mut later = NewScholarship::new("Later");
  later.deadline = Some("2026-06-30".parse().unwrap());
  let mut sooner = NewScholarship::new("Sooner");
  sooner.deadline = Some("2026-01-15".parse().unwrap());

  s.add_scholarship(poster, later).await.unwrap();
  s.add_scholarship(poster, sooner).await.unwrap();

  let titles: Vec<String> = s
    .list_scholarships()
    .await
    .unwrap()
    .into_iter()
    .map(|sch| sch.title)
    .collect();
  assert_eq!(titles, vec!["Sooner", "Later"]);
}

#[tokio::test]
async fn update_replaces_fields() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;
  let id = s
    .add_scholarship(poster, NewScholarship::new("Before"))
    .await
    .unwrap();

  let patch = ScholarshipPatch {
    title:                 "After".into(),
    description:           Some("now with a description".into()),
    amount:                Some(5000.0),
    deadline:              None,
    requirements:          None,
    min_gpa:               Some(6.0),
    reservation_category:  None,
    lateral_entry_allowed: false,
    eligible_years:        vec!["2027".into()],
    eligible_majors:       Vec::new(),
    other_criteria:        None,
  };
  s.update_scholarship(id, patch).await.unwrap();

  let fetched = s.get_scholarship(id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "After");
  assert_eq!(fetched.amount, Some(5000.0));
  assert_eq!(fetched.min_gpa, Some(6.0));
  assert!(!fetched.lateral_entry_allowed);
  assert_eq!(fetched.eligible_years, vec!["2027"]);
  assert_eq!(fetched.posted_by, poster, "ownership is not touched by updates");
}

#[tokio::test]
async fn malformed_set_encoding_reads_as_unrestricted() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;

  let mut input = NewScholarship::new("Odd data");
  input.eligible_years = vec!["2025".into()];
  let id = s.add_scholarship(poster, input).await.unwrap();

  exec(
    &s,
    &format!("UPDATE scholarships SET eligible_years = 'oops', eligible_majors = '{{\"a\":1}}' WHERE id = {id}"),
  )
  .await;

  let fetched = s.get_scholarship(id).await.unwrap().unwrap();
  assert!(fetched.eligible_years.is_empty());
  assert!(fetched.eligible_majors.is_empty());
}

// ─── Applications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn application_uniqueness_per_scholarship() {
  let s = store().await;
  let poster = alumni(&s, "poster@example.com").await;
  let student = s
    .add_member(new_member("student@example.com", Role::Student))
    .await
    .unwrap();
  let sch = s
    .add_scholarship(poster, NewScholarship::new("Award"))
    .await
    .unwrap();

  assert!(!s.has_applied(student.id, sch).await.unwrap());

  s.add_application(NewApplication::for_scholarship(
    student.id,
    sch,
    Some("please".into()),
    vec!["https://example.com/cv.pdf".into()],
  ))
  .await
  .unwrap();

  assert!(s.has_applied(student.id, sch).await.unwrap());

  // The (applicant, scholarship) pair is unique.
  let dup = s
    .add_application(NewApplication::for_scholarship(student.id, sch, None, vec![]))
    .await;
  assert!(dup.is_err());
}

// ─── Cascade deletion ────────────────────────────────────────────────────────

/// Seed the fixture from the deletion contract: 3 stories, 1 opportunity,
/// 0 scholarships, 2 mentorship requests (one as either party), 5 messages
/// (3 sent, 2 received), 1 application. Returns (victim_id, bystander_id).
async fn seed_cascade_fixture(s: &SqliteStore) -> (i64, i64) {
  let victim = s
    .add_member(new_member("victim@example.com", Role::Student))
    .await
    .unwrap()
    .id;
  let bystander = alumni(s, "bystander@example.com").await;

  for i in 0..3 {
    exec(
      s,
      &format!(
        "INSERT INTO stories (author_id, title, created_at) \
         VALUES ({victim}, 'story {i}', '2026-01-01T00:00:00Z')"
      ),
    )
    .await;
  }

  exec(
    s,
    &format!(
      "INSERT INTO opportunities (posted_by, title, created_at) \
       VALUES ({victim}, 'internship', '2026-01-01T00:00:00Z')"
    ),
  )
  .await;

  exec(
    s,
    &format!(
      "INSERT INTO mentorship_requests (student_id, mentor_id, created_at) \
       VALUES ({victim}, {bystander}, '2026-01-01T00:00:00Z');
       INSERT INTO mentorship_requests (student_id, mentor_id, created_at) \
       VALUES ({bystander}, {victim}, '2026-01-01T00:00:00Z');"
    ),
  )
  .await;

  for i in 0..3 {
    exec(
      s,
      &format!(
        "INSERT INTO messages (sender_id, receiver_id, body, created_at) \
         VALUES ({victim}, {bystander}, 'sent {i}', '2026-01-01T00:00:00Z')"
      ),
    )
    .await;
  }
  for i in 0..2 {
    exec(
      s,
      &format!(
        "INSERT INTO messages (sender_id, receiver_id, body, created_at) \
         VALUES ({bystander}, {victim}, 'received {i}', '2026-01-01T00:00:00Z')"
      ),
    )
    .await;
  }

  let sch = s
    .add_scholarship(bystander, NewScholarship::new("Award"))
    .await
    .unwrap();
  s.add_application(NewApplication::for_scholarship(victim, sch, None, vec![]))
    .await
    .unwrap();

  (victim, bystander)
}

#[tokio::test]
async fn cascade_reports_exact_counts_and_leaves_no_residue() {
  let s = store().await;
  let (victim, _) = seed_cascade_fixture(&s).await;

  let report = s
    .delete_member_cascade(victim)
    .await
    .unwrap()
    .expect("member existed");

  assert_eq!(report.member.id, victim);
  assert_eq!(report.member.email, "victim@example.com");
  assert_eq!(report.member.role, Role::Student);

  assert_eq!(report.counts.stories, 3);
  assert_eq!(report.counts.opportunities, 1);
  assert_eq!(report.counts.scholarships, 0);
  assert_eq!(report.counts.mentorship_requests, 2);
  assert_eq!(report.counts.messages, 5);
  assert_eq!(report.counts.applications, 1);

  // The member row is gone and nothing references it anywhere.
  assert!(s.get_member(victim).await.unwrap().is_none());
  assert_eq!(count(&s, "SELECT COUNT(*) FROM stories WHERE author_id = ?1", victim).await, 0);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM opportunities WHERE posted_by = ?1", victim).await, 0);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM scholarships WHERE posted_by = ?1", victim).await, 0);
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM mentorship_requests WHERE student_id = ?1 OR mentor_id = ?1", victim).await,
    0,
  );
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM messages WHERE sender_id = ?1 OR receiver_id = ?1", victim).await,
    0,
  );
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM applications WHERE applicant_id = ?1", victim).await,
    0,
  );
}

#[tokio::test]
async fn cascade_leaves_bystanders_untouched() {
  let s = store().await;
  let (victim, bystander) = seed_cascade_fixture(&s).await;

  s.delete_member_cascade(victim).await.unwrap().unwrap();

  assert!(s.get_member(bystander).await.unwrap().is_some());
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM scholarships WHERE posted_by = ?1", bystander).await,
    1,
  );
}

#[tokio::test]
async fn cascade_of_missing_member_returns_none() {
  let s = store().await;
  assert!(s.delete_member_cascade(4242).await.unwrap().is_none());
}

#[tokio::test]
async fn cascade_rolls_back_entirely_on_mid_sequence_fault() {
  let s = store().await;
  let (victim, _) = seed_cascade_fixture(&s).await;

  // Make the message-deletion step fail after the earlier steps have already
  // run inside the transaction.
  exec(&s, "DROP TABLE messages").await;

  let result = s.delete_member_cascade(victim).await;
  assert!(result.is_err());

  // The member row must still be present, and the collections deleted before
  // the fault must show no rows removed.
  assert!(s.get_member(victim).await.unwrap().is_some());
  assert_eq!(count(&s, "SELECT COUNT(*) FROM stories WHERE author_id = ?1", victim).await, 3);
  assert_eq!(count(&s, "SELECT COUNT(*) FROM opportunities WHERE posted_by = ?1", victim).await, 1);
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM mentorship_requests WHERE student_id = ?1 OR mentor_id = ?1", victim).await,
    2,
  );
  assert_eq!(
    count(&s, "SELECT COUNT(*) FROM applications WHERE applicant_id = ?1", victim).await,
    1,
  );
}
