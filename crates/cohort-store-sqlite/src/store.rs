//! [`SqliteStore`] — the SQLite implementation of [`MemberStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use cohort_core::{
  application::NewApplication,
  member::{Member, NewMember},
  scholarship::{NewScholarship, Scholarship},
  store::{CascadeCounts, DeletionReport, LoginRecord, MemberStore, ScholarshipPatch},
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_role, encode_string_set, RawMember,
    RawMemberSummary, RawScholarship,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Row readers ─────────────────────────────────────────────────────────────

const MEMBER_COLUMNS: &str = "id, email, name, role, created_at, gpa, \
   reservation_category, is_lateral_entry, graduation_year, major, company, position";

fn read_member(row: &rusqlite::Row) -> rusqlite::Result<RawMember> {
  Ok(RawMember {
    id:                   row.get(0)?,
    email:                row.get(1)?,
    name:                 row.get(2)?,
    role:                 row.get(3)?,
    created_at:           row.get(4)?,
    gpa:                  row.get(5)?,
    reservation_category: row.get(6)?,
    is_lateral_entry:     row.get(7)?,
    graduation_year:      row.get(8)?,
    major:                row.get(9)?,
    company:              row.get(10)?,
    position:             row.get(11)?,
  })
}

const SCHOLARSHIP_SELECT: &str = "SELECT
     s.id, s.title, s.description, s.amount, s.deadline, s.requirements,
     s.min_gpa, s.reservation_category, s.lateral_entry_allowed,
     s.eligible_years, s.eligible_majors, s.other_criteria,
     s.posted_by, u.name AS posted_by_name, s.is_active,
     s.created_at, s.updated_at
   FROM scholarships s
   LEFT JOIN users u ON u.id = s.posted_by";

fn read_scholarship(row: &rusqlite::Row) -> rusqlite::Result<RawScholarship> {
  Ok(RawScholarship {
    id:                    row.get(0)?,
    title:                 row.get(1)?,
    description:           row.get(2)?,
    amount:                row.get(3)?,
    deadline:              row.get(4)?,
    requirements:          row.get(5)?,
    min_gpa:               row.get(6)?,
    reservation_category:  row.get(7)?,
    lateral_entry_allowed: row.get(8)?,
    eligible_years:        row.get(9)?,
    eligible_majors:       row.get(10)?,
    other_criteria:        row.get(11)?,
    posted_by:             row.get(12)?,
    posted_by_name:        row.get(13)?,
    is_active:             row.get(14)?,
    created_at:            row.get(15)?,
    updated_at:            row.get(16)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cohort membership store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single member by an equality filter on one column.
  async fn query_member(
    &self,
    sql: String,
    param: impl rusqlite::ToSql + Send + 'static,
  ) -> Result<Option<Member>> {
    let raw: Option<RawMember> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], read_member)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMember::into_member).transpose()
  }
}

// ─── MemberStore impl ────────────────────────────────────────────────────────

impl MemberStore for SqliteStore {
  type Error = Error;

  // ── Members ───────────────────────────────────────────────────────────────

  async fn add_member(&self, input: NewMember) -> Result<Member> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let role_str   = encode_role(input.role).to_owned();

    let row = input.clone();
    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             email, password_hash, name, role, created_at,
             gpa, reservation_category, is_lateral_entry,
             graduation_year, major, company, position
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            row.email,
            row.password_hash,
            row.name,
            role_str,
            at_str,
            row.gpa,
            row.reservation_category,
            row.is_lateral_entry,
            row.graduation_year,
            row.major,
            row.company,
            row.position,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Member {
      id,
      email:                input.email,
      name:                 input.name,
      role:                 input.role,
      created_at,
      gpa:                  input.gpa,
      reservation_category: input.reservation_category,
      is_lateral_entry:     input.is_lateral_entry,
      graduation_year:      input.graduation_year,
      major:                input.major,
      company:              input.company,
      position:             input.position,
    })
  }

  async fn get_member(&self, id: i64) -> Result<Option<Member>> {
    self
      .query_member(
        format!("SELECT {MEMBER_COLUMNS} FROM users WHERE id = ?1"),
        id,
      )
      .await
  }

  async fn get_member_by_email(&self, email: &str) -> Result<Option<Member>> {
    self
      .query_member(
        format!("SELECT {MEMBER_COLUMNS} FROM users WHERE email = ?1"),
        email.to_owned(),
      )
      .await
  }

  async fn get_login_record(&self, email: &str) -> Result<Option<LoginRecord>> {
    let email = email.to_owned();

    let raw: Option<(RawMember, String)> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {MEMBER_COLUMNS}, password_hash FROM users WHERE email = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], |row| {
              Ok((read_member(row)?, row.get(12)?))
            })
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(m, hash)| {
        Ok(LoginRecord {
          member:        m.into_member()?,
          password_hash: hash,
        })
      })
      .transpose()
  }

  // ── Scholarships ──────────────────────────────────────────────────────────

  async fn add_scholarship(&self, posted_by: i64, input: NewScholarship) -> Result<i64> {
    let now_str    = encode_dt(Utc::now());
    let years_str  = encode_string_set(&input.eligible_years)?;
    let majors_str = encode_string_set(&input.eligible_majors)?;
    let deadline   = input.deadline.map(encode_date);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scholarships (
             title, description, amount, deadline, requirements,
             min_gpa, reservation_category, lateral_entry_allowed,
             eligible_years, eligible_majors, other_criteria,
             posted_by, is_active, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1, ?13, ?13)",
          rusqlite::params![
            input.title,
            input.description,
            input.amount,
            deadline,
            input.requirements,
            input.min_gpa,
            input.reservation_category,
            input.lateral_entry_allowed,
            years_str,
            majors_str,
            input.other_criteria,
            posted_by,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn get_scholarship(&self, id: i64) -> Result<Option<Scholarship>> {
    let raw: Option<RawScholarship> = self
      .conn
      .call(move |conn| {
        let sql = format!("{SCHOLARSHIP_SELECT} WHERE s.id = ?1 AND s.is_active = 1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], read_scholarship)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawScholarship::into_scholarship).transpose()
  }

  async fn list_scholarships(&self) -> Result<Vec<Scholarship>> {
    let raws: Vec<RawScholarship> = self
      .conn
      .call(|conn| {
        let sql =
          format!("{SCHOLARSHIP_SELECT} WHERE s.is_active = 1 ORDER BY s.deadline ASC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], read_scholarship)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawScholarship::into_scholarship)
      .collect()
  }

  async fn update_scholarship(&self, id: i64, patch: ScholarshipPatch) -> Result<()> {
    let now_str    = encode_dt(Utc::now());
    let years_str  = encode_string_set(&patch.eligible_years)?;
    let majors_str = encode_string_set(&patch.eligible_majors)?;
    let deadline   = patch.deadline.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE scholarships SET
             title = ?1, description = ?2, amount = ?3, deadline = ?4,
             requirements = ?5, min_gpa = ?6, reservation_category = ?7,
             lateral_entry_allowed = ?8, eligible_years = ?9,
             eligible_majors = ?10, other_criteria = ?11, updated_at = ?12
           WHERE id = ?13",
          rusqlite::params![
            patch.title,
            patch.description,
            patch.amount,
            deadline,
            patch.requirements,
            patch.min_gpa,
            patch.reservation_category,
            patch.lateral_entry_allowed,
            years_str,
            majors_str,
            patch.other_criteria,
            now_str,
            id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn deactivate_scholarship(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE scholarships SET is_active = 0 WHERE id = ?1",
          rusqlite::params![id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn has_applied(&self, applicant_id: i64, scholarship_id: i64) -> Result<bool> {
    let found: bool = self
      .conn
      .call(move |conn| {
        let hit: Option<i64> = conn
          .query_row(
            "SELECT id FROM applications \
             WHERE applicant_id = ?1 AND scholarship_id = ?2",
            rusqlite::params![applicant_id, scholarship_id],
            |row| row.get(0),
          )
          .optional()?;
        Ok(hit.is_some())
      })
      .await?;
    Ok(found)
  }

  async fn add_application(&self, input: NewApplication) -> Result<()> {
    let now_str  = encode_dt(Utc::now());
    let urls_str = encode_string_set(&input.document_urls)?;
    let kind     = input.kind.as_str();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO applications (
             applicant_id, scholarship_id, opportunity_id, kind,
             cover_letter, document_urls, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.applicant_id,
            input.scholarship_id,
            input.opportunity_id,
            kind,
            input.cover_letter,
            urls_str,
            now_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Cascade deletion ──────────────────────────────────────────────────────

  async fn delete_member_cascade(&self, id: i64) -> Result<Option<DeletionReport>> {
    let outcome: Option<(RawMemberSummary, CascadeCounts)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Capture the member's identifying fields before anything is removed;
        // absence short-circuits without mutating.
        let member = tx
          .query_row(
            "SELECT id, email, name, role FROM users WHERE id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawMemberSummary {
                id:    row.get(0)?,
                email: row.get(1)?,
                name:  row.get(2)?,
                role:  row.get(3)?,
              })
            },
          )
          .optional()?;

        let Some(raw) = member else {
          return Ok(None);
        };

        let counts = CascadeCounts {
          stories:             tx.execute(
            "DELETE FROM stories WHERE author_id = ?1",
            rusqlite::params![id],
          )?,
          opportunities:       tx.execute(
            "DELETE FROM opportunities WHERE posted_by = ?1",
            rusqlite::params![id],
          )?,
          scholarships:        tx.execute(
            "DELETE FROM scholarships WHERE posted_by = ?1",
            rusqlite::params![id],
          )?,
          mentorship_requests: tx.execute(
            "DELETE FROM mentorship_requests WHERE student_id = ?1 OR mentor_id = ?1",
            rusqlite::params![id],
          )?,
          messages:            tx.execute(
            "DELETE FROM messages WHERE sender_id = ?1 OR receiver_id = ?1",
            rusqlite::params![id],
          )?,
          applications:        tx.execute(
            "DELETE FROM applications WHERE applicant_id = ?1",
            rusqlite::params![id],
          )?,
        };

        // The member row goes last so every dependent reference is already
        // gone when it disappears.
        tx.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?;

        tx.commit()?;
        Ok(Some((raw, counts)))
      })
      .await?;

    outcome
      .map(|(raw, counts)| {
        Ok(DeletionReport {
          member: raw.into_summary()?,
          counts,
        })
      })
      .transpose()
  }
}
