//! SQL schema for the Cohort SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    email                TEXT NOT NULL UNIQUE,
    password_hash        TEXT NOT NULL,
    name                 TEXT NOT NULL,
    role                 TEXT NOT NULL,   -- 'student' | 'alumni' | 'admin'
    created_at           TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    gpa                  REAL,
    reservation_category TEXT,
    is_lateral_entry     INTEGER NOT NULL DEFAULT 0,
    graduation_year      INTEGER,
    major                TEXT,
    company              TEXT,
    position             TEXT
);

-- Scholarships are retired by flipping is_active, never deleted,
-- except when their posting member is removed by the cascade.
CREATE TABLE IF NOT EXISTS scholarships (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    title                 TEXT NOT NULL,
    description           TEXT,
    amount                REAL,
    deadline              TEXT,            -- ISO 8601 date
    requirements          TEXT,
    min_gpa               REAL,
    reservation_category  TEXT,            -- 'All' means unrestricted
    lateral_entry_allowed INTEGER NOT NULL DEFAULT 1,
    eligible_years        TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    eligible_majors       TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    other_criteria        TEXT,
    posted_by             INTEGER NOT NULL REFERENCES users(id),
    is_active             INTEGER NOT NULL DEFAULT 1,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL
);

-- An application targets a scholarship or an opportunity, never both.
-- The posting references are soft: a posting removed by a member cascade
-- may leave applications from other members behind.
CREATE TABLE IF NOT EXISTS applications (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    applicant_id   INTEGER NOT NULL REFERENCES users(id),
    scholarship_id INTEGER,
    opportunity_id INTEGER,
    kind           TEXT NOT NULL,   -- 'scholarship' | 'opportunity'
    cover_letter   TEXT,
    document_urls  TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    created_at     TEXT NOT NULL,
    UNIQUE (applicant_id, scholarship_id)
);

CREATE TABLE IF NOT EXISTS stories (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id  INTEGER NOT NULL REFERENCES users(id),
    title      TEXT NOT NULL,
    content    TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS opportunities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    posted_by   INTEGER NOT NULL REFERENCES users(id),
    title       TEXT NOT NULL,
    description TEXT,
    company     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS mentorship_requests (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES users(id),
    mentor_id  INTEGER NOT NULL REFERENCES users(id),
    message    TEXT,
    status     TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id   INTEGER NOT NULL REFERENCES users(id),
    receiver_id INTEGER NOT NULL REFERENCES users(id),
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS scholarships_posted_by_idx ON scholarships(posted_by);
CREATE INDEX IF NOT EXISTS scholarships_active_idx    ON scholarships(is_active);
CREATE INDEX IF NOT EXISTS applications_applicant_idx ON applications(applicant_id);
CREATE INDEX IF NOT EXISTS stories_author_idx         ON stories(author_id);
CREATE INDEX IF NOT EXISTS opportunities_poster_idx   ON opportunities(posted_by);
CREATE INDEX IF NOT EXISTS mentorship_student_idx     ON mentorship_requests(student_id);
CREATE INDEX IF NOT EXISTS mentorship_mentor_idx      ON mentorship_requests(mentor_id);
CREATE INDEX IF NOT EXISTS messages_sender_idx        ON messages(sender_id);
CREATE INDEX IF NOT EXISTS messages_receiver_idx      ON messages(receiver_id);

PRAGMA user_version = 1;
";
