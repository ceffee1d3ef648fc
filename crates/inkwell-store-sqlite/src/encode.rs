//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order is chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use inkwell_core::{
  comment::Comment,
  post::Post,
  user::{User, UserCredentials},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, username, email, password";
pub const POST_COLUMNS: &str =
  "id, title, content, author_id, created_at, updated_at";
pub const COMMENT_COLUMNS: &str = "id, post_id, content, author_id, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:       i64,
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      username: row.get(1)?,
      email:    row.get(2)?,
      password: row.get(3)?,
    })
  }

  pub fn into_credentials(self) -> UserCredentials {
    UserCredentials {
      user:          User {
        id:       self.id,
        username: self.username,
        email:    self.email,
      },
      password_hash: self.password,
    }
  }
}

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub author_id:  i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      author_id:  row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:         self.id,
      title:      self.title,
      content:    self.content,
      author_id:  self.author_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub id:         i64,
  pub post_id:    i64,
  pub content:    String,
  pub author_id:  i64,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      post_id:    row.get(1)?,
      content:    row.get(2)?,
      author_id:  row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         self.id,
      post_id:    self.post_id,
      content:    self.content,
      author_id:  self.author_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let encoded = encode_dt(whole);
    assert_eq!(encoded, "2024-01-02T03:04:05.000000Z");
    assert_eq!(decode_dt(&encoded).unwrap(), whole);
  }

  #[test]
  fn bad_timestamp_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
