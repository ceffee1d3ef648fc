//! Posts and the inputs that create or modify them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A blog post as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub author_id:  i64,
  /// Set at insert; never changes.
  pub created_at: DateTime<Utc>,
  /// Set at insert and refreshed by every successful update.
  pub updated_at: DateTime<Utc>,
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Raw create request as it arrives from a client; any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostInput {
  pub title:     Option<String>,
  pub content:   Option<String>,
  pub author_id: Option<i64>,
}

/// A create request that passed validation. Title and content are trimmed
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
  pub title:     String,
  pub content:   String,
  pub author_id: i64,
}

impl PostInput {
  pub fn validate(self) -> Result<NewPost> {
    let title = trimmed(self.title);
    let content = trimmed(self.content);
    match (title, content, self.author_id) {
      (Some(title), Some(content), Some(author_id)) => {
        Ok(NewPost { title, content, author_id })
      }
      _ => Err(Error::required("Title, content and author are")),
    }
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial update: only the fields that are present change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content: Option<String>,
}

impl PostPatch {
  /// Fails with [`Error::NothingToUpdate`] when no field is supplied, and with
  /// a validation error when a supplied field is blank. Supplied fields come
  /// back trimmed.
  pub fn validate(self) -> Result<Self> {
    if self.is_empty() {
      return Err(Error::NothingToUpdate);
    }
    let title = self.title.map(|t| non_blank(t, "Title")).transpose()?;
    let content = self.content.map(|c| non_blank(c, "Content")).transpose()?;
    Ok(Self { title, content })
  }

  pub fn is_empty(&self) -> bool { self.title.is_none() && self.content.is_none() }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `Some(trimmed)` when the value is present and not blank.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

pub(crate) fn non_blank(value: String, field: &str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    Err(Error::Validation(format!("{field} cannot be empty")))
  } else {
    Ok(value.to_owned())
  }
}
