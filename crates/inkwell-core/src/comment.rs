//! Comments attached to posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  post::{non_blank, trimmed},
};

/// The one canonical comment shape exchanged at every boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:         i64,
  pub post_id:    i64,
  pub content:    String,
  pub author_id:  i64,
  pub created_at: DateTime<Utc>,
}

/// Raw create request; any field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentInput {
  pub post_id:   Option<i64>,
  pub content:   Option<String>,
  pub author_id: Option<i64>,
}

/// A validated create request with trimmed, non-empty content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  pub post_id:   i64,
  pub content:   String,
  pub author_id: i64,
}

impl CommentInput {
  pub fn validate(self) -> Result<NewComment> {
    match (self.post_id, trimmed(self.content), self.author_id) {
      (Some(post_id), Some(content), Some(author_id)) => {
        Ok(NewComment { post_id, content, author_id })
      }
      _ => Err(Error::Validation("Missing fields".into())),
    }
  }
}

/// Body of a comment update. Content is the only mutable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPatch {
  pub content: Option<String>,
}

impl CommentPatch {
  /// The trimmed replacement content.
  pub fn validate(self) -> Result<String> {
    match self.content {
      Some(content) => non_blank(content, "Content"),
      None => Err(Error::required("Content")),
    }
  }
}
