//! The `{status, message?, <payload>?}` wrapper returned by mutation
//! endpoints.
//!
//! Business-rule failures arrive as `status: "error"` with a readable
//! `message`, usually alongside HTTP 200. Callers branch on [`Status`], not on
//! the HTTP status code.

use serde::{Deserialize, Serialize};

use crate::{comment::Comment, post::Post, user::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Success,
  Error,
}

/// A response envelope carrying an optional payload `P`, whose fields are
/// flattened next to `status` and `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<P = Empty> {
  pub status:  Status,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(flatten)]
  pub payload: Option<P>,
}

/// Payload of envelopes that carry nothing but status and message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
  pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPayload {
  pub post: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
  pub comment: Comment,
}

impl<P> Envelope<P> {
  pub fn success(payload: P) -> Self {
    Self {
      status:  Status::Success,
      message: None,
      payload: Some(payload),
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      status:  Status::Error,
      message: Some(message.into()),
      payload: None,
    }
  }

  pub fn is_success(&self) -> bool { self.status == Status::Success }

  /// The payload on success, or the server's message on error.
  pub fn into_result(self) -> Result<Option<P>, String> {
    match self.status {
      Status::Success => Ok(self.payload),
      Status::Error => Err(self.message.unwrap_or_default()),
    }
  }
}
