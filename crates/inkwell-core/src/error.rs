//! Error types for `inkwell-core`.
//!
//! Every variant except [`Error::Hash`] is a *domain* failure: the caller did
//! something the rules forbid and can correct it. Domain failures travel back
//! to clients as an error envelope; everything else is an internal fault.

use strum::{AsRefStr, Display};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),

  #[error("Email Already Exists!")]
  EmailTaken,

  #[error("User Not Found!")]
  UserNotFound,

  #[error("Invalid Password!")]
  BadPassword,

  #[error("Author does not exist")]
  AuthorNotFound(i64),

  #[error("Post Not Found!")]
  PostNotFound(i64),

  #[error("Comment not found")]
  CommentNotFound(i64),

  #[error("Nothing to Update")]
  NothingToUpdate,

  #[error("password hashing failed: {0}")]
  Hash(String),
}

/// Coarse classification of an [`Error`], mirroring how a client is expected
/// to recover from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
  /// A required field is missing or empty; fix the input.
  Validation,
  /// The email is already registered; choose another.
  Conflict,
  /// The target row is absent; re-fetch the collection.
  NotFound,
  /// Bad credentials; retry.
  Auth,
  /// Storage or hashing failure; retry later.
  Internal,
}

impl Error {
  pub fn class(&self) -> ErrorClass {
    match self {
      Self::Validation(_) | Self::NothingToUpdate => ErrorClass::Validation,
      Self::EmailTaken => ErrorClass::Conflict,
      Self::UserNotFound
      | Self::AuthorNotFound(_)
      | Self::PostNotFound(_)
      | Self::CommentNotFound(_) => ErrorClass::NotFound,
      Self::BadPassword => ErrorClass::Auth,
      Self::Hash(_) => ErrorClass::Internal,
    }
  }

  /// `true` for failures the caller caused and can act on.
  pub fn is_domain(&self) -> bool { self.class() != ErrorClass::Internal }

  pub(crate) fn required(what: &str) -> Self {
    Self::Validation(format!("{what} required"))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classes() {
    assert_eq!(Error::EmailTaken.class(), ErrorClass::Conflict);
    assert_eq!(Error::BadPassword.class(), ErrorClass::Auth);
    assert_eq!(Error::PostNotFound(3).class(), ErrorClass::NotFound);
    assert_eq!(Error::NothingToUpdate.class(), ErrorClass::Validation);
    assert!(!Error::Hash("boom".into()).is_domain());
    assert_eq!(ErrorClass::NotFound.as_ref(), "not_found");
  }

  #[test]
  fn messages_are_user_facing() {
    assert_eq!(Error::EmailTaken.to_string(), "Email Already Exists!");
    assert_eq!(Error::PostNotFound(9).to_string(), "Post Not Found!");
    assert_eq!(
      Error::required("Content").to_string(),
      "Content required"
    );
  }
}
