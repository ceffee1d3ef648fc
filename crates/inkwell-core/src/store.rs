//! The `BlogStore` trait.
//!
//! Implemented by storage backends (e.g. `inkwell-store-sqlite`). The HTTP
//! layer and the account service depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  Error,
  comment::{Comment, NewComment},
  post::{NewPost, Post, PostPatch},
  user::{NewUser, User, UserCredentials},
};

/// Lets callers tell a domain failure (bad input, missing row, taken email)
/// from an infrastructure fault without knowing the backend's error type.
pub trait Classify {
  /// The domain error wrapped by this error, if that is what it is.
  fn domain(&self) -> Option<&Error>;
}

impl Classify for Error {
  fn domain(&self) -> Option<&Error> { self.is_domain().then_some(self) }
}

/// Abstraction over an Inkwell persistence backend.
///
/// Domain failures come back as the backend error wrapping an [`Error`];
/// [`Classify::domain`] extracts it.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Classify + From<Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with [`Error::EmailTaken`] if the email is
  /// already registered.
  fn insert_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look a user up by exact email, returning the credential record.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Every post, newest `created_at` first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Insert a post. The author check and the insert are atomic; fails with
  /// [`Error::AuthorNotFound`] if the author does not exist.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Apply a validated patch, refresh `updated_at`, and return the post as
  /// stored afterwards. Fails with [`Error::PostNotFound`].
  fn update_post(
    &self,
    id: i64,
    patch: PostPatch,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Hard delete; the post's comments go with it.
  fn delete_post(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Comments on `post_id`, highest id first.
  fn list_comments(
    &self,
    post_id: i64,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  /// Insert a comment after checking that both the post and the author
  /// exist, and return the row as re-read by its generated id.
  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn update_comment(
    &self,
    id: i64,
    content: String,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
