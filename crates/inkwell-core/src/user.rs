//! Users: the identities that author posts and comments.

use serde::{Deserialize, Serialize};

/// A registered user as seen by anyone outside the store.
///
/// Carries no credential material; see [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       i64,
  pub username: String,
  /// Unique across all users; compared case-sensitively.
  pub email:    String,
}

/// A user together with their stored password hash. Only the store and the
/// account service ever hold one of these.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  /// PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Input to [`crate::store::BlogStore::insert_user`]. The password has
/// already been hashed by the account service.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}
