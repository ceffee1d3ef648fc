//! Account service: registration and login on top of any [`BlogStore`].
//!
//! No password-strength policy is enforced here; that belongs to whichever
//! client collects the password.

use crate::{
  Error, credential,
  store::BlogStore,
  user::{NewUser, User},
};

/// Register a new user. Fails with [`Error::EmailTaken`] if a user with
/// exactly this email already exists.
pub async fn register<S: BlogStore>(
  store: &S,
  username: &str,
  email: &str,
  password: &str,
) -> Result<User, S::Error> {
  if store.find_user_by_email(email).await?.is_some() {
    return Err(Error::EmailTaken.into());
  }

  let password_hash = credential::hash(password)?;
  store
    .insert_user(NewUser {
      username: username.to_owned(),
      email: email.to_owned(),
      password_hash,
    })
    .await
}

/// Authenticate by email and password.
///
/// Returns the public [`User`]; the stored hash never leaves this function.
pub async fn login<S: BlogStore>(
  store: &S,
  email: &str,
  password: &str,
) -> Result<User, S::Error> {
  let record = store
    .find_user_by_email(email)
    .await?
    .ok_or(Error::UserNotFound)?;

  if !credential::verify(password, &record.password_hash) {
    return Err(Error::BadPassword.into());
  }
  Ok(record.user)
}
