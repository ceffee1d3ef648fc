//! Handlers for `/register` and `/login`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | Body: `{"username","email","password"}` |
//! | `POST` | `/login` | Body: `{"email","password"}`; returns `user` without credentials |

use std::sync::Arc;

use axum::{Json, extract::State};
use inkwell_core::{
  Error, account,
  envelope::{Empty, Envelope, UserPayload},
  store::BlogStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::Body};

fn present(field: Option<String>) -> Option<String> {
  field.filter(|f| !f.is_empty())
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /register`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<RegisterBody>,
) -> Result<Json<Envelope>, ApiError>
where
  S: BlogStore,
{
  let (Some(username), Some(email), Some(password)) = (
    present(body.username),
    present(body.email),
    present(body.password),
  ) else {
    return Err(Error::Validation("All Fields are Required".into()).into());
  };

  let user = account::register(store.as_ref(), &username, &email, &password)
    .await
    .map_err(ApiError::store("Registration Failed"))?;

  tracing::info!(user_id = user.id, "user registered");
  Ok(Json(
    Envelope::success(Empty {}).with_message("User Registered Successfully"),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /login`
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<LoginBody>,
) -> Result<Json<Envelope<UserPayload>>, ApiError>
where
  S: BlogStore,
{
  let (Some(email), Some(password)) = (present(body.email), present(body.password))
  else {
    return Err(
      Error::Validation("Please Enter Email Address & Password".into()).into(),
    );
  };

  let user = account::login(store.as_ref(), &email, &password)
    .await
    .map_err(|e| {
      let err = ApiError::store("Login Failed")(e);
      if let ApiError::Domain { message, .. } = &err {
        tracing::warn!(%message, "login rejected");
      }
      err
    })?;

  tracing::info!(user_id = user.id, "user logged in");
  Ok(Json(
    Envelope::success(UserPayload { user }).with_message("Login Successfully"),
  ))
}
