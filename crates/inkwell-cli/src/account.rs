//! Client-side register and login flows: local validation, confirmation,
//! and the server call.

use std::sync::LazyLock;

use inkwell_core::envelope::UserPayload;
use regex::Regex;

use crate::{
  client::ApiClient,
  prompt::{Confirmation, Notice, Prompter},
  resource::Form,
  session::Session,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern compiles")
});

const SPECIALS: &str = "@$!%*?&";

pub const PASSWORD_RULES: &str = "Password Must Contain: One Uppercase Letter, \
  One Lowercase Letter, One Number, One Special Character (@$!%*?&), \
  Password Length: 8 to 12 Characters";

pub fn is_valid_email(email: &str) -> bool { EMAIL.is_match(email) }

/// 8 to 12 characters from letters, digits and `@$!%*?&`, with at least one of
/// each: uppercase, lowercase, digit, special.
pub fn is_valid_password(password: &str) -> bool {
  let len = password.chars().count();
  (8..=12).contains(&len)
    && password
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c))
    && password.chars().any(|c| c.is_ascii_uppercase())
    && password.chars().any(|c| c.is_ascii_lowercase())
    && password.chars().any(|c| c.is_ascii_digit())
    && password.chars().any(|c| SPECIALS.contains(c))
}

// ─── Forms ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl Form for RegisterForm {
  const LABELS: &'static [&'static str] = &["Username", "Email", "Password"];

  fn field(&self, index: usize) -> &str {
    match index {
      0 => &self.username,
      1 => &self.email,
      _ => &self.password,
    }
  }

  fn field_mut(&mut self, index: usize) -> Option<&mut String> {
    match index {
      0 => Some(&mut self.username),
      1 => Some(&mut self.email),
      2 => Some(&mut self.password),
      _ => None,
    }
  }

  fn is_secret(index: usize) -> bool { index == 2 }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
}

impl Form for LoginForm {
  const LABELS: &'static [&'static str] = &["Email", "Password"];

  fn field(&self, index: usize) -> &str {
    match index {
      0 => &self.email,
      _ => &self.password,
    }
  }

  fn field_mut(&mut self, index: usize) -> Option<&mut String> {
    match index {
      0 => Some(&mut self.email),
      1 => Some(&mut self.password),
      _ => None,
    }
  }

  fn is_secret(index: usize) -> bool { index == 1 }
}

// ─── Flows ────────────────────────────────────────────────────────────────────

/// Validate, confirm and submit a registration. Returns `true` when the
/// server accepted it; the caller then clears the form and opens login.
pub async fn register<P: Prompter>(
  client: &ApiClient,
  form: &RegisterForm,
  prompt: &mut P,
) -> bool {
  let username = form.username.trim();
  let email = form.email.trim();

  if username.is_empty() || email.is_empty() || form.password.is_empty() {
    prompt.notify(Notice::error("All Fields are Required")).await;
    return false;
  }
  if !is_valid_email(email) {
    prompt
      .notify(Notice::titled_error("Invalid Email", "Please Enter a Valid Email Address"))
      .await;
    return false;
  }
  if !is_valid_password(&form.password) {
    prompt
      .notify(Notice::titled_error("Invalid Password", PASSWORD_RULES))
      .await;
    return false;
  }

  let confirmation =
    Confirmation::new("Confirm Registration", "Do you want to Register?", "Register");
  if !prompt.confirm(confirmation).await {
    return false;
  }

  match client.register(username, email, &form.password).await {
    Ok(envelope) if envelope.is_success() => {
      tracing::info!(%email, "registered");
      let text = envelope
        .message
        .unwrap_or_else(|| "User Registered Successfully".into());
      prompt.notify(Notice::success("Success", text)).await;
      true
    }
    Ok(envelope) => {
      prompt
        .notify(Notice::error(envelope.message.unwrap_or_default()))
        .await;
      false
    }
    Err(e) => {
      tracing::warn!(error = %e, "register request failed");
      prompt.notify(Notice::error("Registration Failed")).await;
      false
    }
  }
}

/// Validate and submit a login. On success returns the new [`Session`].
pub async fn login<P: Prompter>(
  client: &ApiClient,
  form: &LoginForm,
  prompt: &mut P,
) -> Option<Session> {
  let email = form.email.trim();

  if email.is_empty() || form.password.is_empty() {
    prompt
      .notify(Notice::error("Please Enter Email Address & Password"))
      .await;
    return None;
  }
  if !is_valid_email(email) {
    prompt
      .notify(Notice::titled_error("Invalid Email", "Please enter a valid email address"))
      .await;
    return None;
  }

  match client.login(email, &form.password).await.map(|e| e.into_result()) {
    Ok(Ok(Some(UserPayload { user }))) => {
      tracing::info!(user_id = user.id, "signed in");
      prompt
        .notify(Notice::success("Success", "User Login Successfully"))
        .await;
      Some(Session::new(user))
    }
    Ok(Ok(None)) => {
      prompt
        .notify(Notice::titled_error("User Login Failed", "Login Failed"))
        .await;
      None
    }
    Ok(Err(message)) => {
      prompt
        .notify(Notice::titled_error("User Login Failed", message))
        .await;
      None
    }
    Err(e) => {
      tracing::warn!(error = %e, "login request failed");
      prompt
        .notify(Notice::titled_error("User Login Failed", "Login Failed"))
        .await;
      None
    }
  }
}

/// Ask before signing out. `true` means the caller should drop the session.
pub async fn confirm_logout<P: Prompter>(prompt: &mut P) -> bool {
  let confirmation =
    Confirmation::new("Are you Sure?", "Do you want to Logout?", "Logout");
  if !prompt.confirm(confirmation).await {
    return false;
  }
  prompt
    .notify(Notice::info("Log Out", "You have been Log Out Successfully"))
    .await;
  true
}
