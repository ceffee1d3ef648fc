//! Blocking yes/no prompts and notices, as seen by the browser and account
//! flows. The terminal front end draws them as modal dialogs; tests script
//! them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
  Info,
}

/// A message the user must acknowledge before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind:  NoticeKind,
  pub title: String,
  pub text:  String,
}

impl Notice {
  pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
    Self { kind: NoticeKind::Success, title: title.into(), text: text.into() }
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self::titled_error("Error", text)
  }

  pub fn titled_error(title: impl Into<String>, text: impl Into<String>) -> Self {
    Self { kind: NoticeKind::Error, title: title.into(), text: text.into() }
  }

  pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
    Self { kind: NoticeKind::Info, title: title.into(), text: text.into() }
  }
}

/// A question that must be answered yes or no before a mutation is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
  pub title:  String,
  pub text:   String,
  /// Label of the affirmative choice, e.g. `"Delete"`.
  pub action: &'static str,
}

impl Confirmation {
  pub fn new(
    title: impl Into<String>,
    text: impl Into<String>,
    action: &'static str,
  ) -> Self {
    Self { title: title.into(), text: text.into(), action }
  }
}

/// Shows confirmations and notices and waits for the user.
pub trait Prompter {
  /// `true` when the user accepted.
  async fn confirm(&mut self, confirmation: Confirmation) -> bool;

  /// Returns once the notice has been dismissed.
  async fn notify(&mut self, notice: Notice);
}
