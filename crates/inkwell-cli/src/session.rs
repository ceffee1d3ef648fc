//! Who is signed in, and where they may go.
//!
//! A [`Session`] exists from a successful login until logout or process exit.
//! Nothing is persisted; a restart always begins signed out.

use inkwell_core::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub user: User,
}

impl Session {
  pub fn new(user: User) -> Self { Self { user } }

  pub fn user_id(&self) -> i64 { self.user.id }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Home,
  Posts,
}

/// The route actually shown when `wanted` is requested. Posts require a
/// session; without one the user lands on Home.
pub fn guard(wanted: Route, session: Option<&Session>) -> Route {
  match (wanted, session) {
    (Route::Posts, None) => Route::Home,
    (route, _) => route,
  }
}
