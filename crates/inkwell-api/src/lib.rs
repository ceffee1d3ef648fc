//! JSON REST API for Inkwell.
//!
//! Exposes an axum [`Router`] backed by any [`inkwell_core::store::BlogStore`].
//! Every endpoint is unauthenticated at the transport level; TLS and CORS are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = inkwell_api::api_router(Arc::new(store));
//! ```

pub mod accounts;
pub mod comments;
pub mod error;
pub mod extract;
pub mod posts;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use inkwell_core::store::BlogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BlogStore + 'static,
{
  Router::new()
    // Accounts
    .route("/register", post(accounts::register::<S>))
    .route("/login", post(accounts::login::<S>))
    // Posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}", put(posts::update::<S>).delete(posts::delete::<S>))
    // Comments; GET takes a post id, PUT/DELETE a comment id
    .route("/comments", post(comments::create::<S>))
    .route(
      "/comments/{id}",
      get(comments::list::<S>)
        .put(comments::update::<S>)
        .delete(comments::delete::<S>),
    )
    .with_state(store)
}
