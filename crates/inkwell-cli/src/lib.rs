//! Terminal client for Inkwell.
//!
//! The library half holds everything that can be exercised without a
//! terminal: the HTTP client, the resource browser and its pure view
//! computation, sessions, and the account flows. The `inkwell` binary draws
//! it with ratatui.

// Prompter is only ever driven from the UI task, so its futures need not be
// `Send`.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod browser;
pub mod client;
pub mod prompt;
pub mod resource;
pub mod session;
pub mod view;

pub use browser::{Browser, Outcome};
pub use client::{ApiClient, ApiConfig};
pub use session::{Route, Session};
