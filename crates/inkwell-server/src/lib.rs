//! HTTP server assembly for Inkwell.
//!
//! Wraps [`inkwell_api::api_router`] with request tracing and a permissive
//! CORS policy, and defines the configuration the binary reads at startup.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use inkwell_core::store::BlogStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INKWELL_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".into(),
      port:       5000,
      store_path: PathBuf::from("inkwell.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: API routes, tracing, and CORS.
pub fn app<S>(store: S) -> Router
where
  S: BlogStore + 'static,
{
  inkwell_api::api_router(Arc::new(store))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}
