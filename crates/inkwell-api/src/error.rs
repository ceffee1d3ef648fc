//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Domain failures answer HTTP 200 with an error envelope; anything else is
//! logged and answered with HTTP 500 and a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use inkwell_core::{
  ErrorClass,
  envelope::{Empty, Envelope},
  store::Classify,
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A business rule rejected the request; `message` is shown to the user.
  #[error("{message}")]
  Domain { class: ErrorClass, message: String },

  /// An unexpected failure. `context` is the only text the client sees.
  #[error("{context}: {source}")]
  Internal {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Map a store error, keeping domain failures visible and hiding the rest
  /// behind `context`.
  pub fn store<E>(context: &'static str) -> impl FnOnce(E) -> Self
  where
    E: Classify + std::error::Error + Send + Sync + 'static,
  {
    move |e| {
      let domain = e.domain().map(|d| (d.class(), d.to_string()));
      match domain {
        Some((class, message)) => Self::Domain { class, message },
        None => Self::Internal { context, source: Box::new(e) },
      }
    }
  }
}

impl From<inkwell_core::Error> for ApiError {
  fn from(e: inkwell_core::Error) -> Self { ApiError::store("Server Error")(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Domain { class, message } => {
        tracing::debug!(class = %class, %message, "request rejected");
        (StatusCode::OK, Json(Envelope::<Empty>::error(message))).into_response()
      }
      ApiError::Internal { context, source } => {
        tracing::error!(error = %source, "{context}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::<Empty>::error(context)))
          .into_response()
      }
    }
  }
}
