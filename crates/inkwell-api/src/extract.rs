//! Extractors that answer malformed requests with an error envelope instead
//! of axum's plain-text rejections.

use axum::{
  Json,
  extract::{
    FromRequest, Path, Request,
    rejection::{JsonRejection, PathRejection},
  },
};
use inkwell_core::Error;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// A JSON request body.
///
/// A request without a JSON content type is read as `{}` and so reaches the
/// handler's required-field checks. A body that does not parse into `T` is a
/// validation failure.
pub struct Body<T>(pub T);

impl<T, S> FromRequest<S> for Body<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    match Json::<T>::from_request(req, state).await {
      Ok(Json(value)) => Ok(Self(value)),
      Err(JsonRejection::MissingJsonContentType(_)) => {
        serde_json::from_str("{}").map(Self).map_err(|_| invalid_body())
      }
      Err(rejection) => {
        tracing::debug!(%rejection, "unreadable request body");
        Err(invalid_body())
      }
    }
  }
}

fn invalid_body() -> ApiError { Error::Validation("Invalid Request Body".into()).into() }

/// Resolve a numeric path id.
///
/// An id that does not parse names no row, so it is answered exactly like an
/// absent one: with `missing`.
pub fn path_id(
  id: Result<Path<i64>, PathRejection>,
  missing: fn(i64) -> Error,
) -> Result<i64, ApiError> {
  id.map(|Path(id)| id).map_err(|rejection| {
    tracing::debug!(%rejection, "unparsable id");
    // Row ids start at 1.
    ApiError::from(missing(0))
  })
}
