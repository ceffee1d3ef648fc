//! Handlers for `/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/comments/:post_id` | Bare array, highest id first |
//! | `POST`   | `/comments` | Body: [`CommentInput`]; returns the stored `comment` |
//! | `PUT`    | `/comments/:id` | Body: `{"content":"..."}` |
//! | `DELETE` | `/comments/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use inkwell_core::{
  Error,
  comment::{Comment, CommentInput, CommentPatch},
  envelope::{CommentPayload, Empty, Envelope},
  store::BlogStore,
};

use crate::{
  error::ApiError,
  extract::{Body, path_id},
};

/// `GET /comments/:post_id`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: BlogStore,
{
  // An unparsable post id matches no comments.
  let Ok(Path(post_id)) = post_id else {
    return Ok(Json(Vec::new()));
  };
  let comments = store
    .list_comments(post_id)
    .await
    .map_err(ApiError::store("Failed to fetch comments"))?;
  Ok(Json(comments))
}

/// `POST /comments`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<CommentInput>,
) -> Result<Json<Envelope<CommentPayload>>, ApiError>
where
  S: BlogStore,
{
  let input = body.validate()?;
  let comment = store
    .create_comment(input)
    .await
    .map_err(ApiError::store("Failed to create comment"))?;
  Ok(Json(Envelope::success(CommentPayload { comment })))
}

/// `PUT /comments/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  Body(body): Body<CommentPatch>,
) -> Result<Json<Envelope>, ApiError>
where
  S: BlogStore,
{
  let id = path_id(id, Error::CommentNotFound)?;
  let content = body.validate()?;
  store
    .update_comment(id, content)
    .await
    .map_err(ApiError::store("Failed to update comment"))?;
  Ok(Json(
    Envelope::success(Empty {}).with_message("Comment updated successfully"),
  ))
}

/// `DELETE /comments/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope>, ApiError>
where
  S: BlogStore,
{
  let id = path_id(id, Error::CommentNotFound)?;
  store
    .delete_comment(id)
    .await
    .map_err(ApiError::store("Failed to delete comment"))?;
  Ok(Json(
    Envelope::success(Empty {}).with_message("Comment deleted successfully"),
  ))
}
