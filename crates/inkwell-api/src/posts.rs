//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Bare array, newest first |
//! | `POST`   | `/posts` | Body: [`PostInput`] |
//! | `PUT`    | `/posts/:id` | Body: [`PostPatch`]; returns the stored `post` |
//! | `DELETE` | `/posts/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use inkwell_core::{
  Error,
  envelope::{Empty, Envelope, PostPayload},
  post::{Post, PostInput, PostPatch},
  store::BlogStore,
};

use crate::{
  error::ApiError,
  extract::{Body, path_id},
};

/// `GET /posts`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Post>>, ApiError>
where
  S: BlogStore,
{
  let posts = store
    .list_posts()
    .await
    .map_err(ApiError::store("Failed to Fetch Posts"))?;
  Ok(Json(posts))
}

/// `POST /posts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<PostInput>,
) -> Result<Json<Envelope>, ApiError>
where
  S: BlogStore,
{
  let input = body.validate()?;
  let post = store
    .create_post(input)
    .await
    .map_err(ApiError::store("Server Error"))?;

  tracing::info!(post_id = post.id, author_id = post.author_id, "post created");
  Ok(Json(
    Envelope::success(Empty {}).with_message("Post created successfully"),
  ))
}

/// `PUT /posts/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  Body(body): Body<PostPatch>,
) -> Result<Json<Envelope<PostPayload>>, ApiError>
where
  S: BlogStore,
{
  let id = path_id(id, Error::PostNotFound)?;
  let patch = body.validate()?;
  let post = store
    .update_post(id, patch)
    .await
    .map_err(ApiError::store("Failed to Update Post"))?;
  Ok(Json(Envelope::success(PostPayload { post })))
}

/// `DELETE /posts/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope>, ApiError>
where
  S: BlogStore,
{
  let id = path_id(id, Error::PostNotFound)?;
  store
    .delete_post(id)
    .await
    .map_err(ApiError::store("Failed to Delete Post"))?;

  tracing::info!(post_id = id, "post deleted");
  Ok(Json(
    Envelope::success(Empty {}).with_message("Post Deleted Successfully"),
  ))
}
