//! The two browsable resources (posts and comments) and the API seam the
//! [`Browser`](crate::browser::Browser) drives them through.

use std::future::Future;

use anyhow::Result;
use inkwell_core::{
  comment::{Comment, CommentInput, CommentPatch},
  envelope::Envelope,
  post::{Post, PostInput, PostPatch},
};

use crate::client::ApiClient;

// ─── Forms ────────────────────────────────────────────────────────────────────

/// A fixed set of labelled text fields edited in a modal.
pub trait Form: Default + Clone + Send + Sync + 'static {
  const LABELS: &'static [&'static str];

  fn field(&self, index: usize) -> &str;

  fn field_mut(&mut self, index: usize) -> Option<&mut String>;

  /// Whether field `index` should be masked when drawn.
  fn is_secret(_index: usize) -> bool { false }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
  pub title:   String,
  pub content: String,
}

impl Form for PostDraft {
  const LABELS: &'static [&'static str] = &["Title", "Content"];

  fn field(&self, index: usize) -> &str {
    match index {
      0 => &self.title,
      _ => &self.content,
    }
  }

  fn field_mut(&mut self, index: usize) -> Option<&mut String> {
    match index {
      0 => Some(&mut self.title),
      1 => Some(&mut self.content),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
  pub content: String,
}

impl Form for CommentDraft {
  const LABELS: &'static [&'static str] = &["Comment"];

  fn field(&self, _index: usize) -> &str { &self.content }

  fn field_mut(&mut self, index: usize) -> Option<&mut String> {
    (index == 0).then_some(&mut self.content)
  }
}

// ─── Resource ─────────────────────────────────────────────────────────────────

/// A server-held record the browser can list, search, and mutate.
pub trait Resource: Clone + Send + Sync + 'static {
  /// Form used to create or edit one.
  type Draft: Form;
  /// What an update sends to the server.
  type Patch: Send + 'static;

  /// Singular noun used in dialogs, e.g. `"Post"`.
  const NOUN: &'static str;

  fn id(&self) -> i64;

  /// The text fields the search term is matched against.
  fn haystacks(&self) -> Vec<&str>;

  /// A form pre-filled with this item's current values.
  fn to_draft(&self) -> Self::Draft;

  /// Check a create form locally, returning it trimmed or the message to show.
  fn check_create(draft: &Self::Draft) -> Result<Self::Draft, String>;

  /// Work out what an edit changes, or the message to show when it is
  /// invalid or changes nothing.
  fn check_update(&self, draft: &Self::Draft) -> Result<Self::Patch, String>;
}

const NOTHING_TO_UPDATE: &str = "Nothing to Update";

impl Resource for Post {
  type Draft = PostDraft;
  type Patch = PostPatch;

  const NOUN: &'static str = "Post";

  fn id(&self) -> i64 { self.id }

  fn haystacks(&self) -> Vec<&str> { vec![&self.title, &self.content] }

  fn to_draft(&self) -> PostDraft {
    PostDraft { title: self.title.clone(), content: self.content.clone() }
  }

  fn check_create(draft: &PostDraft) -> Result<PostDraft, String> {
    let title = draft.title.trim();
    let content = draft.content.trim();
    match (title.is_empty(), content.is_empty()) {
      (true, true) => Err("Post All Fields are Required".into()),
      (true, false) => Err("Post Title Cannot be Empty".into()),
      (false, true) => Err("Post Content Cannot be Empty".into()),
      (false, false) => Ok(PostDraft { title: title.into(), content: content.into() }),
    }
  }

  fn check_update(&self, draft: &PostDraft) -> Result<PostPatch, String> {
    let title = draft.title.trim();
    let content = draft.content.trim();
    if title.is_empty() {
      return Err("Post Title Cannot be Empty".into());
    }
    if content.is_empty() {
      return Err("Post Content Cannot be Empty".into());
    }

    let patch = PostPatch {
      title:   (title != self.title).then(|| title.to_owned()),
      content: (content != self.content).then(|| content.to_owned()),
    };
    if patch.is_empty() {
      return Err(NOTHING_TO_UPDATE.into());
    }
    Ok(patch)
  }
}

impl Resource for Comment {
  type Draft = CommentDraft;
  type Patch = CommentPatch;

  const NOUN: &'static str = "Comment";

  fn id(&self) -> i64 { self.id }

  fn haystacks(&self) -> Vec<&str> { vec![&self.content] }

  fn to_draft(&self) -> CommentDraft {
    CommentDraft { content: self.content.clone() }
  }

  fn check_create(draft: &CommentDraft) -> Result<CommentDraft, String> {
    match draft.content.trim() {
      "" => Err("Comment Cannot be Empty!".into()),
      content => Ok(CommentDraft { content: content.into() }),
    }
  }

  fn check_update(&self, draft: &CommentDraft) -> Result<CommentPatch, String> {
    match draft.content.trim() {
      "" => Err("Comment Cannot be Empty!".into()),
      content if content == self.content => Err(NOTHING_TO_UPDATE.into()),
      content => Ok(CommentPatch { content: Some(content.into()) }),
    }
  }
}

// ─── API seam ─────────────────────────────────────────────────────────────────

/// The server's verdict on a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
  Accepted,
  /// `status: "error"`; the message is shown verbatim.
  Rejected(String),
}

impl<P> From<Envelope<P>> for Reply {
  fn from(envelope: Envelope<P>) -> Self {
    match envelope.into_result() {
      Ok(_) => Reply::Accepted,
      Err(message) => Reply::Rejected(message),
    }
  }
}

/// Remote operations on one collection of `R`.
///
/// `Err` means the request never produced an envelope (transport failure or
/// an unreadable body).
pub trait ResourceApi<R: Resource>: Clone + Send + Sync + 'static {
  /// The full collection, as the server orders it.
  fn fetch(&self) -> impl Future<Output = Result<Vec<R>>> + Send + '_;

  fn create<'a>(
    &'a self,
    draft: &'a R::Draft,
  ) -> impl Future<Output = Result<Reply>> + Send + 'a;

  fn update(
    &self,
    id: i64,
    patch: R::Patch,
  ) -> impl Future<Output = Result<Reply>> + Send + '_;

  fn delete(&self, id: i64) -> impl Future<Output = Result<Reply>> + Send + '_;
}

/// Posts over HTTP. New posts are authored by `author_id`.
#[derive(Clone)]
pub struct PostsApi {
  pub client:    ApiClient,
  pub author_id: i64,
}

impl ResourceApi<Post> for PostsApi {
  async fn fetch(&self) -> Result<Vec<Post>> { self.client.list_posts().await }

  async fn create(&self, draft: &PostDraft) -> Result<Reply> {
    let input = PostInput {
      title:     Some(draft.title.clone()),
      content:   Some(draft.content.clone()),
      author_id: Some(self.author_id),
    };
    Ok(self.client.create_post(&input).await?.into())
  }

  async fn update(&self, id: i64, patch: PostPatch) -> Result<Reply> {
    Ok(self.client.update_post(id, &patch).await?.into())
  }

  async fn delete(&self, id: i64) -> Result<Reply> {
    Ok(self.client.delete_post(id).await?.into())
  }
}

/// Comments on one post over HTTP. New comments are authored by `author_id`.
#[derive(Clone)]
pub struct CommentsApi {
  pub client:    ApiClient,
  pub post_id:   i64,
  pub author_id: i64,
}

impl ResourceApi<Comment> for CommentsApi {
  async fn fetch(&self) -> Result<Vec<Comment>> {
    self.client.list_comments(self.post_id).await
  }

  async fn create(&self, draft: &CommentDraft) -> Result<Reply> {
    let input = CommentInput {
      post_id:   Some(self.post_id),
      content:   Some(draft.content.clone()),
      author_id: Some(self.author_id),
    };
    Ok(self.client.create_comment(&input).await?.into())
  }

  async fn update(&self, id: i64, patch: CommentPatch) -> Result<Reply> {
    Ok(self.client.update_comment(id, &patch).await?.into())
  }

  async fn delete(&self, id: i64) -> Result<Reply> {
    Ok(self.client.delete_comment(id).await?.into())
  }
}
