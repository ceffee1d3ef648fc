//! Async HTTP client wrapping the Inkwell JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use inkwell_core::{
  comment::{Comment, CommentInput, CommentPatch},
  envelope::{CommentPayload, Empty, Envelope, PostPayload, UserPayload},
  post::{Post, PostInput, PostPatch},
};
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Connection settings for the Inkwell API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self { Self { base_url: DEFAULT_URL.into() } }
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
  username: &'a str,
  email:    &'a str,
  password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
  email:    &'a str,
  password: &'a str,
}

/// Async HTTP client for the Inkwell JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Decode a list endpoint's bare array.
  async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
    let resp = self
      .client
      .get(self.url(path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {path} → {}", resp.status()));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising GET {path}"))
  }

  /// Decode a mutation endpoint's envelope. Internal failures arrive as HTTP
  /// 500 with an error envelope, which is returned like any other.
  async fn envelope<P: DeserializeOwned>(
    resp: Response,
    what: &str,
  ) -> Result<Envelope<P>> {
    let status = resp.status();
    let bytes = resp
      .bytes()
      .await
      .with_context(|| format!("reading {what} response"))?;
    serde_json::from_slice(&bytes)
      .with_context(|| format!("{what} → {status}: unexpected response body"))
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /register`
  pub async fn register(
    &self,
    username: &str,
    email: &str,
    password: &str,
  ) -> Result<Envelope> {
    let resp = self
      .client
      .post(self.url("/register"))
      .json(&RegisterRequest { username, email, password })
      .send()
      .await
      .context("POST /register failed")?;
    Self::envelope(resp, "POST /register").await
  }

  /// `POST /login`
  pub async fn login(&self, email: &str, password: &str) -> Result<Envelope<UserPayload>> {
    let resp = self
      .client
      .post(self.url("/login"))
      .json(&LoginRequest { email, password })
      .send()
      .await
      .context("POST /login failed")?;
    Self::envelope(resp, "POST /login").await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  /// `GET /posts`
  pub async fn list_posts(&self) -> Result<Vec<Post>> { self.list("/posts").await }

  /// `POST /posts`
  pub async fn create_post(&self, input: &PostInput) -> Result<Envelope> {
    let resp = self
      .client
      .post(self.url("/posts"))
      .json(input)
      .send()
      .await
      .context("POST /posts failed")?;
    Self::envelope(resp, "POST /posts").await
  }

  /// `PUT /posts/:id`
  pub async fn update_post(
    &self,
    id: i64,
    patch: &PostPatch,
  ) -> Result<Envelope<PostPayload>> {
    let resp = self
      .client
      .put(self.url(&format!("/posts/{id}")))
      .json(patch)
      .send()
      .await
      .context("PUT /posts failed")?;
    Self::envelope(resp, "PUT /posts").await
  }

  /// `DELETE /posts/:id`
  pub async fn delete_post(&self, id: i64) -> Result<Envelope> {
    let resp = self
      .client
      .delete(self.url(&format!("/posts/{id}")))
      .send()
      .await
      .context("DELETE /posts failed")?;
    Self::envelope(resp, "DELETE /posts").await
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  /// `GET /comments/:post_id`
  pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
    self.list(&format!("/comments/{post_id}")).await
  }

  /// `POST /comments`
  pub async fn create_comment(
    &self,
    input: &CommentInput,
  ) -> Result<Envelope<CommentPayload>> {
    let resp = self
      .client
      .post(self.url("/comments"))
      .json(input)
      .send()
      .await
      .context("POST /comments failed")?;
    Self::envelope(resp, "POST /comments").await
  }

  /// `PUT /comments/:id`
  pub async fn update_comment(&self, id: i64, patch: &CommentPatch) -> Result<Envelope> {
    let resp = self
      .client
      .put(self.url(&format!("/comments/{id}")))
      .json(patch)
      .send()
      .await
      .context("PUT /comments failed")?;
    Self::envelope(resp, "PUT /comments").await
  }

  /// `DELETE /comments/:id`
  pub async fn delete_comment(&self, id: i64) -> Result<Envelope<Empty>> {
    let resp = self
      .client
      .delete(self.url(&format!("/comments/{id}")))
      .send()
      .await
      .context("DELETE /comments failed")?;
    Self::envelope(resp, "DELETE /comments").await
  }
}
