//! [`SqliteStore`], the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use inkwell_core::{
  comment::{Comment, NewComment},
  post::{NewPost, Post, PostPatch},
  store::BlogStore,
  user::{NewUser, User, UserCredentials},
};

use crate::{
  Result,
  encode::{
    COMMENT_COLUMNS, POST_COLUMNS, RawComment, RawPost, RawUser, USER_COLUMNS,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Inkwell store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome of a guarded insert: which precondition failed, if any.
enum Guarded<T> {
  Inserted(T),
  MissingAuthor,
  MissingPost,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("schema initialised");
    Ok(())
  }
}

/// `true` when `err` is a UNIQUE constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

fn user_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM users WHERE id = ?1", [id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

fn post_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM posts WHERE id = ?1", [id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

fn select_post(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawPost>> {
  conn
    .query_row(
      &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
      [id],
      RawPost::from_row,
    )
    .optional()
}

fn select_comment(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(
      &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
      [id],
      RawComment::from_row,
    )
    .optional()
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn insert_user(&self, input: NewUser) -> Result<User> {
    let NewUser { username, email, password_hash } = input;

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row("SELECT 1 FROM users WHERE email = ?1", [&email], |_| {
            Ok(())
          })
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        let inserted = tx.execute(
          "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
          rusqlite::params![username, email, password_hash],
        );
        // Another writer on the same file may claim the email between the
        // check and the insert.
        match inserted {
          Err(e) if is_unique_violation(&e) => return Ok(None),
          other => other?,
        };
        let id = tx.last_insert_rowid();
        let raw = tx.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
          [id],
          RawUser::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .map(|r| r.into_credentials().user)
      .ok_or_else(|| inkwell_core::Error::EmailTaken.into())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              [email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawUser::into_credentials))
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
              [id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(|r| r.into_credentials().user))
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn get_post(&self, id: i64) -> Result<Option<Post>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_post(conn, id)?))
      .await?;
    raw.map(RawPost::into_post).transpose()
  }

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let NewPost { title, content, author_id } = input;
    let now = encode_dt(Utc::now());

    // Author check and insert share one transaction so a concurrent delete
    // cannot slip between them.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !user_exists(&tx, author_id)? {
          return Ok(Guarded::MissingAuthor);
        }
        tx.execute(
          "INSERT INTO posts (title, content, author_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![title, content, author_id, now],
        )?;
        let raw = select_post(&tx, tx.last_insert_rowid())?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(Guarded::Inserted(raw))
      })
      .await?;

    match outcome {
      Guarded::Inserted(raw) => raw.into_post(),
      Guarded::MissingAuthor | Guarded::MissingPost => {
        Err(inkwell_core::Error::AuthorNotFound(author_id).into())
      }
    }
  }

  async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Post> {
    let PostPatch { title, content } = patch;
    let now = encode_dt(Utc::now());

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE posts
              SET title      = COALESCE(?1, title),
                  content    = COALESCE(?2, content),
                  updated_at = ?3
            WHERE id = ?4",
          rusqlite::params![title, content, now, id],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(select_post(conn, id)?)
      })
      .await?;

    raw
      .ok_or(inkwell_core::Error::PostNotFound(id))?
      .into_post()
  }

  async fn delete_post(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM posts WHERE id = ?1", [id])?))
      .await?;

    if affected == 0 {
      return Err(inkwell_core::Error::PostNotFound(id).into());
    }
    Ok(())
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map([post_id], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let NewComment { post_id, content, author_id } = input;
    let now = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !post_exists(&tx, post_id)? {
          return Ok(Guarded::MissingPost);
        }
        if !user_exists(&tx, author_id)? {
          return Ok(Guarded::MissingAuthor);
        }
        tx.execute(
          "INSERT INTO comments (post_id, content, author_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![post_id, content, author_id, now],
        )?;
        let raw = select_comment(&tx, tx.last_insert_rowid())?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(Guarded::Inserted(raw))
      })
      .await?;

    match outcome {
      Guarded::Inserted(raw) => raw.into_comment(),
      Guarded::MissingPost => Err(inkwell_core::Error::PostNotFound(post_id).into()),
      Guarded::MissingAuthor => {
        Err(inkwell_core::Error::AuthorNotFound(author_id).into())
      }
    }
  }

  async fn update_comment(&self, id: i64, content: String) -> Result<Comment> {
    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE comments SET content = ?1 WHERE id = ?2",
          rusqlite::params![content, id],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(select_comment(conn, id)?)
      })
      .await?;

    raw
      .ok_or(inkwell_core::Error::CommentNotFound(id))?
      .into_comment()
  }

  async fn delete_comment(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])?)
      })
      .await?;

    if affected == 0 {
      return Err(inkwell_core::Error::CommentNotFound(id).into());
    }
    Ok(())
  }
}
