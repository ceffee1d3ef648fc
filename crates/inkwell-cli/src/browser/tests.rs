//! Browser protocol tests against an in-memory fake API.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use chrono::Utc;
use inkwell_core::{
  comment::{Comment, CommentPatch},
  post::{Post, PostPatch},
};

use super::*;
use crate::{
  prompt::{NoticeKind, scripted::ScriptedPrompter},
  resource::{CommentDraft, PostDraft},
};

#[derive(Default)]
struct Server {
  posts:   Vec<Post>,
  next_id: i64,
  /// When set, mutations are answered with this rejection.
  reject:  Option<String>,
  /// When set, every request fails at the transport level.
  offline: bool,
  sent:    Vec<String>,
}

#[derive(Clone, Default)]
struct FakeApi(Arc<Mutex<Server>>);

impl FakeApi {
  fn with_posts(n: i64) -> Self {
    let api = Self::default();
    {
      let mut s = api.0.lock().unwrap();
      for i in 1..=n {
        s.posts.push(post(i, &format!("Post {i}")));
      }
      s.next_id = n + 1;
    }
    api
  }

  fn sent(&self) -> Vec<String> { self.0.lock().unwrap().sent.clone() }

  fn mutate(&self, what: String, apply: impl FnOnce(&mut Vec<Post>) -> bool) -> Result<Reply> {
    let mut s = self.0.lock().unwrap();
    if s.offline {
      return Err(anyhow!("connection refused"));
    }
    s.sent.push(what);
    if let Some(message) = s.reject.clone() {
      return Ok(Reply::Rejected(message));
    }
    if apply(&mut s.posts) {
      Ok(Reply::Accepted)
    } else {
      Ok(Reply::Rejected("Post Not Found!".into()))
    }
  }
}

fn post(id: i64, title: &str) -> Post {
  Post {
    id,
    title: title.into(),
    content: "body".into(),
    author_id: 1,
    created_at: Utc::now(),
    updated_at: Utc::now(),
  }
}

impl ResourceApi<Post> for FakeApi {
  async fn fetch(&self) -> Result<Vec<Post>> {
    let s = self.0.lock().unwrap();
    if s.offline {
      return Err(anyhow!("connection refused"));
    }
    // Newest first, as the server lists them.
    let mut posts = s.posts.clone();
    posts.reverse();
    Ok(posts)
  }

  async fn create(&self, draft: &PostDraft) -> Result<Reply> {
    let id = self.0.lock().unwrap().next_id;
    let reply = self.mutate(format!("create {}", draft.title), |posts| {
      let mut p = post(id, &draft.title);
      p.content = draft.content.clone();
      posts.push(p);
      true
    })?;
    if reply == Reply::Accepted {
      self.0.lock().unwrap().next_id += 1;
    }
    Ok(reply)
  }

  async fn update(&self, id: i64, patch: PostPatch) -> Result<Reply> {
    self.mutate(format!("update {id} {patch:?}"), |posts| {
      match posts.iter_mut().find(|p| p.id == id) {
        Some(p) => {
          if let Some(t) = patch.title {
            p.title = t;
          }
          if let Some(c) = patch.content {
            p.content = c;
          }
          true
        }
        None => false,
      }
    })
  }

  async fn delete(&self, id: i64) -> Result<Reply> {
    self.mutate(format!("delete {id}"), |posts| {
      let before = posts.len();
      posts.retain(|p| p.id != id);
      posts.len() != before
    })
  }
}

async fn loaded(n: i64) -> Browser<Post, FakeApi> {
  let mut b = Browser::new(FakeApi::with_posts(n));
  b.refresh().await.unwrap();
  b
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn grid_and_table_keep_separate_state() {
  let mut b = loaded(12).await;

  b.grid_next();
  b.table.set_search("Post 1");
  assert_eq!(b.grid.page(), 2);
  assert_eq!(b.table.page(), 1);
  assert_eq!(b.grid.search(), "");

  let grid: Vec<_> = b.grid_view().items.iter().map(|p| p.id).collect();
  assert_eq!(grid, [6, 7, 8, 9, 10]);

  // "Post 1", "Post 10", "Post 11", "Post 12"
  assert_eq!(b.table_view().matched, 4);
}

#[tokio::test]
async fn paging_stops_at_bounds() {
  let mut b = loaded(7).await;
  b.grid_prev();
  assert_eq!(b.grid.page(), 1);
  b.grid_next();
  b.grid_next();
  assert_eq!(b.grid.page(), 2);
}

#[tokio::test]
async fn cursor_tracks_current_page() {
  let mut b = loaded(6).await;
  for _ in 0..10 {
    b.cursor_down();
  }
  assert_eq!(b.highlighted().unwrap().id, 5);
  b.grid_next();
  assert_eq!(b.highlighted().unwrap().id, 6);
  b.cursor_down();
  assert_eq!(b.cursor, 0);
}

// ─── Fetch sequencing ────────────────────────────────────────────────────────

#[tokio::test]
async fn stale_fetch_is_dropped() {
  let mut b = Browser::new(FakeApi::with_posts(2));

  let (old, api_old) = b.start_fetch();
  let (new, api_new) = b.start_fetch();
  assert!(new > old);

  let fresh = api_new.fetch().await;
  assert!(b.apply_fetch(new, fresh).unwrap());
  assert_eq!(b.items().len(), 2);
  assert!(!b.is_loading());

  // The older request finishes last and carries a different answer.
  let stale = Ok(vec![post(99, "stale")]);
  drop(api_old);
  assert!(!b.apply_fetch(old, stale).unwrap());
  assert_eq!(b.items().len(), 2);
}

#[tokio::test]
async fn failed_current_fetch_keeps_items() {
  let mut b = loaded(3).await;
  b.api().0.lock().unwrap().offline = true;
  assert!(b.refresh().await.is_err());
  assert_eq!(b.items().len(), 3);
  assert!(!b.is_loading());
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_confirmed_closes_clears_and_refetches() {
  let mut b = loaded(1).await;
  b.open_create();
  b.draft = PostDraft { title: "  Fresh ".into(), content: "words".into() };

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Done);

  assert!(!b.creating);
  assert_eq!(b.draft, PostDraft::default());
  assert_eq!(b.items().len(), 2);
  assert!(b.items().iter().any(|p| p.title == "Fresh"));
  assert_eq!(b.api().sent(), ["create Fresh"]);
  assert_eq!(prompt.confirmations[0].title, "Create Post?");
  assert_eq!(prompt.last_notice().unwrap().kind, NoticeKind::Success);
}

#[tokio::test]
async fn create_declined_sends_nothing() {
  let mut b = loaded(1).await;
  b.open_create();
  b.draft = PostDraft { title: "T".into(), content: "C".into() };

  let mut prompt = ScriptedPrompter::answering([false]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Declined);

  assert!(b.creating);
  assert_eq!(b.draft.title, "T");
  assert!(b.api().sent().is_empty());
  assert!(prompt.notices.is_empty());
}

#[tokio::test]
async fn create_invalid_never_prompts() {
  let mut b = loaded(0).await;
  b.open_create();
  b.draft = PostDraft { title: "T".into(), content: "   ".into() };

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Invalid);

  assert!(prompt.confirmations.is_empty());
  assert_eq!(prompt.last_notice().unwrap().text, "Post Content Cannot be Empty");
  assert!(b.api().sent().is_empty());
}

#[tokio::test]
async fn create_rejected_leaves_modal_open() {
  let mut b = loaded(0).await;
  b.api().0.lock().unwrap().reject = Some("Author does not exist".into());
  b.open_create();
  b.draft = PostDraft { title: "T".into(), content: "C".into() };

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Failed);

  assert!(b.creating);
  assert_eq!(b.draft.title, "T");
  let notice = prompt.last_notice().unwrap();
  assert_eq!(notice.kind, NoticeKind::Error);
  assert_eq!(notice.text, "Author does not exist");
}

#[tokio::test]
async fn create_transport_failure_shows_generic_message() {
  let mut b = loaded(0).await;
  b.api().0.lock().unwrap().offline = true;
  b.open_create();
  b.draft = PostDraft { title: "T".into(), content: "C".into() };

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Failed);
  assert_eq!(prompt.last_notice().unwrap().text, "Unable to Create Post");
  assert!(b.creating);
}

// ─── Edit ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_sends_only_changed_fields() {
  let mut b = loaded(2).await;
  b.open_edit(2);
  assert!(b.editing);
  assert_eq!(b.edit_draft.title, "Post 2");

  b.edit_draft.title = "Renamed".into();
  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_edit(&mut prompt).await, Outcome::Done);

  assert!(!b.editing);
  assert!(b.selected().is_none());
  assert_eq!(
    b.api().sent(),
    [format!(
      "update 2 {:?}",
      PostPatch { title: Some("Renamed".into()), content: None }
    )]
  );
  assert!(b.items().iter().any(|p| p.id == 2 && p.title == "Renamed"));
}

#[tokio::test]
async fn edit_without_changes_is_invalid() {
  let mut b = loaded(1).await;
  b.open_edit(1);
  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_edit(&mut prompt).await, Outcome::Invalid);
  assert_eq!(prompt.last_notice().unwrap().text, "Nothing to Update");
  assert!(b.editing);
}

#[tokio::test]
async fn edit_of_unknown_item_does_not_open() {
  let mut b = loaded(1).await;
  b.open_edit(42);
  assert!(!b.editing);
  assert!(b.selected().is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_closes_read_one_for_that_item() {
  let mut b = loaded(3).await;
  b.open_read_one(2);
  assert!(b.reading_one);

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.delete(2, &mut prompt).await, Outcome::Done);

  assert!(!b.reading_one);
  assert!(b.selected().is_none());
  let ids: Vec<_> = b.items().iter().map(|p| p.id).collect();
  assert_eq!(ids, [3, 1]);
  assert_eq!(prompt.confirmations[0].action, "Delete");
}

#[tokio::test]
async fn delete_missing_surfaces_server_message() {
  let mut b = loaded(1).await;
  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.delete(9, &mut prompt).await, Outcome::Failed);
  assert_eq!(prompt.last_notice().unwrap().text, "Post Not Found!");
  assert_eq!(b.items().len(), 1);
}

#[tokio::test]
async fn modals_are_independent() {
  let mut b = loaded(2).await;
  b.open_read_all();
  b.open_create();
  b.open_read_one(1);
  assert!(b.reading_all && b.creating && b.reading_one);

  b.close_create();
  assert!(b.reading_all && b.reading_one);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Thread {
  comments: Vec<Comment>,
  sent:     Vec<String>,
}

#[derive(Clone, Default)]
struct FakeComments(Arc<Mutex<Thread>>);

fn comment(id: i64, content: &str) -> Comment {
  Comment {
    id,
    post_id: 1,
    content: content.into(),
    author_id: 1,
    created_at: Utc::now(),
  }
}

impl ResourceApi<Comment> for FakeComments {
  async fn fetch(&self) -> Result<Vec<Comment>> {
    let mut comments = self.0.lock().unwrap().comments.clone();
    comments.sort_by_key(|c| std::cmp::Reverse(c.id));
    Ok(comments)
  }

  async fn create(&self, draft: &CommentDraft) -> Result<Reply> {
    let mut t = self.0.lock().unwrap();
    t.sent.push(format!("create {}", draft.content));
    let id = t.comments.len() as i64 + 1;
    t.comments.push(comment(id, &draft.content));
    Ok(Reply::Accepted)
  }

  async fn update(&self, id: i64, patch: CommentPatch) -> Result<Reply> {
    let mut t = self.0.lock().unwrap();
    t.sent.push(format!("update {id} {patch:?}"));
    match (t.comments.iter_mut().find(|c| c.id == id), patch.content) {
      (Some(c), Some(content)) => {
        c.content = content;
        Ok(Reply::Accepted)
      }
      _ => Ok(Reply::Rejected("Comment not found".into())),
    }
  }

  async fn delete(&self, id: i64) -> Result<Reply> {
    let mut t = self.0.lock().unwrap();
    t.sent.push(format!("delete {id}"));
    let before = t.comments.len();
    t.comments.retain(|c| c.id != id);
    if t.comments.len() == before {
      Ok(Reply::Rejected("Comment not found".into()))
    } else {
      Ok(Reply::Accepted)
    }
  }
}

async fn thread(contents: &[&str]) -> Browser<Comment, FakeComments> {
  let api = FakeComments::default();
  {
    let mut t = api.0.lock().unwrap();
    for (i, content) in contents.iter().enumerate() {
      t.comments.push(comment(i as i64 + 1, content));
    }
  }
  let mut b = Browser::new(api);
  b.refresh().await.unwrap();
  b
}

#[tokio::test]
async fn comment_create_trims_and_confirms() {
  let mut b = thread(&[]).await;
  b.open_create();
  b.draft = CommentDraft { content: "  hi  ".into() };

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_create(&mut prompt).await, Outcome::Done);

  assert_eq!(prompt.confirmations[0].title, "Create Comment?");
  assert_eq!(b.api().0.lock().unwrap().sent, ["create hi"]);
  assert_eq!(b.items()[0].content, "hi");
  assert_eq!(b.draft, CommentDraft::default());
}

#[tokio::test]
async fn comment_edit_sends_new_content() {
  let mut b = thread(&["first", "second"]).await;
  b.open_edit(1);
  assert_eq!(b.edit_draft.content, "first");
  b.edit_draft.content = " changed ".into();

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.submit_edit(&mut prompt).await, Outcome::Done);

  assert!(!b.editing);
  assert_eq!(prompt.confirmations[0].title, "Update Comment?");
  assert_eq!(
    prompt.last_notice().unwrap().text,
    "Comment Updated Successfully"
  );
  assert_eq!(
    b.api().0.lock().unwrap().sent,
    [format!(
      "update 1 {:?}",
      CommentPatch { content: Some("changed".into()) }
    )]
  );
  assert!(b.items().iter().any(|c| c.id == 1 && c.content == "changed"));
}

#[tokio::test]
async fn comment_edit_rejects_unchanged_or_blank_content() {
  let mut b = thread(&["same"]).await;
  b.open_edit(1);

  let mut prompt = ScriptedPrompter::default();
  assert_eq!(b.submit_edit(&mut prompt).await, Outcome::Invalid);
  assert_eq!(prompt.last_notice().unwrap().text, "Nothing to Update");

  b.edit_draft.content = "   ".into();
  assert_eq!(b.submit_edit(&mut prompt).await, Outcome::Invalid);
  assert_eq!(prompt.last_notice().unwrap().text, "Comment Cannot be Empty!");

  assert!(prompt.confirmations.is_empty());
  assert!(b.editing);
  assert!(b.api().0.lock().unwrap().sent.is_empty());
}

#[tokio::test]
async fn comment_delete_confirms_then_refetches() {
  let mut b = thread(&["a", "b"]).await;

  let mut prompt = ScriptedPrompter::answering([false, true]);
  assert_eq!(b.delete(2, &mut prompt).await, Outcome::Declined);
  assert_eq!(b.items().len(), 2);

  assert_eq!(b.delete(2, &mut prompt).await, Outcome::Done);
  assert_eq!(prompt.confirmations[1].title, "Delete Comment?");
  let ids: Vec<_> = b.items().iter().map(|c| c.id).collect();
  assert_eq!(ids, [1]);

  let mut prompt = ScriptedPrompter::answering([true]);
  assert_eq!(b.delete(2, &mut prompt).await, Outcome::Failed);
  assert_eq!(prompt.last_notice().unwrap().text, "Comment not found");
}
