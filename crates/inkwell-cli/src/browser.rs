//! The resource browser: a filtered, paginated view over a server-held
//! collection plus the confirm-then-mutate protocol, identical for posts and
//! comments.
//!
//! # Modals
//!
//! `creating`, `reading_all`, `reading_one` and `editing` are independent
//! flags; more than one may be set at a time. The front end decides which one
//! receives input.
//!
//! # Fetch sequencing
//!
//! Every fetch is stamped with a sequence number from [`Browser::start_fetch`].
//! [`Browser::apply_fetch`] only accepts the result of the most recently
//! started fetch, so a slow stale response can never overwrite a newer one.

use anyhow::Result;
use tracing::debug;

use crate::{
  prompt::{Confirmation, Notice, Prompter},
  resource::{Reply, Resource, ResourceApi},
  view::{self, View, ViewState},
};

/// How a mutation attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The server accepted it and the collection was re-fetched.
  Done,
  /// Local validation failed; nothing was sent.
  Invalid,
  /// The user declined the confirmation; nothing was sent.
  Declined,
  /// The server rejected it or the request failed.
  Failed,
}

pub struct Browser<R: Resource, A> {
  api:   A,
  items: Vec<R>,

  /// Search and page for the main grid.
  pub grid:  ViewState,
  /// Search and page for the read-all table, independent of `grid`.
  pub table: ViewState,
  /// Highlighted row within the grid's current page.
  pub cursor: usize,

  pub creating:    bool,
  pub reading_all: bool,
  pub reading_one: bool,
  pub editing:     bool,

  /// Item shown by the read-one and edit modals.
  selected:       Option<R>,
  /// Create form.
  pub draft:      R::Draft,
  /// Edit form, pre-filled from `selected`.
  pub edit_draft: R::Draft,
  /// Focused field of whichever form is active.
  pub field:      usize,

  latest_seq: u64,
  loading:    bool,
}

impl<R: Resource, A: ResourceApi<R>> Browser<R, A> {
  pub fn new(api: A) -> Self {
    Self {
      api,
      items: Vec::new(),
      grid: ViewState::default(),
      table: ViewState::default(),
      cursor: 0,
      creating: false,
      reading_all: false,
      reading_one: false,
      editing: false,
      selected: None,
      draft: R::Draft::default(),
      edit_draft: R::Draft::default(),
      field: 0,
      latest_seq: 0,
      loading: false,
    }
  }

  pub fn api(&self) -> &A { &self.api }

  pub fn items(&self) -> &[R] { &self.items }

  pub fn is_loading(&self) -> bool { self.loading }

  pub fn selected(&self) -> Option<&R> { self.selected.as_ref() }

  // ── Views ─────────────────────────────────────────────────────────────────

  pub fn grid_view(&self) -> View<'_, R> { view::compute(&self.items, &self.grid) }

  pub fn table_view(&self) -> View<'_, R> { view::compute(&self.items, &self.table) }

  /// The item under the grid cursor, if the current page has one there.
  pub fn highlighted(&self) -> Option<&R> {
    self.grid_view().items.get(self.cursor).copied()
  }

  pub fn cursor_down(&mut self) {
    let len = self.grid_view().items.len();
    if self.cursor + 1 < len {
      self.cursor += 1;
    }
  }

  pub fn cursor_up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  pub fn grid_next(&mut self) {
    let total = self.grid_view().total_pages;
    self.grid.next_page(total);
    self.cursor = 0;
  }

  pub fn grid_prev(&mut self) {
    self.grid.prev_page();
    self.cursor = 0;
  }

  pub fn table_next(&mut self) {
    let total = self.table_view().total_pages;
    self.table.next_page(total);
  }

  pub fn table_prev(&mut self) { self.table.prev_page(); }

  // ── Fetching ──────────────────────────────────────────────────────────────

  /// Begin a fetch: returns its sequence number and a handle to run it with.
  pub fn start_fetch(&mut self) -> (u64, A) {
    self.latest_seq += 1;
    self.loading = true;
    debug!(resource = R::NOUN, seq = self.latest_seq, "fetch started");
    (self.latest_seq, self.api.clone())
  }

  /// Apply the result of fetch `seq`.
  ///
  /// Returns `Ok(false)` when a newer fetch has been started since, in which
  /// case the result is dropped whatever it is.
  pub fn apply_fetch(&mut self, seq: u64, result: Result<Vec<R>>) -> Result<bool> {
    if seq != self.latest_seq {
      debug!(resource = R::NOUN, seq, latest = self.latest_seq, "stale fetch dropped");
      return Ok(false);
    }
    self.loading = false;
    self.items = result?;

    let len = self.grid_view().items.len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
    if let Some(selected) = &self.selected {
      let id = selected.id();
      self.selected = self.items.iter().find(|i| i.id() == id).cloned();
    }
    Ok(true)
  }

  /// Fetch and apply in place.
  pub async fn refresh(&mut self) -> Result<()> {
    let (seq, api) = self.start_fetch();
    let result = api.fetch().await;
    self.apply_fetch(seq, result).map(|_| ())
  }

  // ── Modals ────────────────────────────────────────────────────────────────

  pub fn open_create(&mut self) {
    self.creating = true;
    self.field = 0;
  }

  pub fn close_create(&mut self) { self.creating = false; }

  pub fn open_read_all(&mut self) { self.reading_all = true; }

  pub fn close_read_all(&mut self) { self.reading_all = false; }

  pub fn open_read_one(&mut self, id: i64) {
    if let Some(item) = self.find(id) {
      self.selected = Some(item);
      self.reading_one = true;
    }
  }

  pub fn close_read_one(&mut self) {
    self.reading_one = false;
    if !self.editing {
      self.selected = None;
    }
  }

  pub fn open_edit(&mut self, id: i64) {
    if let Some(item) = self.find(id) {
      self.edit_draft = item.to_draft();
      self.selected = Some(item);
      self.editing = true;
      self.field = 0;
    }
  }

  pub fn close_edit(&mut self) {
    self.editing = false;
    if !self.reading_one {
      self.selected = None;
    }
  }

  fn find(&self, id: i64) -> Option<R> {
    self.items.iter().find(|i| i.id() == id).cloned()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Validate the create form, confirm, send, and on success close the
  /// modal, clear the form and re-fetch.
  pub async fn submit_create<P: Prompter>(&mut self, prompt: &mut P) -> Outcome {
    let noun = R::NOUN;
    let draft = match R::check_create(&self.draft) {
      Ok(draft) => draft,
      Err(message) => {
        prompt.notify(Notice::error(message)).await;
        return Outcome::Invalid;
      }
    };

    let confirmation = Confirmation::new(
      format!("Create {noun}?"),
      format!("Do you want to Create this {noun}?"),
      "Create",
    );
    if !prompt.confirm(confirmation).await {
      return Outcome::Declined;
    }

    let reply = self.api.create(&draft).await;
    if !self.settle(reply, &format!("Unable to Create {noun}"), prompt).await {
      return Outcome::Failed;
    }

    self.creating = false;
    self.draft = R::Draft::default();
    self
      .finish(Notice::success("Success", format!("{noun} Created Successfully")), prompt)
      .await
  }

  /// Validate the edit form against the selected item, confirm, send only
  /// the changed fields, and on success close the modal and re-fetch.
  pub async fn submit_edit<P: Prompter>(&mut self, prompt: &mut P) -> Outcome {
    let noun = R::NOUN;
    let Some(selected) = self.selected.clone() else {
      return Outcome::Invalid;
    };
    let patch = match selected.check_update(&self.edit_draft) {
      Ok(patch) => patch,
      Err(message) => {
        prompt.notify(Notice::titled_error("Update", message)).await;
        return Outcome::Invalid;
      }
    };

    let confirmation = Confirmation::new(
      format!("Update {noun}?"),
      format!("Are you Sure you want to Update this {noun}?"),
      "Update",
    );
    if !prompt.confirm(confirmation).await {
      return Outcome::Declined;
    }

    let reply = self.api.update(selected.id(), patch).await;
    if !self.settle(reply, &format!("Failed to Update {noun}"), prompt).await {
      return Outcome::Failed;
    }

    self.editing = false;
    self.edit_draft = R::Draft::default();
    if !self.reading_one {
      self.selected = None;
    }
    self
      .finish(Notice::success("Update", format!("{noun} Updated Successfully")), prompt)
      .await
  }

  /// Confirm and delete item `id`; on success close any modal showing it and
  /// re-fetch.
  pub async fn delete<P: Prompter>(&mut self, id: i64, prompt: &mut P) -> Outcome {
    let noun = R::NOUN;
    let confirmation = Confirmation::new(
      format!("Delete {noun}?"),
      format!("Are you Sure you want to Delete this {noun}?"),
      "Delete",
    );
    if !prompt.confirm(confirmation).await {
      return Outcome::Declined;
    }

    let reply = self.api.delete(id).await;
    if !self.settle(reply, &format!("Failed to Delete {noun}"), prompt).await {
      return Outcome::Failed;
    }

    if self.selected.as_ref().is_some_and(|s| s.id() == id) {
      self.selected = None;
      self.reading_one = false;
      self.editing = false;
    }
    self
      .finish(Notice::success("Delete!", format!("{noun} Deleted Successfully")), prompt)
      .await
  }

  /// Surface a rejection or transport failure; `true` when accepted.
  async fn settle<P: Prompter>(
    &self,
    reply: Result<Reply>,
    fallback: &str,
    prompt: &mut P,
  ) -> bool {
    match reply {
      Ok(Reply::Accepted) => true,
      Ok(Reply::Rejected(message)) => {
        let message = if message.is_empty() { fallback.to_owned() } else { message };
        prompt.notify(Notice::error(message)).await;
        false
      }
      Err(e) => {
        tracing::warn!(resource = R::NOUN, error = %e, "request failed");
        prompt.notify(Notice::error(fallback)).await;
        false
      }
    }
  }

  async fn finish<P: Prompter>(&mut self, notice: Notice, prompt: &mut P) -> Outcome {
    prompt.notify(notice).await;
    if let Err(e) = self.refresh().await {
      prompt.notify(Notice::error(format!("Refresh failed: {e}"))).await;
    }
    Outcome::Done
  }
}

#[cfg(test)]
mod tests;
