//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use inkwell_cli::{
  ApiClient, Browser, Route, Session,
  account::{self, LoginForm, RegisterForm},
  prompt::Prompter,
  resource::{CommentsApi, Form, PostsApi, Resource, ResourceApi},
  session,
};
use inkwell_core::{comment::Comment, post::Post};
use tokio::sync::mpsc::UnboundedSender;

pub type PostBrowser = Browser<Post, PostsApi>;
pub type CommentBrowser = Browser<Comment, CommentsApi>;

// ─── Messages ─────────────────────────────────────────────────────────────────

/// Results of background fetches, delivered to the event loop.
pub enum Msg {
  Posts(u64, anyhow::Result<Vec<Post>>),
  Comments {
    post_id: i64,
    seq:     u64,
    result:  anyhow::Result<Vec<Comment>>,
  },
}

// ─── Focus helpers ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
  Grid,
  Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountModal {
  Login,
  Register,
}

enum FormKey {
  Editing,
  Submit,
  Cancel,
}

/// Whether a browser consumed a key.
#[derive(PartialEq, Eq)]
enum Handled {
  Yes,
  No,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub client: ApiClient,

  /// Present from login until logout.
  pub session: Option<Session>,
  pub route:   Route,

  /// Open account form on the home screen, if any.
  pub account:       Option<AccountModal>,
  pub login_form:    LoginForm,
  pub register_form: RegisterForm,
  pub account_field: usize,

  /// Exists while signed in.
  pub posts:    Option<PostBrowser>,
  /// Comments panel for one post.
  pub comments: Option<CommentBrowser>,
  /// Title of the post whose comments are open.
  pub comments_title: String,

  /// Which search box is receiving keystrokes.
  pub searching: Option<Search>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  tx: UnboundedSender<Msg>,
}

impl App {
  pub fn new(client: ApiClient, tx: UnboundedSender<Msg>) -> Self {
    Self {
      client,
      session: None,
      route: Route::Home,
      account: None,
      login_form: LoginForm::default(),
      register_form: RegisterForm::default(),
      account_field: 0,
      posts: None,
      comments: None,
      comments_title: String::new(),
      searching: None,
      status_msg: String::new(),
      tx,
    }
  }

  // ── Background fetches ────────────────────────────────────────────────────

  pub fn fetch_posts(&mut self) {
    let Some(browser) = &mut self.posts else { return };
    let (seq, api) = browser.start_fetch();
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = api.fetch().await;
      let _ = tx.send(Msg::Posts(seq, result));
    });
  }

  pub fn fetch_comments(&mut self) {
    let Some(browser) = &mut self.comments else { return };
    let (seq, api) = browser.start_fetch();
    let post_id = api.post_id;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = api.fetch().await;
      let _ = tx.send(Msg::Comments { post_id, seq, result });
    });
  }

  /// Apply a finished background fetch.
  pub fn apply(&mut self, msg: Msg) {
    let applied = match msg {
      Msg::Posts(seq, result) => match &mut self.posts {
        Some(browser) => browser.apply_fetch(seq, result),
        None => Ok(false),
      },
      Msg::Comments { post_id, seq, result } => match &mut self.comments {
        Some(browser) if browser.api().post_id == post_id => {
          browser.apply_fetch(seq, result)
        }
        _ => Ok(false),
      },
    };
    match applied {
      Ok(true) => self.status_msg.clear(),
      Ok(false) => {}
      Err(e) => {
        tracing::warn!(error = %e, "fetch failed");
        self.status_msg = format!("Error: {e:#}");
      }
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub fn navigate(&mut self, wanted: Route) {
    self.route = session::guard(wanted, self.session.as_ref());
    if self.route != wanted {
      self.status_msg = "Log in to see posts".into();
    }
  }

  fn sign_in(&mut self, session: Session) {
    let api = PostsApi { client: self.client.clone(), author_id: session.user_id() };
    self.session = Some(session);
    self.posts = Some(Browser::new(api));
    self.comments = None;
    self.fetch_posts();
    self.navigate(Route::Posts);
  }

  fn sign_out(&mut self) {
    self.session = None;
    self.posts = None;
    self.comments = None;
    self.searching = None;
    self.navigate(Route::Home);
  }

  fn open_comments(&mut self, post: &Post) {
    let Some(session) = &self.session else { return };
    let api = CommentsApi {
      client:    self.client.clone(),
      post_id:   post.id,
      author_id: session.user_id(),
    };
    self.comments = Some(Browser::new(api));
    self.comments_title = post.title.clone();
    self.searching = None;
    self.fetch_comments();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key<P: Prompter>(
    &mut self,
    key: KeyEvent,
    prompt: &mut P,
  ) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.route {
      Route::Home => self.handle_home_key(key, prompt).await,
      Route::Posts => self.handle_posts_key(key, prompt).await,
    }
  }

  async fn handle_home_key<P: Prompter>(
    &mut self,
    key: KeyEvent,
    prompt: &mut P,
  ) -> anyhow::Result<bool> {
    match self.account {
      Some(AccountModal::Login) => {
        match form_key(&mut self.login_form, &mut self.account_field, key) {
          FormKey::Submit => {
            if let Some(session) =
              account::login(&self.client, &self.login_form, prompt).await
            {
              self.login_form = LoginForm::default();
              self.account = None;
              self.sign_in(session);
            }
          }
          FormKey::Cancel => self.account = None,
          FormKey::Editing => {}
        }
        return Ok(true);
      }
      Some(AccountModal::Register) => {
        match form_key(&mut self.register_form, &mut self.account_field, key) {
          FormKey::Submit => {
            if account::register(&self.client, &self.register_form, prompt).await {
              self.register_form = RegisterForm::default();
              self.account = Some(AccountModal::Login);
              self.account_field = 0;
            }
          }
          FormKey::Cancel => self.account = None,
          FormKey::Editing => {}
        }
        return Ok(true);
      }
      None => {}
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('l') if self.session.is_none() => {
        self.account = Some(AccountModal::Login);
        self.account_field = 0;
      }
      KeyCode::Char('r') if self.session.is_none() => {
        self.account = Some(AccountModal::Register);
        self.account_field = 0;
      }
      KeyCode::Char('L') if self.session.is_some() => {
        if account::confirm_logout(prompt).await {
          self.sign_out();
        }
      }
      KeyCode::Char('p') | KeyCode::Enter => self.navigate(Route::Posts),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_posts_key<P: Prompter>(
    &mut self,
    key: KeyEvent,
    prompt: &mut P,
  ) -> anyhow::Result<bool> {
    // The comments panel, when open, takes input first.
    if let Some(comments) = &mut self.comments {
      if browser_key(comments, &mut self.searching, key, prompt).await == Handled::Yes {
        return Ok(true);
      }
      match key.code {
        KeyCode::Esc => {
          self.comments = None;
          return Ok(true);
        }
        KeyCode::Char('g') => {
          self.fetch_comments();
          return Ok(true);
        }
        _ => {}
      }
    } else if let Some(posts) = &mut self.posts {
      if browser_key(posts, &mut self.searching, key, prompt).await == Handled::Yes {
        return Ok(true);
      }
      if key.code == KeyCode::Char('c') {
        let target = posts
          .selected()
          .filter(|_| posts.reading_one)
          .or_else(|| posts.highlighted())
          .cloned();
        if let Some(post) = target {
          self.open_comments(&post);
        }
        return Ok(true);
      }
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('g') => self.fetch_posts(),
      KeyCode::Char('H') => self.navigate(Route::Home),
      KeyCode::Char('L') => {
        if account::confirm_logout(prompt).await {
          self.sign_out();
        }
      }
      _ => {}
    }
    Ok(true)
  }
}

// ─── Shared key routing ───────────────────────────────────────────────────────

/// Edit a form in place. Enter submits, Esc cancels, Tab and the arrow keys
/// move between fields.
fn form_key<F: Form>(form: &mut F, field: &mut usize, key: KeyEvent) -> FormKey {
  let count = F::LABELS.len();
  match key.code {
    KeyCode::Esc => return FormKey::Cancel,
    KeyCode::Enter => return FormKey::Submit,
    KeyCode::Tab | KeyCode::Down => *field = (*field + 1) % count,
    KeyCode::BackTab | KeyCode::Up => *field = (*field + count - 1) % count,
    KeyCode::Backspace => {
      if let Some(value) = form.field_mut(*field) {
        value.pop();
      }
    }
    KeyCode::Char(c) => {
      if let Some(value) = form.field_mut(*field) {
        value.push(c);
      }
    }
    _ => {}
  }
  FormKey::Editing
}

/// Route a key to the browser's topmost open modal (edit, create, read-one,
/// read-all), or to the grid when none is open.
async fn browser_key<R, A, P>(
  b: &mut Browser<R, A>,
  searching: &mut Option<Search>,
  key: KeyEvent,
  prompt: &mut P,
) -> Handled
where
  R: Resource,
  A: ResourceApi<R>,
  P: Prompter,
{
  if let Some(which) = *searching {
    let state = match which {
      Search::Grid => &mut b.grid,
      Search::Table => &mut b.table,
    };
    match key.code {
      KeyCode::Esc | KeyCode::Enter => *searching = None,
      KeyCode::Backspace => state.pop_search(),
      KeyCode::Char(c) => state.push_search(c),
      _ => {}
    }
    if which == Search::Grid {
      b.cursor = 0;
    }
    return Handled::Yes;
  }

  if b.editing {
    match form_key(&mut b.edit_draft, &mut b.field, key) {
      FormKey::Submit => {
        b.submit_edit(prompt).await;
      }
      FormKey::Cancel => b.close_edit(),
      FormKey::Editing => {}
    }
    return Handled::Yes;
  }

  if b.creating {
    match form_key(&mut b.draft, &mut b.field, key) {
      FormKey::Submit => {
        b.submit_create(prompt).await;
      }
      FormKey::Cancel => b.close_create(),
      FormKey::Editing => {}
    }
    return Handled::Yes;
  }

  if b.reading_one {
    let Some(id) = b.selected().map(Resource::id) else {
      b.close_read_one();
      return Handled::Yes;
    };
    match key.code {
      KeyCode::Esc => b.close_read_one(),
      KeyCode::Char('e') => b.open_edit(id),
      KeyCode::Char('d') => {
        b.delete(id, prompt).await;
      }
      _ => return Handled::No,
    }
    return Handled::Yes;
  }

  if b.reading_all {
    match key.code {
      KeyCode::Esc => b.close_read_all(),
      KeyCode::Char('/') => *searching = Some(Search::Table),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => b.table_next(),
      KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => b.table_prev(),
      _ => return Handled::No,
    }
    return Handled::Yes;
  }

  let highlighted = b.highlighted().map(Resource::id);
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => b.cursor_down(),
    KeyCode::Up | KeyCode::Char('k') => b.cursor_up(),
    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => b.grid_next(),
    KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => b.grid_prev(),
    KeyCode::Char('/') => *searching = Some(Search::Grid),
    KeyCode::Char('n') => b.open_create(),
    KeyCode::Char('a') => b.open_read_all(),
    KeyCode::Enter => {
      if let Some(id) = highlighted {
        b.open_read_one(id);
      }
    }
    KeyCode::Char('e') => {
      if let Some(id) = highlighted {
        b.open_edit(id);
      }
    }
    KeyCode::Char('d') => {
      if let Some(id) = highlighted {
        b.delete(id, prompt).await;
      }
    }
    _ => return Handled::No,
  }
  Handled::Yes
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyEventKind;
  use inkwell_cli::resource::PostDraft;

  use super::*;

  fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
  }

  #[test]
  fn form_keys_edit_the_focused_field() {
    let mut draft = PostDraft::default();
    let mut field = 0;
    form_key(&mut draft, &mut field, press(KeyCode::Char('T')));
    form_key(&mut draft, &mut field, press(KeyCode::Tab));
    form_key(&mut draft, &mut field, press(KeyCode::Char('b')));
    form_key(&mut draft, &mut field, press(KeyCode::Char('x')));
    form_key(&mut draft, &mut field, press(KeyCode::Backspace));
    assert_eq!(draft, PostDraft { title: "T".into(), content: "b".into() });

    form_key(&mut draft, &mut field, press(KeyCode::Tab));
    assert_eq!(field, 0);
    form_key(&mut draft, &mut field, press(KeyCode::BackTab));
    assert_eq!(field, 1);

    assert!(matches!(
      form_key(&mut draft, &mut field, press(KeyCode::Enter)),
      FormKey::Submit
    ));
    assert!(matches!(
      form_key(&mut draft, &mut field, press(KeyCode::Esc)),
      FormKey::Cancel
    ));
  }

  #[tokio::test]
  async fn posts_route_is_guarded() {
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let client = ApiClient::new(Default::default()).unwrap();
    let mut app = App::new(client, tx);

    app.navigate(Route::Posts);
    assert_eq!(app.route, Route::Home);
    assert!(!app.status_msg.is_empty());
  }
}
