//! Drives a real server on an ephemeral port through the HTTP client and the
//! resource browser.

use std::sync::Arc;

use inkwell_cli::{
  ApiClient, ApiConfig, Browser, Outcome,
  account::{self, LoginForm, RegisterForm},
  prompt::{Confirmation, Notice, Prompter},
  resource::{CommentDraft, CommentsApi, PostDraft, PostsApi},
};
use inkwell_core::post::{PostInput, PostPatch};
use inkwell_store_sqlite::SqliteStore;
use tokio::net::TcpListener;

async fn serve() -> ApiClient {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let app = inkwell_api::api_router(Arc::new(store));
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  ApiClient::new(ApiConfig { base_url: format!("http://{addr}") }).unwrap()
}

/// Says yes unless told to decline once, and remembers what it was told.
#[derive(Default)]
struct Agreeable {
  decline_next: bool,
  notices:      Vec<Notice>,
}

impl Prompter for Agreeable {
  async fn confirm(&mut self, _: Confirmation) -> bool {
    !std::mem::take(&mut self.decline_next)
  }

  async fn notify(&mut self, notice: Notice) { self.notices.push(notice); }
}

#[tokio::test]
async fn register_login_post_delete() {
  let client = serve().await;

  let reply = client.register("alice", "a@x.com", "Secr3t!").await.unwrap();
  assert!(reply.is_success());

  let login = client.login("a@x.com", "Secr3t!").await.unwrap();
  let user = login.into_result().unwrap().unwrap().user;
  assert_eq!(user.id, 1);

  let created = client
    .create_post(&PostInput {
      title:     Some("T".into()),
      content:   Some("C".into()),
      author_id: Some(1),
    })
    .await
    .unwrap();
  assert!(created.is_success());

  let posts = client.list_posts().await.unwrap();
  assert_eq!(posts.len(), 1);
  assert_eq!(posts[0].title, "T");
  assert_eq!(client.list_posts().await.unwrap(), posts);

  assert!(client.delete_post(1).await.unwrap().is_success());
  let again = client.delete_post(1).await.unwrap();
  assert_eq!(again.into_result().unwrap_err(), "Post Not Found!");
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
  let client = serve().await;
  client.register("alice", "a@x.com", "pw").await.unwrap();
  client
    .create_post(&PostInput {
      title:     Some("T".into()),
      content:   Some("C".into()),
      author_id: Some(1),
    })
    .await
    .unwrap();

  let reply = client.update_post(1, &PostPatch::default()).await.unwrap();
  assert_eq!(reply.into_result().unwrap_err(), "Nothing to Update");
}

#[tokio::test]
async fn account_flows_create_a_session() {
  let client = serve().await;
  let mut prompt = Agreeable::default();

  let form = RegisterForm {
    username: "alice".into(),
    email:    "a@x.com".into(),
    password: "Secr3t!x".into(),
  };
  assert!(account::register(&client, &form, &mut prompt).await);
  assert_eq!(prompt.notices.last().unwrap().text, "User Registered Successfully");

  // Same email again: the server's message is shown verbatim.
  assert!(!account::register(&client, &form, &mut prompt).await);
  assert_eq!(prompt.notices.last().unwrap().text, "Email Already Exists!");

  let wrong = LoginForm { email: "a@x.com".into(), password: "Wr0ng!pw".into() };
  assert!(account::login(&client, &wrong, &mut prompt).await.is_none());
  assert_eq!(prompt.notices.last().unwrap().text, "Invalid Password!");

  let right = LoginForm { email: "a@x.com".into(), password: "Secr3t!x".into() };
  let session = account::login(&client, &right, &mut prompt).await.unwrap();
  assert_eq!(session.user.username, "alice");
}

#[tokio::test]
async fn browsers_over_http() {
  let client = serve().await;
  client.register("alice", "a@x.com", "pw").await.unwrap();
  let mut prompt = Agreeable::default();

  let mut posts = Browser::new(PostsApi { client: client.clone(), author_id: 1 });
  posts.refresh().await.unwrap();
  assert!(posts.items().is_empty());

  for i in 1..=6 {
    posts.open_create();
    posts.draft = PostDraft { title: format!("Post {i}"), content: "hello".into() };
    assert_eq!(posts.submit_create(&mut prompt).await, Outcome::Done);
  }
  assert_eq!(posts.items().len(), 6);
  assert_eq!(posts.grid_view().total_pages, 2);

  posts.open_edit(3);
  posts.edit_draft.content = "edited".into();
  assert_eq!(posts.submit_edit(&mut prompt).await, Outcome::Done);
  let edited = posts.items().iter().find(|p| p.id == 3).unwrap();
  assert_eq!(edited.content, "edited");
  assert!(edited.updated_at >= edited.created_at);

  let mut comments = Browser::new(CommentsApi {
    client:    client.clone(),
    post_id:   3,
    author_id: 1,
  });
  comments.refresh().await.unwrap();
  comments.draft = CommentDraft { content: "first!".into() };
  assert_eq!(comments.submit_create(&mut prompt).await, Outcome::Done);
  assert_eq!(comments.items().len(), 1);

  // Deleting the post takes its comments with it.
  assert_eq!(posts.delete(3, &mut prompt).await, Outcome::Done);
  assert_eq!(posts.items().len(), 5);
  comments.refresh().await.unwrap();
  assert!(comments.items().is_empty());

  // A declined confirmation leaves the server untouched.
  prompt.decline_next = true;
  assert_eq!(posts.delete(1, &mut prompt).await, Outcome::Declined);
  assert_eq!(client.list_posts().await.unwrap().len(), 5);
}
