//! The filter → sort → paginate pipeline over an in-memory collection.
//!
//! [`compute`] is a pure function of the collection and a [`ViewState`]; it is
//! re-run on every render and keeps no derived state of its own.

use crate::resource::Resource;

/// Items per page in both the grid and the read-all table.
pub const PAGE_SIZE: usize = 5;

/// Search term and 1-based page number for one view of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
  search: String,
  page:   usize,
}

impl Default for ViewState {
  fn default() -> Self { Self { search: String::new(), page: 1 } }
}

impl ViewState {
  pub fn search(&self) -> &str { &self.search }

  pub fn page(&self) -> usize { self.page }

  /// Replace the search term. Any change of term goes back to page 1.
  pub fn set_search(&mut self, search: impl Into<String>) {
    self.search = search.into();
    self.page = 1;
  }

  pub fn push_search(&mut self, c: char) {
    self.search.push(c);
    self.page = 1;
  }

  pub fn pop_search(&mut self) {
    if self.search.pop().is_some() {
      self.page = 1;
    }
  }

  /// Advance one page unless already on the last of `total_pages`.
  pub fn next_page(&mut self, total_pages: usize) {
    if self.page < total_pages {
      self.page += 1;
    }
  }

  pub fn prev_page(&mut self) {
    if self.page > 1 {
      self.page -= 1;
    }
  }
}

/// One page of a filtered collection.
#[derive(Debug)]
pub struct View<'a, R> {
  /// The items on the current page, ascending by id.
  pub items:       Vec<&'a R>,
  /// How many items matched the search across all pages.
  pub matched:     usize,
  pub page:        usize,
  pub total_pages: usize,
}

impl<R> View<'_, R> {
  pub fn has_prev(&self) -> bool { self.page > 1 }

  pub fn has_next(&self) -> bool { self.page < self.total_pages }

  /// Whether pagination controls are worth showing at all.
  pub fn is_paginated(&self) -> bool { self.matched > PAGE_SIZE }
}

/// Filter `items` by a case-insensitive substring match of the search term
/// against each item's searchable text, sort ascending by id, and cut out the
/// current page.
///
/// The page number is used as given; a page past the end yields no items.
pub fn compute<'a, R: Resource>(items: &'a [R], state: &ViewState) -> View<'a, R> {
  let needle = state.search.to_lowercase();

  let mut matched: Vec<&R> = items
    .iter()
    .filter(|item| {
      needle.is_empty()
        || item
          .haystacks()
          .iter()
          .any(|h| h.to_lowercase().contains(&needle))
    })
    .collect();
  matched.sort_by_key(|item| item.id());

  let count = matched.len();
  let start = (state.page.max(1) - 1) * PAGE_SIZE;
  let items = matched.into_iter().skip(start).take(PAGE_SIZE).collect();

  View {
    items,
    matched: count,
    page: state.page,
    total_pages: count.div_ceil(PAGE_SIZE),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use inkwell_core::post::Post;

  use super::*;

  fn post(id: i64, title: &str, content: &str) -> Post {
    Post {
      id,
      title: title.into(),
      content: content.into(),
      author_id: 1,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  /// Twelve posts, newest first as the server sends them.
  fn twelve() -> Vec<Post> {
    (1..=12)
      .rev()
      .map(|i| post(i, &format!("Post {i}"), "body"))
      .collect()
  }

  #[test]
  fn empty_search_matches_everything() {
    let items = twelve();
    let view = compute(&items, &ViewState::default());
    assert_eq!(view.matched, 12);
    assert_eq!(view.total_pages, 3);
    let ids: Vec<_> = view.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
    assert!(view.is_paginated());
    assert!(!view.has_prev());
    assert!(view.has_next());
  }

  #[test]
  fn second_page_is_items_five_to_ten() {
    let items = twelve();
    let mut state = ViewState::default();
    state.next_page(3);
    let view = compute(&items, &state);
    let ids: Vec<_> = view.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, [6, 7, 8, 9, 10]);
  }

  #[test]
  fn search_is_case_insensitive_over_title_and_content() {
    let items = vec![
      post(1, "Greeting", "hello world"),
      post(2, "HELLO again", "x"),
      post(3, "Other", "nothing"),
    ];
    let mut state = ViewState::default();
    state.set_search("Hello");
    let view = compute(&items, &state);
    assert_eq!(view.matched, 2);
    assert_eq!(view.total_pages, 1);
    assert!(!view.is_paginated());
  }

  #[test]
  fn page_is_not_corrected_when_matches_shrink() {
    let items = twelve();
    let mut state = ViewState::default();
    state.next_page(3);
    state.next_page(3);
    state.next_page(3);
    assert_eq!(state.page(), 3);

    let view = compute(&items[..4], &state);
    assert!(view.items.is_empty());
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 3);
  }

  #[test]
  fn changing_search_resets_page() {
    let mut state = ViewState::default();
    state.next_page(2);
    state.push_search('a');
    assert_eq!(state.page(), 1);

    state.next_page(2);
    state.pop_search();
    assert_eq!(state.page(), 1);

    state.prev_page();
    assert_eq!(state.page(), 1);
  }

  #[test]
  fn no_matches_means_zero_pages() {
    let items = twelve();
    let mut state = ViewState::default();
    state.set_search("zzz");
    let view = compute(&items, &state);
    assert_eq!(view.total_pages, 0);
    assert!(!view.has_next());
  }
}
