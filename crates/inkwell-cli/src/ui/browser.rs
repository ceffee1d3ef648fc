//! Grid, table, detail, and form views for any browsable resource.

use chrono::{DateTime, Local, Utc};
use inkwell_cli::{
  Browser,
  resource::{Resource, ResourceApi},
  view::View,
};
use inkwell_core::{comment::Comment, post::Post};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use super::dialog;

const PREVIEW_CHARS: usize = 120;

/// How a resource is laid out on screen.
pub trait Presented: Resource {
  fn heading(&self) -> String;

  fn body(&self) -> &str;

  fn table_header() -> &'static [&'static str];

  fn table_widths() -> Vec<Constraint>;

  fn table_cells(&self) -> Vec<String>;

  /// Labelled fields for the read-one modal.
  fn details(&self) -> Vec<(&'static str, String)>;
}

fn local(ts: &DateTime<Utc>) -> String {
  ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn preview(text: &str) -> String {
  let mut chars = text.chars();
  let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
  if chars.next().is_some() { format!("{head}…") } else { head }
}

impl Presented for Post {
  fn heading(&self) -> String { self.title.clone() }

  fn body(&self) -> &str { &self.content }

  fn table_header() -> &'static [&'static str] {
    &["ID", "Title", "Content", "Author", "Created", "Updated"]
  }

  fn table_widths() -> Vec<Constraint> {
    vec![
      Constraint::Length(5),
      Constraint::Percentage(20),
      Constraint::Min(20),
      Constraint::Length(7),
      Constraint::Length(17),
      Constraint::Length(17),
    ]
  }

  fn table_cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.title.clone(),
      self.content.clone(),
      self.author_id.to_string(),
      local(&self.created_at),
      local(&self.updated_at),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Title", self.title.clone()),
      ("Author", self.author_id.to_string()),
      ("Created", local(&self.created_at)),
      ("Updated", local(&self.updated_at)),
      ("", String::new()),
      ("", self.content.clone()),
    ]
  }
}

impl Presented for Comment {
  fn heading(&self) -> String { format!("#{} by {}", self.id, self.author_id) }

  fn body(&self) -> &str { &self.content }

  fn table_header() -> &'static [&'static str] { &["ID", "Content", "Author", "Created"] }

  fn table_widths() -> Vec<Constraint> {
    vec![
      Constraint::Length(5),
      Constraint::Min(20),
      Constraint::Length(7),
      Constraint::Length(17),
    ]
  }

  fn table_cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.content.clone(),
      self.author_id.to_string(),
      local(&self.created_at),
    ]
  }

  fn details(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Author", self.author_id.to_string()),
      ("Created", local(&self.created_at)),
      ("", String::new()),
      ("", self.content.clone()),
    ]
  }
}

// ─── Grid ─────────────────────────────────────────────────────────────────────

fn title_with_search<R>(title: &str, search: &str, view: &View<'_, R>) -> String {
  if search.is_empty() {
    format!("{title}({}) ", view.matched)
  } else {
    format!("{title}({}) /{search} ", view.matched)
  }
}

/// Render the current grid page into `area`.
pub fn draw_grid<R, A>(
  f: &mut Frame,
  area: Rect,
  browser: &Browser<R, A>,
  title: &str,
  focused: bool,
) where
  R: Presented,
  A: ResourceApi<R>,
{
  let view = browser.grid_view();
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(title_with_search(title, browser.grid.search(), &view))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if view.is_paginated() && inner.height > 2 {
    let footer = Rect { y: inner.y + inner.height - 1, height: 1, ..inner };
    inner.height -= 1;
    f.render_widget(pagination(&view), footer);
  }

  if view.items.is_empty() {
    let text = if browser.is_loading() { "Loading…" } else { "Nothing here yet. [n] new" };
    f.render_widget(
      Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = view
    .items
    .iter()
    .map(|item| {
      ListItem::new(vec![
        Line::from(Span::styled(
          item.heading(),
          Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
          preview(item.body()),
          Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
      ])
    })
    .collect();

  let mut state = ListState::default();
  state.select(focused.then_some(browser.cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

fn pagination<R>(view: &View<'_, R>) -> Paragraph<'static> {
  let dim = Style::default().fg(Color::DarkGray);
  let on = Style::default().fg(Color::Yellow);
  Paragraph::new(Line::from(vec![
    Span::styled("‹ prev ", if view.has_prev() { on } else { dim }),
    Span::raw(format!("Page {} of {}", view.page, view.total_pages)),
    Span::styled(" next ›", if view.has_next() { on } else { dim }),
  ]))
}

// ─── Modals ───────────────────────────────────────────────────────────────────

/// Draw every open modal, bottom to top: read-all, read-one, create, edit.
pub fn draw_modals<R, A>(f: &mut Frame, browser: &Browser<R, A>)
where
  R: Presented,
  A: ResourceApi<R>,
{
  if browser.reading_all {
    draw_table(f, browser);
  }
  if browser.reading_one
    && let Some(item) = browser.selected()
  {
    draw_detail(f, item);
  }
  if browser.creating {
    dialog::draw_form(f, &format!(" New {} ", R::NOUN), &browser.draft, browser.field);
  }
  if browser.editing {
    dialog::draw_form(f, &format!(" Edit {} ", R::NOUN), &browser.edit_draft, browser.field);
  }
}

fn draw_table<R, A>(f: &mut Frame, browser: &Browser<R, A>)
where
  R: Presented,
  A: ResourceApi<R>,
{
  let area = dialog::centered(f.area(), 90, 80);
  let view = browser.table_view();
  let title = title_with_search(&format!(" All {}s ", R::NOUN), browser.table.search(), &view);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(inner);

  let header = Row::new(R::table_header().iter().map(|h| Cell::from(*h)))
    .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
  let body = view.items.iter().map(|item| Row::new(item.table_cells()));

  f.render_widget(Table::new(body, R::table_widths()).header(header), rows[0]);
  if view.is_paginated() {
    f.render_widget(pagination(&view), rows[1]);
  }
}

fn draw_detail<R: Presented>(f: &mut Frame, item: &R) {
  let area = dialog::centered(f.area(), 60, 50);
  let block = Block::default()
    .title(format!(" {} #{} ", R::NOUN, item.id()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let lines: Vec<Line> = item
    .details()
    .into_iter()
    .map(|(label, value)| {
      if label.is_empty() {
        Line::raw(value)
      } else {
        Line::from(vec![
          Span::styled(format!("{label:<8} "), Style::default().fg(Color::DarkGray)),
          Span::raw(value),
        ])
      }
    })
    .collect();

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false }),
    area,
  );
}
