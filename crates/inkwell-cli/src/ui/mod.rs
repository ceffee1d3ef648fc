//! TUI rendering for every screen.

pub mod browser;
pub mod dialog;
pub mod home;

use chrono::Local;
use inkwell_cli::Route;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{AccountModal, App, Search};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.route {
    Route::Home => draw_home(f, rows[1], app),
    Route::Posts => draw_posts(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left_text = match &app.session {
    None => " inkwell  [l] login  [r] register  [q] quit".to_string(),
    Some(session) => format!(
      " inkwell  {}  [p] posts  [H] home  [L] logout  [q] quit",
      session.user.username
    ),
  };
  let left = Span::styled(
    left_text,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let bg = if app.session.is_some() { Color::Blue } else { Color::DarkGray };
  let block = Block::default().style(Style::default().bg(bg));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_home(f: &mut Frame, area: Rect, app: &App) {
  home::draw(f, area, app);

  match app.account {
    Some(AccountModal::Login) => {
      dialog::draw_form(f, " Login ", &app.login_form, app.account_field);
    }
    Some(AccountModal::Register) => {
      dialog::draw_form(f, " Register ", &app.register_form, app.account_field);
    }
    None => {}
  }
}

fn draw_posts(f: &mut Frame, area: Rect, app: &App) {
  let Some(posts) = &app.posts else { return };

  let Some(comments) = &app.comments else {
    browser::draw_grid(f, area, posts, " Posts ", true);
    browser::draw_modals(f, posts);
    return;
  };

  // Posts on the left, comments panel on the right.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  browser::draw_grid(f, cols[0], posts, " Posts ", false);
  let title = format!(" Comments on “{}” ", app.comments_title);
  browser::draw_grid(f, cols[1], comments, &title, true);
  browser::draw_modals(f, comments);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (app.route, app.searching) {
    (_, Some(Search::Grid)) | (_, Some(Search::Table)) => {
      ("SEARCH", "Type to filter  Enter/Esc done")
    }
    (Route::Home, _) if app.account.is_some() => {
      ("FORM", "Tab next field  Enter submit  Esc cancel")
    }
    (Route::Home, _) => ("HOME", "Enter posts  q quit"),
    (Route::Posts, _) if app.comments.is_some() => (
      "COMMENTS",
      "jk move  hl page  / search  n new  a all  Enter read  e edit  d delete  Esc close",
    ),
    (Route::Posts, _) => (
      "POSTS",
      "jk move  hl page  / search  n new  a all  Enter read  e edit  d delete  c comments  g reload",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
