//! Home screen: greeting and account entry points.

use ratatui::{
  Frame,
  layout::{Alignment, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Inkwell ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines = vec![
    Line::from(Span::styled(
      "A small place to write.",
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::raw(""),
  ];

  match &app.session {
    None => {
      lines.push(Line::raw("Press [l] to log in or [r] to create an account."));
    }
    Some(session) => {
      lines.push(Line::raw(format!("Signed in as {}.", session.user.username)));
      lines.push(Line::raw("Press Enter or [p] to read and write posts."));
    }
  }

  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true }),
    area,
  );
}
