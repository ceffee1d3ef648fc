//! Centered modal dialogs: forms, confirmations and notices, plus the
//! terminal-backed [`Prompter`].

use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use inkwell_cli::{
  prompt::{Confirmation, Notice, NoticeKind, Prompter},
  resource::Form,
};
use ratatui::{
  Frame, Terminal,
  backend::Backend,
  buffer::Buffer,
  layout::{Alignment, Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// A rectangle `percent_x` by `percent_y` of `area`, centered in it.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

/// A rectangle `percent_x` wide and exactly `height` rows tall.
fn centered_rows(area: Rect, percent_x: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

// ─── Forms ────────────────────────────────────────────────────────────────────

pub fn draw_form<F: Form>(f: &mut Frame, title: &str, form: &F, focus: usize) {
  let height = F::LABELS.len() as u16 * 2 + 3;
  let area = centered_rows(f.area(), 60, height);

  let block = Block::default()
    .title(title.to_string())
    .title_bottom(Line::from(" Tab next  Enter submit  Esc cancel ").right_aligned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let mut lines = Vec::with_capacity(F::LABELS.len() * 2);
  for (i, label) in F::LABELS.iter().enumerate() {
    let value = form.field(i);
    let shown = if F::is_secret(i) {
      "•".repeat(value.chars().count())
    } else {
      value.to_string()
    };
    let focused = i == focus;
    let label_style = if focused {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(format!("{label}:"), label_style)));
    lines.push(Line::from(vec![
      Span::raw(format!("  {shown}")),
      Span::raw(if focused { "_" } else { "" }),
    ]));
  }

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false }),
    area,
  );
}

// ─── Confirm / notice ─────────────────────────────────────────────────────────

fn draw_message(f: &mut Frame, title: &str, text: &str, footer: Line<'_>, color: Color) {
  let area = centered_rows(f.area(), 50, 7);
  let block = Block::default()
    .title(Line::from(format!(" {title} ")).centered())
    .title_bottom(footer.centered())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color));

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(text.to_string())
      .block(block)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true }),
    area,
  );
}

pub fn draw_confirm(f: &mut Frame, confirmation: &Confirmation) {
  let footer = Line::from(vec![
    Span::styled(
      format!(" [y] {} ", confirmation.action),
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ),
    Span::styled(" [n] Cancel ", Style::default().fg(Color::Red)),
  ]);
  draw_message(f, &confirmation.title, &confirmation.text, footer, Color::Yellow);
}

pub fn draw_notice(f: &mut Frame, notice: &Notice) {
  let color = match notice.kind {
    NoticeKind::Success => Color::Green,
    NoticeKind::Error => Color::Red,
    NoticeKind::Info => Color::Cyan,
  };
  let footer = Line::from(Span::styled(" any key ", Style::default().fg(Color::DarkGray)));
  draw_message(f, &notice.title, &notice.text, footer, color);
}

// ─── Terminal prompter ────────────────────────────────────────────────────────

/// Draws dialogs over a snapshot of the last full frame and blocks on the
/// keyboard for an answer.
pub struct TerminalPrompter<'t, B: Backend> {
  terminal:   &'t mut Terminal<B>,
  background: Buffer,
}

impl<'t, B: Backend> TerminalPrompter<'t, B> {
  pub fn new(terminal: &'t mut Terminal<B>, background: Buffer) -> Self {
    Self { terminal, background }
  }

  fn show(&mut self, render: impl Fn(&mut Frame)) -> io::Result<()> {
    let background = &self.background;
    self.terminal.draw(|f| {
      f.buffer_mut().merge(background);
      render(f);
    })?;
    Ok(())
  }

  /// Wait for the next key press, yielding to tokio while waiting.
  fn next_key() -> io::Result<KeyCode> {
    tokio::task::block_in_place(|| loop {
      if event::poll(Duration::from_millis(250))?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
      {
        return Ok(key.code);
      }
    })
  }

  fn ask(&mut self, confirmation: &Confirmation) -> io::Result<bool> {
    self.show(|f| draw_confirm(f, confirmation))?;
    loop {
      match Self::next_key()? {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return Ok(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
        _ => {}
      }
    }
  }

  fn tell(&mut self, notice: &Notice) -> io::Result<()> {
    self.show(|f| draw_notice(f, notice))?;
    Self::next_key()?;
    Ok(())
  }
}

impl<B: Backend> Prompter for TerminalPrompter<'_, B> {
  async fn confirm(&mut self, confirmation: Confirmation) -> bool {
    self.ask(&confirmation).unwrap_or_else(|e| {
      tracing::error!(error = %e, "confirm dialog failed");
      false
    })
  }

  async fn notify(&mut self, notice: Notice) {
    if let Err(e) = self.tell(&notice) {
      tracing::error!(error = %e, "notice dialog failed");
    }
  }
}
