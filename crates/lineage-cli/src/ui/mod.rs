//! TUI rendering — orchestrates all panes.

pub mod board;
pub mod form;
pub mod projects;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Clear, Paragraph},
};

use crate::app::{App, Screen};

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
  match app.screen {
    Screen::Projects => projects::draw(f, rows[1], app),
    Screen::Board => board::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let context = match (&app.screen, &app.board) {
    (Screen::Board, Some(board)) => {
      let individual = board
        .ctx
        .individual_id
        .map(|id| format!("  individual {id}"))
        .unwrap_or_default();
      format!("project {}{individual} ", board.ctx.project_id)
    }
    _ => String::new(),
  };

  let left = Span::styled(
    " lineage",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(context, Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.content.len() as u16)
    .saturating_sub(right.content.len() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints, status) = match &app.screen {
    Screen::Projects => {
      let p = &app.projects;
      let (mode, hints) = if p.create_input.is_some() {
        ("CREATE", "Type a name  Enter save  Esc cancel")
      } else if p.modal.is_some() {
        ("CONFIRM", "Enter submit  Esc cancel")
      } else {
        ("PROJECTS", "↑↓/jk move  Enter open  n new  u update  d delete  q quit")
      };
      (mode, hints, p.status.clone())
    }
    Screen::Board => match &app.board {
      Some(b) => {
        let (mode, hints) = if b.form.is_some() {
          ("ADD", "Tab fields  Space toggle  ^N identity  Enter submit  Esc close")
        } else if b.editor.is_some() {
          ("DETAILS", "Tab fields  ←→ choose  Enter save  Esc cancel")
        } else if b.pending_removal.is_some() {
          ("CONFIRM", "y remove relationship  n keep")
        } else if b.search_active {
          ("SEARCH", "Type to search  ↑↓ choose  Enter select  Esc close")
        } else if b.carried.is_some() {
          ("CARRY", "Tab target list  Space/Enter drop  Esc cancel")
        } else if b.select_mode {
          ("SELECT", "Space check  D delete selected  v leave select mode")
        } else {
          ("BOARD", "Tab lists  Space grab  e details  / search  v select  a add  b back")
        };
        (mode, hints, b.status.clone())
      }
      None => ("BOARD", "", String::new()),
    },
  };

  let text = if status.is_empty() { hints.to_string() } else { status };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span =
    Span::styled(format!("  {text}"), Style::default().fg(Color::DarkGray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// A centered overlay rect, cleared so underlying widgets don't bleed
/// through.
pub(crate) fn overlay(f: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  let rect = Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  };
  f.render_widget(Clear, rect);
  rect
}
