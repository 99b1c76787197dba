//! Relationship board: roster pane, the four family lists, and the
//! overlays layered on top (detail editor, removal prompt, add form).

use lineage_core::{
  individual::{Individual, VitalStatus},
  relationship::Relative,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
  app::App,
  board::{Board, BoardPane, DetailEditor, EditorField, FamilyList},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(board) = &app.board else {
    f.render_widget(
      Paragraph::new("No project open — press b to pick one."),
      area,
    );
    return;
  };

  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
    .split(area);

  draw_roster(f, columns[0], board);
  draw_family(f, columns[1], board);

  if let Some(editor) = &board.editor {
    draw_editor(f, area, editor);
  }
  if board.pending_removal.is_some() {
    draw_removal_prompt(f, area);
  }
  if let Some(form) = &board.form {
    super::form::draw(f, area, form);
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

fn draw_roster(f: &mut Frame, area: Rect, board: &Board) {
  let focused = board.pane == BoardPane::Roster;

  // The search bar and its suggestion list eat into the roster column.
  let (list_area, search_area) = if board.search_active {
    let suggestion_rows =
      (board.search.suggestions.len() + usize::from(board.search.no_results))
        .min(6) as u16;
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3 + suggestion_rows),
        Constraint::Min(0),
      ])
      .split(area);
    (rows[1], Some(rows[0]))
  } else {
    (area, None)
  };

  if let Some(rect) = search_area {
    draw_search(f, rect, board);
  }

  let visible = board.visible_roster();
  let items: Vec<ListItem> = visible
    .iter()
    .map(|ind| roster_row(board, ind))
    .collect::<Vec<_>>();

  let mut state = ListState::default();
  if focused && !visible.is_empty() {
    state.select(Some(board.cursor.min(visible.len() - 1)));
  }

  let title = if board.select_mode {
    format!(" Individuals ({}) — {} checked ", visible.len(), board.checked.len())
  } else {
    format!(" Individuals ({}) ", visible.len())
  };

  let list = List::new(items)
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(pane_border(focused))
        .title(title),
    )
    .highlight_style(highlight(board.carried.is_some()));

  f.render_stateful_widget(list, list_area, &mut state);
}

fn roster_row<'a>(board: &Board, ind: &Individual) -> ListItem<'a> {
  let mut spans = Vec::new();
  if board.select_mode {
    let mark = if board.checked.contains(&ind.id) { "[x] " } else { "[ ] " };
    spans.push(Span::styled(mark, Style::default().fg(Color::Yellow)));
  }
  spans.push(Span::raw(ind.display_name()));

  let status = match ind.vital_status() {
    VitalStatus::Alive => None,
    VitalStatus::DeceasedUnknown => Some("  (?)".to_string()),
    VitalStatus::Deceased(date) => Some(match date {
      Some(d) => format!("  † {}", d.format("%Y")),
      None => "  †".to_string(),
    }),
  };
  if let Some(status) = status {
    spans.push(Span::styled(status, Style::default().fg(Color::DarkGray)));
  }

  ListItem::new(Line::from(spans))
}

fn draw_search(f: &mut Frame, area: Rect, board: &Board) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan))
    .title(" Search ");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  f.render_widget(
    Paragraph::new(format!("{}\u{2588}", board.search.query)),
    rows[0],
  );

  let items: Vec<ListItem> = if board.search.no_results {
    vec![ListItem::new(Span::styled(
      "No results found",
      Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))]
  } else {
    board
      .search
      .suggestions
      .iter()
      .map(|hit| ListItem::new(hit.display_name()))
      .collect()
  };

  let mut state = ListState::default();
  if !board.search.suggestions.is_empty() {
    state.select(Some(board.search.cursor));
  }
  let list = List::new(items).highlight_style(highlight(false));
  f.render_stateful_widget(list, rows[1], &mut state);
}

// ─── Family lists ────────────────────────────────────────────────────────────

fn draw_family(f: &mut Frame, area: Rect, board: &Board) {
  if board.ctx.individual_id.is_none() {
    f.render_widget(
      Paragraph::new("Select an individual (Enter on a roster row) to see their family.")
        .block(Block::default().borders(Borders::ALL).title(" Family ")),
      area,
    );
    return;
  }

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(25); 4])
    .split(area);

  for (list, rect) in FamilyList::ALL.into_iter().zip(rows.iter()) {
    draw_family_list(f, *rect, board, list);
  }
}

fn draw_family_list(f: &mut Frame, area: Rect, board: &Board, list: FamilyList) {
  let focused = board.pane == BoardPane::Family(list);
  let rows = board.family_rows(list);

  let items: Vec<ListItem> = rows.iter().map(family_row).collect();

  let mut state = ListState::default();
  if focused && !rows.is_empty() {
    state.select(Some(board.cursor.min(rows.len() - 1)));
  }

  let mut title = format!(" {} ({}) ", list.title(), rows.len());
  if focused && board.carried.is_some() && list.drop_target().is_some() {
    title.push_str("— drop here ");
  }

  let widget = List::new(items)
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(pane_border(focused))
        .title(title),
    )
    .highlight_style(highlight(board.carried.is_some()));

  f.render_stateful_widget(widget, area, &mut state);
}

fn family_row<'a>(rel: &Relative) -> ListItem<'a> {
  let mut spans = vec![Span::raw(rel.display_name())];

  if let Some(detail) = &rel.relationship_detail {
    spans.push(Span::styled(
      format!("  [{detail}]"),
      Style::default().fg(Color::DarkGray),
    ));
  }
  if let Some(date) = &rel.union_date {
    let range = match &rel.dissolution_date {
      Some(end) => format!("  {date} – {end}"),
      None => format!("  {date} –"),
    };
    spans.push(Span::styled(range, Style::default().fg(Color::DarkGray)));
  }

  ListItem::new(Line::from(spans))
}

// ─── Overlays ────────────────────────────────────────────────────────────────

fn draw_editor(f: &mut Frame, area: Rect, editor: &DetailEditor) {
  let height = 4 + editor.fields().len() as u16;
  let rect = super::overlay(f, area, 54, height);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan))
    .title(format!(" {} details ", editor.kind.label()));
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let mut lines = Vec::new();
  for field in editor.fields() {
    let focused = editor.focus == field;
    let (label, value) = match field {
      EditorField::Detail => {
        let detail = editor
          .options
          .get(editor.selected)
          .map(String::as_str)
          .unwrap_or("");
        ("Type".to_string(), format!("\u{2039} {detail} \u{203a}"))
      }
      EditorField::UnionDate => {
        ("Union date".to_string(), input_value(&editor.union_date, focused))
      }
      EditorField::DissolutionDate => (
        "Dissolution date".to_string(),
        input_value(&editor.dissolution_date, focused),
      ),
      EditorField::Notes => {
        ("Notes".to_string(), input_value(&editor.notes, focused))
      }
    };
    lines.push(field_line(&label, &value, focused));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn draw_removal_prompt(f: &mut Frame, area: Rect) {
  let rect = super::overlay(f, area, 48, 4);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red))
    .title(" Remove relationship ");
  let inner = block.inner(rect);
  f.render_widget(block, rect);
  f.render_widget(
    Paragraph::new("Remove this relationship?  y confirm / n cancel"),
    inner,
  );
}

// ─── Style helpers ───────────────────────────────────────────────────────────

pub(super) fn pane_border(focused: bool) -> Style {
  if focused {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

pub(super) fn highlight(carrying: bool) -> Style {
  let bg = if carrying { Color::Yellow } else { Color::Cyan };
  Style::default().bg(bg).fg(Color::Black).add_modifier(Modifier::BOLD)
}

pub(super) fn input_value(value: &str, focused: bool) -> String {
  if focused {
    format!("{value}\u{2588}")
  } else {
    value.to_string()
  }
}

pub(super) fn field_line<'a>(
  label: &str,
  value: &str,
  focused: bool,
) -> Line<'a> {
  let label_style = if focused {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  Line::from(vec![
    Span::styled(format!("{label:>18}  "), label_style),
    Span::raw(value.to_string()),
  ])
}
