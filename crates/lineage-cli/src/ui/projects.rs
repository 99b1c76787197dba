//! Projects screen: the project list plus its create/update/delete overlays.

use lineage_core::project::ProjectAction;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let screen = &app.projects;

  let items: Vec<ListItem> = screen
    .projects
    .iter()
    .map(|p| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:>4}  ", p.id),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(p.name.clone()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  if !screen.projects.is_empty() {
    state.select(Some(screen.cursor));
  }

  let list = List::new(items)
    .block(
      Block::default()
        .borders(Borders::ALL)
        .title(format!(" Projects ({}) ", screen.projects.len())),
    )
    .highlight_style(
      Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD),
    );

  f.render_stateful_widget(list, area, &mut state);

  if let Some(name) = &screen.create_input {
    draw_create(f, area, name);
  } else if let Some(modal) = &screen.modal {
    match modal.action {
      ProjectAction::Update => draw_update(f, area, modal),
      ProjectAction::Delete => draw_delete(f, area, modal),
    }
  }
}

fn draw_create(f: &mut Frame, area: Rect, name: &str) {
  let rect = super::overlay(f, area, 50, 5);
  let block = Block::default().borders(Borders::ALL).title(" New Project ");
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
    .split(inner);
  f.render_widget(Paragraph::new("Project name:"), rows[0]);
  f.render_widget(
    Paragraph::new(format!("{name}\u{2588}"))
      .style(Style::default().fg(Color::Cyan)),
    rows[1],
  );
}

fn draw_update(f: &mut Frame, area: Rect, modal: &crate::projects::ProjectModal) {
  let rect = super::overlay(f, area, 50, 6);
  let block = Block::default()
    .borders(Borders::ALL)
    .title(format!(" Update Project #{} ", modal.project_id));
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
    .split(inner);
  f.render_widget(Paragraph::new("Project name:"), rows[0]);
  f.render_widget(
    Paragraph::new(format!("{}\u{2588}", modal.name_input))
      .style(Style::default().fg(Color::Cyan)),
    rows[1],
  );
}

fn draw_delete(f: &mut Frame, area: Rect, modal: &crate::projects::ProjectModal) {
  let rect = super::overlay(f, area, 56, 6);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red))
    .title(" Delete Project ");
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let lines = vec![
    Line::from(vec![
      Span::raw("Delete project "),
      Span::styled(
        modal.project_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      ),
      Span::raw("?"),
    ]),
    Line::from(Span::styled(
      "All of its individuals and relationships go with it.",
      Style::default().fg(Color::Red),
    )),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}
