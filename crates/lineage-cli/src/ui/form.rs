//! Add-individual form overlay.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::board::{field_line, input_value};
use crate::form::{AddIndividualForm, FormField, IdentityField};

pub fn draw(f: &mut Frame, area: Rect, form: &AddIndividualForm) {
  // Height tracks the dynamic field list plus a message line.
  let field_count = form.fields().len() as u16;
  let identity_headers = form.draft.identities.len() as u16;
  let height = (field_count + identity_headers + 5).min(area.height);

  let rect = super::overlay(f, area, 62, height);
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan))
    .title(" Add Individual ");
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let focused = form.focused();
  let draft = &form.draft;
  let mut lines = Vec::new();

  let text =
    |label: &str, value: &str, field: FormField, lines: &mut Vec<Line>| {
      let is_focused = focused == field;
      lines.push(field_line(label, &input_value(value, is_focused), is_focused));
    };

  text("First name *", &draft.first_name, FormField::FirstName, &mut lines);
  text("Last name *", &draft.last_name, FormField::LastName, &mut lines);
  text("Gender *", &draft.gender, FormField::Gender, &mut lines);
  text("Birth date", &draft.birth_date, FormField::BirthDate, &mut lines);
  text("Birth place", &draft.birth_place, FormField::BirthPlace, &mut lines);

  lines.push(checkbox_line(
    "Deceased",
    draft.flags.deceased,
    focused == FormField::Deceased,
  ));
  lines.push(checkbox_line(
    "Deceased, date unknown",
    draft.flags.deceased_unknown,
    focused == FormField::DeceasedUnknown,
  ));

  if draft.flags.death_fields_visible() {
    text("Death date", &draft.death_date, FormField::DeathDate, &mut lines);
    text("Death place", &draft.death_place, FormField::DeathPlace, &mut lines);
  }

  text("Notes", &draft.notes, FormField::Notes, &mut lines);

  for (i, identity) in draft.identities.iter().enumerate() {
    lines.push(Line::from(Span::styled(
      format!("  Identity {}", i + 2),
      Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    )));
    text(
      "First name",
      &identity.first_name,
      FormField::Identity(i, IdentityField::FirstName),
      &mut lines,
    );
    text(
      "Last name",
      &identity.last_name,
      FormField::Identity(i, IdentityField::LastName),
      &mut lines,
    );
    text(
      "Gender",
      &identity.gender,
      FormField::Identity(i, IdentityField::Gender),
      &mut lines,
    );
  }

  if let Some(message) = &form.message {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
      message.clone(),
      Style::default().fg(Color::Red),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn checkbox_line<'a>(label: &str, checked: bool, focused: bool) -> Line<'a> {
  let mark = if checked { "[x]" } else { "[ ]" };
  let style = if focused {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  Line::from(vec![
    Span::styled(format!("{label:>18}  "), style),
    Span::raw(mark.to_string()),
  ])
}
