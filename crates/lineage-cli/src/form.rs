//! Add-individual form overlay: focus handling over the draft fields.
//!
//! The field list is dynamic — death fields only participate while the
//! toggle makes them visible, and identity fieldsets can be added and
//! removed. All serialization and validation rules live in
//! `lineage_core::form`; this controller only moves focus and edits text.

use lineage_core::form::{IdentityDraft, IndividualDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
  FirstName,
  LastName,
  Gender,
}

/// One focusable element of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  FirstName,
  LastName,
  Gender,
  BirthDate,
  BirthPlace,
  Deceased,
  DeceasedUnknown,
  DeathDate,
  DeathPlace,
  Notes,
  Identity(usize, IdentityField),
}

impl FormField {
  pub fn is_checkbox(self) -> bool {
    matches!(self, Self::Deceased | Self::DeceasedUnknown)
  }
}

/// Controller state for the add-individual form.
#[derive(Debug, Default)]
pub struct AddIndividualForm {
  pub draft:   IndividualDraft,
  pub focus:   usize,
  /// Validation or submission feedback shown inside the overlay.
  pub message: Option<String>,
}

impl AddIndividualForm {
  /// The focusable fields in tab order, honoring the death-field toggle.
  pub fn fields(&self) -> Vec<FormField> {
    let mut fields = vec![
      FormField::FirstName,
      FormField::LastName,
      FormField::Gender,
      FormField::BirthDate,
      FormField::BirthPlace,
      FormField::Deceased,
      FormField::DeceasedUnknown,
    ];
    if self.draft.flags.death_fields_visible() {
      fields.push(FormField::DeathDate);
      fields.push(FormField::DeathPlace);
    }
    fields.push(FormField::Notes);
    for i in 0..self.draft.identities.len() {
      fields.push(FormField::Identity(i, IdentityField::FirstName));
      fields.push(FormField::Identity(i, IdentityField::LastName));
      fields.push(FormField::Identity(i, IdentityField::Gender));
    }
    fields
  }

  pub fn focused(&self) -> FormField {
    let fields = self.fields();
    fields[self.focus.min(fields.len() - 1)]
  }

  pub fn focus_next(&mut self) {
    let len = self.fields().len();
    self.focus = (self.focus + 1) % len;
  }

  pub fn focus_prev(&mut self) {
    let len = self.fields().len();
    self.focus = (self.focus + len - 1) % len;
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn type_char(&mut self, c: char) {
    if let Some(buffer) = self.buffer_mut() {
      buffer.push(c);
    }
  }

  pub fn backspace(&mut self) {
    if let Some(buffer) = self.buffer_mut() {
      buffer.pop();
    }
  }

  /// Space on a checkbox field. The pair stays mutually exclusive, and the
  /// focus is re-clamped because toggling can hide the death fields.
  pub fn toggle(&mut self) {
    match self.focused() {
      FormField::Deceased => {
        let next = !self.draft.flags.deceased;
        self.draft.flags.set_deceased(next);
      }
      FormField::DeceasedUnknown => {
        let next = !self.draft.flags.deceased_unknown;
        self.draft.flags.set_deceased_unknown(next);
      }
      _ => return,
    }
    self.focus = self.focus.min(self.fields().len() - 1);
  }

  fn buffer_mut(&mut self) -> Option<&mut String> {
    let field = self.focused();
    let draft = &mut self.draft;
    Some(match field {
      FormField::FirstName => &mut draft.first_name,
      FormField::LastName => &mut draft.last_name,
      FormField::Gender => &mut draft.gender,
      FormField::BirthDate => &mut draft.birth_date,
      FormField::BirthPlace => &mut draft.birth_place,
      FormField::DeathDate => &mut draft.death_date,
      FormField::DeathPlace => &mut draft.death_place,
      FormField::Notes => &mut draft.notes,
      FormField::Identity(i, attr) => {
        let identity = draft.identities.get_mut(i)?;
        match attr {
          IdentityField::FirstName => &mut identity.first_name,
          IdentityField::LastName => &mut identity.last_name,
          IdentityField::Gender => &mut identity.gender,
        }
      }
      FormField::Deceased | FormField::DeceasedUnknown => return None,
    })
  }

  // ── Identity fieldsets ────────────────────────────────────────────────────

  pub fn add_identity(&mut self) {
    self.draft.identities.push(IdentityDraft::default());
  }

  pub fn remove_last_identity(&mut self) {
    self.draft.identities.pop();
    self.focus = self.focus.min(self.fields().len() - 1);
  }

  /// Reset after a successful submission: fields cleared, toggle re-applied.
  pub fn reset(&mut self) {
    self.draft.reset();
    self.focus = 0;
    self.message = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn death_fields_join_tab_order_only_when_visible() {
    let mut form = AddIndividualForm::default();
    assert!(!form.fields().contains(&FormField::DeathDate));

    // Focus the deceased checkbox and toggle it on.
    while form.focused() != FormField::Deceased {
      form.focus_next();
    }
    form.toggle();
    assert!(form.fields().contains(&FormField::DeathDate));

    // Deceased-unknown hides them again.
    form.focus_next();
    assert_eq!(form.focused(), FormField::DeceasedUnknown);
    form.toggle();
    assert!(!form.fields().contains(&FormField::DeathDate));
    assert!(!form.draft.flags.deceased);
  }

  #[test]
  fn typing_lands_in_the_focused_field() {
    let mut form = AddIndividualForm::default();
    form.type_char('A');
    form.type_char('d');
    form.type_char('a');
    assert_eq!(form.draft.first_name, "Ada");

    form.focus_next();
    form.type_char('L');
    assert_eq!(form.draft.last_name, "L");
    form.backspace();
    assert_eq!(form.draft.last_name, "");
  }

  #[test]
  fn identity_fieldsets_extend_the_tab_order() {
    let mut form = AddIndividualForm::default();
    let base = form.fields().len();
    form.add_identity();
    assert_eq!(form.fields().len(), base + 3);
    form.remove_last_identity();
    assert_eq!(form.fields().len(), base);
  }

  #[test]
  fn reset_clears_everything_for_another_entry() {
    let mut form = AddIndividualForm::default();
    form.type_char('A');
    form.add_identity();
    form.focus_next();
    form.message = Some("oops".into());

    form.reset();
    assert_eq!(form.draft.first_name, "");
    assert!(form.draft.identities.is_empty());
    assert_eq!(form.focus, 0);
    assert!(form.message.is_none());
  }

  #[test]
  fn focus_stays_in_bounds_when_fields_disappear() {
    let mut form = AddIndividualForm::default();
    form.add_identity();
    // Focus the last identity field, then remove the fieldset.
    form.focus = form.fields().len() - 1;
    form.remove_last_identity();
    assert!(form.focus < form.fields().len());
  }
}
