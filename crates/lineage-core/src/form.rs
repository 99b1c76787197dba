//! The add-individual form: field collection, validation, serialization.
//!
//! The form is serialized exactly the way the server expects it: empty
//! strings become `null`, death fields are forced to `null` when the
//! deceased-unknown checkbox is set, and secondary identities are appended
//! as an ordered array.

use crate::{
  Error, Result,
  deceased::DeceasedFlags,
  individual::{Identity, NewIndividual},
};

// ─── Identity drafts ─────────────────────────────────────────────────────────

/// One dynamically added identity fieldset.
#[derive(Debug, Clone, Default)]
pub struct IdentityDraft {
  pub first_name: String,
  pub last_name:  String,
  pub gender:     String,
}

impl IdentityDraft {
  /// A draft contributes to the payload only if it has at least one
  /// non-empty attribute.
  pub fn is_blank(&self) -> bool {
    self.first_name.trim().is_empty()
      && self.last_name.trim().is_empty()
      && self.gender.trim().is_empty()
  }

  fn to_identity(&self) -> Identity {
    Identity {
      first_name: blank_to_none(&self.first_name),
      last_name:  blank_to_none(&self.last_name),
      gender:     blank_to_none(&self.gender),
    }
  }
}

/// Extract the attribute name from a bracketed form-field name, e.g.
/// `identities[2][first_name]` → `Some("first_name")`.
pub fn identity_attr(field_name: &str) -> Option<&str> {
  let trimmed = field_name.strip_suffix(']')?;
  let open = trimmed.rfind('[')?;
  let attr = &trimmed[open + 1..];
  let valid = !attr.is_empty()
    && attr.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
  valid.then_some(attr)
}

/// Group raw `(name, value)` pairs — one slice per fieldset — into identity
/// mappings, skipping blank values and fieldsets with nothing filled in.
pub fn collect_identities(fieldsets: &[Vec<(String, String)>]) -> Vec<Identity> {
  fieldsets
    .iter()
    .filter_map(|fields| {
      let mut identity = Identity::default();
      let mut any = false;
      for (name, value) in fields {
        if value.trim().is_empty() {
          continue;
        }
        match identity_attr(name) {
          Some("first_name") => identity.first_name = Some(value.clone()),
          Some("last_name") => identity.last_name = Some(value.clone()),
          Some("gender") => identity.gender = Some(value.clone()),
          _ => continue,
        }
        any = true;
      }
      any.then_some(identity)
    })
    .collect()
}

// ─── Individual draft ────────────────────────────────────────────────────────

/// All fields of the add-individual form, before serialization.
#[derive(Debug, Clone, Default)]
pub struct IndividualDraft {
  pub first_name:  String,
  pub last_name:   String,
  pub gender:      String,
  pub birth_date:  String,
  pub birth_place: String,
  pub death_date:  String,
  pub death_place: String,
  pub notes:       String,
  pub flags:       DeceasedFlags,
  pub identities:  Vec<IdentityDraft>,
}

impl IndividualDraft {
  /// Required-field check. Runs before any request is issued; a failure
  /// aborts submission with a user-visible message.
  pub fn validate(&self) -> Result<()> {
    let mut missing = Vec::new();
    if self.first_name.trim().is_empty() {
      missing.push("first name");
    }
    if self.last_name.trim().is_empty() {
      missing.push("last name");
    }
    if self.gender.trim().is_empty() {
      missing.push("gender");
    }
    if missing.is_empty() {
      Ok(())
    } else {
      Err(Error::MissingRequired(missing))
    }
  }

  /// Serialize for `POST /api/individuals/`.
  pub fn payload(&self) -> NewIndividual {
    let unknown = self.flags.deceased_unknown;
    NewIndividual {
      first_name:  blank_to_none(&self.first_name),
      last_name:   blank_to_none(&self.last_name),
      gender:      blank_to_none(&self.gender),
      birth_date:  blank_to_none(&self.birth_date),
      birth_place: blank_to_none(&self.birth_place),
      // Deceased-unknown wins over anything typed into the death fields.
      death_date:  if unknown { None } else { blank_to_none(&self.death_date) },
      death_place: if unknown { None } else { blank_to_none(&self.death_place) },
      notes:       blank_to_none(&self.notes),
      identities:  self
        .identities
        .iter()
        .filter(|d| !d.is_blank())
        .map(IdentityDraft::to_identity)
        .collect(),
    }
  }

  /// Clear every field and re-apply the toggle, as after a successful
  /// submission.
  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

fn blank_to_none(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_draft() -> IndividualDraft {
    IndividualDraft {
      first_name: "Ada".into(),
      last_name: "Lovelace".into(),
      gender: "female".into(),
      ..Default::default()
    }
  }

  #[test]
  fn validate_reports_all_missing_fields() {
    let err = IndividualDraft::default().validate().unwrap_err();
    let Error::MissingRequired(fields) = err else {
      panic!("expected MissingRequired");
    };
    assert_eq!(fields, vec!["first name", "last name", "gender"]);
  }

  #[test]
  fn validate_accepts_complete_draft() {
    assert!(valid_draft().validate().is_ok());
  }

  #[test]
  fn payload_converts_blanks_to_none() {
    let mut draft = valid_draft();
    draft.birth_place = "   ".into();
    let payload = draft.payload();
    assert_eq!(payload.birth_place, None);
    assert_eq!(payload.first_name.as_deref(), Some("Ada"));
  }

  #[test]
  fn deceased_unknown_forces_death_fields_to_none() {
    let mut draft = valid_draft();
    draft.death_date = "1852-11-27".into();
    draft.death_place = "London".into();
    draft.flags.set_deceased_unknown(true);
    let payload = draft.payload();
    assert_eq!(payload.death_date, None);
    assert_eq!(payload.death_place, None);
  }

  #[test]
  fn blank_identity_drafts_are_dropped() {
    let mut draft = valid_draft();
    draft.identities.push(IdentityDraft::default());
    draft.identities.push(IdentityDraft {
      first_name: "Augusta".into(),
      ..Default::default()
    });
    let payload = draft.payload();
    assert_eq!(payload.identities.len(), 1);
    assert_eq!(payload.identities[0].first_name.as_deref(), Some("Augusta"));
  }

  #[test]
  fn identity_attr_parses_bracketed_suffix() {
    assert_eq!(identity_attr("identities[0][first_name]"), Some("first_name"));
    assert_eq!(identity_attr("identities[12][gender]"), Some("gender"));
    assert_eq!(identity_attr("first_name"), None);
    assert_eq!(identity_attr("identities[0][]"), None);
  }

  #[test]
  fn collect_identities_groups_per_fieldset() {
    let fieldsets = vec![
      vec![
        ("identities[0][first_name]".to_string(), "Augusta".to_string()),
        ("identities[0][last_name]".to_string(), "".to_string()),
      ],
      vec![("identities[1][last_name]".to_string(), "Byron".to_string())],
      vec![("identities[2][first_name]".to_string(), "  ".to_string())],
    ];
    let identities = collect_identities(&fieldsets);
    assert_eq!(identities.len(), 2);
    assert_eq!(identities[0].first_name.as_deref(), Some("Augusta"));
    assert_eq!(identities[0].last_name, None);
    assert_eq!(identities[1].last_name.as_deref(), Some("Byron"));
  }
}
