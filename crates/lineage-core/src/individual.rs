//! Individual and identity projections of server records.
//!
//! Everything here is a transient read model: rows are never mutated in
//! place, only replaced wholesale by a re-fetch after a server write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// A name record attached to an individual. The primary identity supplies
/// the display name; secondary identities capture aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identity {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub gender:     Option<String>,
}

// ─── Individual ──────────────────────────────────────────────────────────────

/// A person record as returned by `GET /api/individuals/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Individual {
  pub id:               i64,
  #[serde(default)]
  pub primary_identity: Option<Identity>,
  #[serde(default)]
  pub birth_date:       Option<NaiveDate>,
  #[serde(default)]
  pub birth_place:      Option<String>,
  #[serde(default)]
  pub death_date:       Option<NaiveDate>,
  #[serde(default)]
  pub death_place:      Option<String>,
  #[serde(default)]
  pub deceased:         bool,
  #[serde(default)]
  pub deceased_unknown: bool,
  #[serde(default)]
  pub notes:            Option<String>,
}

/// Vital status derived from the server record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalStatus {
  Alive,
  Deceased(Option<NaiveDate>),
  DeceasedUnknown,
}

impl Individual {
  /// "first last" from the primary identity, trimmed; "Unknown" when the
  /// record carries no usable name.
  pub fn display_name(&self) -> String {
    display_name(self.primary_identity.as_ref())
  }

  pub fn vital_status(&self) -> VitalStatus {
    if self.deceased_unknown {
      VitalStatus::DeceasedUnknown
    } else if self.deceased || self.death_date.is_some() {
      VitalStatus::Deceased(self.death_date)
    } else {
      VitalStatus::Alive
    }
  }
}

pub(crate) fn display_name(identity: Option<&Identity>) -> String {
  let Some(identity) = identity else {
    return "Unknown".into();
  };
  let first = identity.first_name.as_deref().unwrap_or_default();
  let last = identity.last_name.as_deref().unwrap_or_default();
  let name = format!("{first} {last}");
  let name = name.trim();
  if name.is_empty() { "Unknown".into() } else { name.to_string() }
}

// ─── Write model ─────────────────────────────────────────────────────────────

/// Body of `POST /api/individuals/`. Empty strings have already been
/// converted to `None` by [`crate::form::IndividualDraft::payload`].
#[derive(Debug, Clone, Serialize)]
pub struct NewIndividual {
  pub first_name:  Option<String>,
  pub last_name:   Option<String>,
  pub gender:      Option<String>,
  pub birth_date:  Option<String>,
  pub birth_place: Option<String>,
  pub death_date:  Option<String>,
  pub death_place: Option<String>,
  pub notes:       Option<String>,
  /// Secondary identities collected from dynamically added fieldsets.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub identities:  Vec<Identity>,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// One row of `GET /api/individuals/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
  pub id:               i64,
  #[serde(default)]
  pub name:             Option<String>,
  #[serde(default)]
  pub primary_identity: Option<Identity>,
}

impl SearchHit {
  pub fn display_name(&self) -> String {
    match &self.name {
      Some(n) if !n.trim().is_empty() => n.clone(),
      _ => display_name(self.primary_identity.as_ref()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identity(first: Option<&str>, last: Option<&str>) -> Identity {
    Identity {
      first_name: first.map(Into::into),
      last_name:  last.map(Into::into),
      gender:     None,
    }
  }

  #[test]
  fn display_name_trims_missing_parts() {
    assert_eq!(
      display_name(Some(&identity(Some("Ada"), None))),
      "Ada"
    );
    assert_eq!(
      display_name(Some(&identity(Some("Ada"), Some("Lovelace")))),
      "Ada Lovelace"
    );
  }

  #[test]
  fn display_name_falls_back_to_unknown() {
    assert_eq!(display_name(None), "Unknown");
    assert_eq!(display_name(Some(&identity(None, None))), "Unknown");
  }

  #[test]
  fn vital_status_tri_state() {
    let mut ind: Individual =
      serde_json::from_value(serde_json::json!({ "id": 1 })).unwrap();
    assert_eq!(ind.vital_status(), VitalStatus::Alive);

    ind.deceased_unknown = true;
    assert_eq!(ind.vital_status(), VitalStatus::DeceasedUnknown);

    ind.deceased_unknown = false;
    ind.death_date = NaiveDate::from_ymd_opt(1852, 11, 27);
    assert_eq!(ind.vital_status(), VitalStatus::Deceased(ind.death_date));
  }

  #[test]
  fn search_hit_prefers_server_name() {
    let hit: SearchHit = serde_json::from_value(serde_json::json!({
      "id": 7,
      "name": "Ada Lovelace",
      "primary_identity": { "first_name": "Augusta" }
    }))
    .unwrap();
    assert_eq!(hit.display_name(), "Ada Lovelace");
  }
}
