//! Relationship links between individuals.
//!
//! A relationship is directed: `initial_relationship` is stored from the
//! perspective of `individual_id`. Parent/child links are both stored as
//! `parent`; which side is which is decided at creation time from the list
//! the row was dropped on.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The three relationship kinds a drop target can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelKind {
  Parent,
  Partner,
  Child,
}

impl RelKind {
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "parent" => Ok(Self::Parent),
      "partner" => Ok(Self::Partner),
      "child" => Ok(Self::Child),
      other => Err(Error::UnknownRelationshipKind(other.to_string())),
    }
  }

  /// Parent and child rows are vertical; partner rows are horizontal.
  pub fn is_vertical(self) -> bool {
    matches!(self, Self::Parent | Self::Child)
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Parent => "parent",
      Self::Partner => "partner",
      Self::Child => "child",
    }
  }
}

// ─── Detail enums ────────────────────────────────────────────────────────────

/// Detail values for parent/child (vertical) relationships.
pub const VERTICAL_DETAILS: [&str; 5] =
  ["biological", "step", "adoptive", "foster", "other"];

/// Detail values for partner (horizontal) relationships.
pub const HORIZONTAL_DETAILS: [&str; 3] =
  ["marriage", "civil union", "partnership"];

/// The enumerated detail set appropriate to a row's orientation.
pub fn detail_options(kind: RelKind) -> &'static [&'static str] {
  if kind.is_vertical() { &VERTICAL_DETAILS } else { &HORIZONTAL_DETAILS }
}

/// Placeholder detail applied on creation, edited by the user afterward.
pub fn default_detail(kind: RelKind) -> &'static str {
  if kind.is_vertical() { "biological" } else { "marriage" }
}

/// Options for the detail select, plus the index to pre-select.
///
/// A current value outside the enumerated set is injected as an extra
/// option rather than dropped, so legacy data is never silently discarded.
pub fn detail_choices(kind: RelKind, current: &str) -> (Vec<String>, usize) {
  let mut options: Vec<String> =
    detail_options(kind).iter().map(|s| s.to_string()).collect();
  if current.is_empty() {
    return (options, 0);
  }
  match options.iter().position(|o| o == current) {
    Some(i) => (options, i),
    None => {
      options.push(current.to_string());
      let i = options.len() - 1;
      (options, i)
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A related individual as rendered in the parents/partners/children and
/// siblings lists. Sibling rows carry no relationship id — they are
/// computed transitively server-side and shown read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct Relative {
  pub id:                  i64,
  #[serde(default)]
  pub first_name:          Option<String>,
  #[serde(default)]
  pub last_name:           Option<String>,
  #[serde(default)]
  pub relationship_id:     Option<i64>,
  #[serde(default)]
  pub relationship_detail: Option<String>,
  #[serde(default)]
  pub union_date:          Option<String>,
  #[serde(default)]
  pub dissolution_date:    Option<String>,
  #[serde(default)]
  pub notes:               Option<String>,
}

impl Relative {
  pub fn display_name(&self) -> String {
    let first = self.first_name.as_deref().unwrap_or("Unknown");
    let last = self.last_name.as_deref().unwrap_or_default();
    format!("{first} {last}").trim().to_string()
  }
}

// ─── Write models ────────────────────────────────────────────────────────────

/// Body of `POST /api/relationships/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelationship {
  pub individual_id:        i64,
  pub related_id:           i64,
  pub initial_relationship: RelKind,
  pub relationship_detail:  String,
}

impl NewRelationship {
  /// Resolve directionality for a drop of individual `dragged` onto the
  /// `target` list of the currently viewed individual.
  ///
  /// Dropping on "children" makes the viewed individual the parent, so the
  /// link is stored as `parent` with the viewed individual on the primary
  /// side. Dropping on "parents" reverses the sides. Partners keep the
  /// viewed individual primary.
  pub fn link(viewed: i64, dragged: i64, target: RelKind) -> Self {
    let (individual_id, related_id, kind) = match target {
      RelKind::Child => (viewed, dragged, RelKind::Parent),
      RelKind::Parent => (dragged, viewed, RelKind::Parent),
      RelKind::Partner => (viewed, dragged, RelKind::Partner),
    };
    Self {
      individual_id,
      related_id,
      initial_relationship: kind,
      relationship_detail: default_detail(target).to_string(),
    }
  }
}

/// Body of `PATCH /api/relationships/{id}` — any subset of the editable
/// fields. Omitted fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationshipPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub initial_relationship: Option<RelKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub relationship_detail:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub union_date:           Option<Option<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dissolution_date:     Option<Option<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:                Option<String>,
}

impl RelationshipPatch {
  /// Patch applied when an existing relationship row is dropped onto a
  /// different target list: re-categorize to that list's semantics.
  pub fn recategorize(target: RelKind) -> Self {
    let kind = match target {
      RelKind::Child | RelKind::Parent => RelKind::Parent,
      RelKind::Partner => RelKind::Partner,
    };
    Self {
      initial_relationship: Some(kind),
      relationship_detail: Some(default_detail(target).to_string()),
      ..Default::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn drop_on_children_makes_viewed_the_parent() {
    let link = NewRelationship::link(42, 7, RelKind::Child);
    assert_eq!(link.individual_id, 42);
    assert_eq!(link.related_id, 7);
    assert_eq!(link.initial_relationship, RelKind::Parent);
    assert_eq!(link.relationship_detail, "biological");
  }

  #[test]
  fn drop_on_parents_makes_dragged_the_parent() {
    let link = NewRelationship::link(42, 7, RelKind::Parent);
    assert_eq!(link.individual_id, 7);
    assert_eq!(link.related_id, 42);
    assert_eq!(link.initial_relationship, RelKind::Parent);
  }

  #[test]
  fn drop_on_partners_keeps_viewed_primary() {
    let link = NewRelationship::link(42, 7, RelKind::Partner);
    assert_eq!(link.individual_id, 42);
    assert_eq!(link.related_id, 7);
    assert_eq!(link.initial_relationship, RelKind::Partner);
    assert_eq!(link.relationship_detail, "marriage");
  }

  #[test]
  fn detail_choices_preselects_current_value() {
    let (options, selected) = detail_choices(RelKind::Parent, "adoptive");
    assert_eq!(options[selected], "adoptive");
    assert_eq!(options.len(), VERTICAL_DETAILS.len());
  }

  #[test]
  fn legacy_detail_is_injected_not_dropped() {
    let (options, selected) = detail_choices(RelKind::Partner, "handfasting");
    assert_eq!(options.len(), HORIZONTAL_DETAILS.len() + 1);
    assert_eq!(options[selected], "handfasting");
  }

  #[test]
  fn patch_serializes_only_set_fields() {
    let patch = RelationshipPatch {
      relationship_detail: Some("step".into()),
      notes: Some("".into()),
      ..Default::default()
    };
    let json = serde_json::to_value(&patch).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert!(obj.contains_key("relationship_detail"));
    assert!(obj.contains_key("notes"));
  }

  #[test]
  fn patch_can_null_a_partner_date() {
    let patch = RelationshipPatch {
      union_date: Some(None),
      ..Default::default()
    };
    let json = serde_json::to_value(&patch).unwrap();
    assert!(json.get("union_date").unwrap().is_null());
  }

  #[test]
  fn recategorize_matches_target_semantics() {
    let patch = RelationshipPatch::recategorize(RelKind::Child);
    assert_eq!(patch.initial_relationship, Some(RelKind::Parent));
    assert_eq!(patch.relationship_detail.as_deref(), Some("biological"));
    assert_eq!(patch.union_date, None);

    let patch = RelationshipPatch::recategorize(RelKind::Partner);
    assert_eq!(patch.initial_relationship, Some(RelKind::Partner));
    assert_eq!(patch.relationship_detail.as_deref(), Some("marriage"));
  }

  #[test]
  fn kind_parse_round_trip() {
    for s in ["parent", "partner", "child"] {
      assert_eq!(RelKind::parse(s).unwrap().label(), s);
    }
    assert!(RelKind::parse("sibling").is_err());
  }
}
