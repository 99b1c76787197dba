//! Relationship-board read model and the drag-transfer payload.
//!
//! The board never computes or caches a relationship graph. Every view is a
//! fresh server fetch; after any mutation both the roster and the family
//! card are re-fetched wholesale.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, relationship::Relative};

// ─── Family card ─────────────────────────────────────────────────────────────

/// The viewed individual's relationship set, as returned inside the `data`
/// envelope of `GET /api/individuals/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyCard {
  pub id:       i64,
  #[serde(default)]
  pub parents:  Vec<Relative>,
  #[serde(default)]
  pub partners: Vec<Relative>,
  #[serde(default)]
  pub children: Vec<Relative>,
  #[serde(default)]
  pub siblings: Vec<Relative>,
}

impl FamilyCard {
  /// Ids to hide from the pick list: the viewed individual plus everyone
  /// already linked as parent, partner or child. Siblings stay visible —
  /// they are computed transitively server-side and never linked directly.
  pub fn hidden_ids(&self) -> HashSet<i64> {
    let mut ids = HashSet::new();
    ids.insert(self.id);
    for rel in
      self.parents.iter().chain(&self.partners).chain(&self.children)
    {
      ids.insert(rel.id);
    }
    ids
  }
}

// ─── Drag payload ────────────────────────────────────────────────────────────

/// What a picked-up row is carrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
  /// A roster row: dropping it on a target list creates a relationship.
  Individual,
  /// An existing relationship row: dropping re-categorizes or removes it.
  Relationship,
}

/// Tagged drag-transfer payload, decoded once at drop time.
///
/// Replaces the original's pair of ad hoc MIME keys (`text/plain` for the
/// individual id, a vendor key for the relationship id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
  pub kind:            DragKind,
  /// The dragged individual's id, present for both kinds.
  pub id:              i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub relationship_id: Option<i64>,
}

impl DragPayload {
  pub fn individual(id: i64) -> Self {
    Self { kind: DragKind::Individual, id, relationship_id: None }
  }

  pub fn relationship(individual_id: i64, relationship_id: i64) -> Self {
    Self {
      kind:            DragKind::Relationship,
      id:              individual_id,
      relationship_id: Some(relationship_id),
    }
  }

  /// Serialize for the transfer mechanism.
  pub fn encode(&self) -> String {
    // Infallible: the payload is a plain struct of scalars.
    serde_json::to_string(self).unwrap_or_default()
  }

  pub fn decode(raw: &str) -> Result<Self> {
    serde_json::from_str(raw)
      .map_err(|_| Error::MalformedDragPayload(raw.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn relative(id: i64, relationship_id: Option<i64>) -> Relative {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "relationship_id": relationship_id,
    }))
    .unwrap()
  }

  #[test]
  fn hidden_ids_exclude_related_but_not_siblings() {
    let card = FamilyCard {
      id:       1,
      parents:  vec![relative(2, Some(10))],
      partners: vec![relative(3, Some(11))],
      children: vec![relative(4, Some(12))],
      siblings: vec![relative(5, None)],
    };
    let hidden = card.hidden_ids();
    assert_eq!(hidden, HashSet::from([1, 2, 3, 4]));
    assert!(!hidden.contains(&5));
  }

  #[test]
  fn payload_round_trip() {
    let p = DragPayload::relationship(7, 99);
    let decoded = DragPayload::decode(&p.encode()).unwrap();
    assert_eq!(decoded, p);
    assert_eq!(decoded.relationship_id, Some(99));

    let p = DragPayload::individual(7);
    assert_eq!(DragPayload::decode(&p.encode()).unwrap().relationship_id, None);
  }

  #[test]
  fn malformed_payload_is_an_error() {
    assert!(DragPayload::decode("7").is_err());
    assert!(DragPayload::decode("").is_err());
  }

  #[test]
  fn family_card_deserializes_server_shape() {
    let card: FamilyCard = serde_json::from_value(serde_json::json!({
      "id": 3,
      "parents": [{ "id": 1, "first_name": "George", "relationship_id": 5 }],
      "siblings": [{ "id": 9, "first_name": "Medora" }]
    }))
    .unwrap();
    assert_eq!(card.parents.len(), 1);
    assert_eq!(card.partners.len(), 0);
    assert_eq!(card.siblings[0].id, 9);
  }
}
