//! The deceased / deceased-unknown checkbox pair.
//!
//! The two flags are mutually exclusive: selecting one clears the other
//! before visibility is recomputed or a form is submitted. This is the only
//! invariant the client enforces ahead of the server.

use serde::{Deserialize, Serialize};

/// State of the paired deceased checkboxes on the individual form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeceasedFlags {
  pub deceased:         bool,
  pub deceased_unknown: bool,
}

impl DeceasedFlags {
  /// Set the "deceased" checkbox, clearing "deceased unknown" if needed.
  pub fn set_deceased(&mut self, checked: bool) {
    self.deceased = checked;
    if checked {
      self.deceased_unknown = false;
    }
  }

  /// Set the "deceased unknown" checkbox, clearing "deceased" if needed.
  pub fn set_deceased_unknown(&mut self, checked: bool) {
    self.deceased_unknown = checked;
    if checked {
      self.deceased = false;
    }
  }

  /// Death date/place fields are shown iff deceased and not unknown.
  pub fn death_fields_visible(&self) -> bool {
    self.deceased && !self.deceased_unknown
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn visibility_truth_table() {
    let mut f = DeceasedFlags::default();
    assert!(!f.death_fields_visible());

    f.set_deceased(true);
    assert!(f.death_fields_visible());

    f.set_deceased_unknown(true);
    assert!(!f.death_fields_visible());

    f.set_deceased_unknown(false);
    assert!(!f.death_fields_visible());
  }

  #[test]
  fn checkboxes_are_mutually_exclusive() {
    let mut f = DeceasedFlags::default();

    f.set_deceased(true);
    f.set_deceased_unknown(true);
    assert!(!f.deceased);
    assert!(f.deceased_unknown);

    f.set_deceased(true);
    assert!(f.deceased);
    assert!(!f.deceased_unknown);

    // Never both checked after any sequence of changes.
    assert!(!(f.deceased && f.deceased_unknown));
  }

  #[test]
  fn unchecking_does_not_touch_the_other_flag() {
    let mut f = DeceasedFlags::default();
    f.set_deceased(true);
    f.set_deceased(false);
    assert!(!f.deceased);
    assert!(!f.deceased_unknown);
  }
}
