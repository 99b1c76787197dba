//! Project records and the modal-prepared form actions.

use serde::Deserialize;

/// A project row. Identified by the id/name pair carried on its action
/// buttons; never expanded into a richer object by this layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
  pub id:   i64,
  pub name: String,
}

/// What a confirmation modal is about to do to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
  Update,
  Delete,
}

impl ProjectAction {
  /// Submission target with the project id embedded, matching the server's
  /// `/projects/<id>/update` and `/projects/<id>/delete` form routes.
  pub fn form_action(self, project_id: i64) -> String {
    match self {
      Self::Update => format!("/projects/{project_id}/update"),
      Self::Delete => format!("/projects/{project_id}/delete"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn form_actions_embed_the_project_id() {
    assert_eq!(ProjectAction::Update.form_action(3), "/projects/3/update");
    assert_eq!(ProjectAction::Delete.form_action(17), "/projects/17/delete");
  }
}
