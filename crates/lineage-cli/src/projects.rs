//! Project list screen and its update/delete confirmation modals.
//!
//! The modal controller mirrors the original page: before a modal shows,
//! it is populated from the selected row's id and name, and the submission
//! target is rewritten to embed the project id. The modal itself performs
//! no API call beyond submitting that prepared form.

use std::sync::Arc;

use lineage_core::project::{Project, ProjectAction};

use crate::client::{ApiClient, ApiError, Result};

/// A confirmation modal, populated from the triggering row.
#[derive(Debug)]
pub struct ProjectModal {
  pub action:       ProjectAction,
  pub project_id:   i64,
  /// Shown back to the user for confirmation.
  pub project_name: String,
  /// The prepared submission target, id embedded.
  pub form_action:  String,
  /// Editable name field (update modal only).
  pub name_input:   String,
}

impl ProjectModal {
  /// Populate the modal the way the `show.bs.modal` hook did: read the
  /// row's id/name, rewrite the form action, fill the name field.
  pub fn prepare(action: ProjectAction, project: &Project) -> Self {
    Self {
      action,
      project_id: project.id,
      project_name: project.name.clone(),
      form_action: action.form_action(project.id),
      name_input: project.name.clone(),
    }
  }
}

/// Controller state for the projects screen.
pub struct ProjectsScreen {
  client: Arc<ApiClient>,
  pub projects: Vec<Project>,
  pub cursor:   usize,
  pub modal:    Option<ProjectModal>,
  /// Name buffer for the create-project form, when open.
  pub create_input: Option<String>,
  pub status: String,
}

impl ProjectsScreen {
  pub fn new(client: Arc<ApiClient>) -> Self {
    Self {
      client,
      projects: Vec::new(),
      cursor: 0,
      modal: None,
      create_input: None,
      status: String::new(),
    }
  }

  fn report(&mut self, err: ApiError) -> Result<()> {
    if matches!(err, ApiError::Unauthorized) {
      return Err(err);
    }
    tracing::warn!(error = %err, "project action failed");
    self.status = err.to_string();
    Ok(())
  }

  pub async fn refresh(&mut self) -> Result<()> {
    match self.client.list_projects().await {
      Ok(projects) => {
        self.projects = projects;
        self.cursor =
          self.cursor.min(self.projects.len().saturating_sub(1));
        Ok(())
      }
      Err(e) => self.report(e),
    }
  }

  pub fn move_cursor(&mut self, delta: isize) {
    if self.projects.is_empty() {
      return;
    }
    let last = self.projects.len() - 1;
    self.cursor = match delta {
      d if d < 0 => self.cursor.saturating_sub(d.unsigned_abs()),
      d => (self.cursor + d as usize).min(last),
    };
  }

  pub fn selected(&self) -> Option<&Project> {
    self.projects.get(self.cursor)
  }

  // ── Modals ────────────────────────────────────────────────────────────────

  pub fn open_modal(&mut self, action: ProjectAction) {
    if let Some(project) = self.selected() {
      self.modal = Some(ProjectModal::prepare(action, project));
    }
  }

  pub fn close_modal(&mut self) {
    self.modal = None;
  }

  /// Submit the prepared form. On failure the modal stays open.
  pub async fn submit_modal(&mut self) -> Result<()> {
    let Some(modal) = self.modal.take() else {
      return Ok(());
    };
    let result = match modal.action {
      ProjectAction::Update => {
        self
          .client
          .update_project(modal.project_id, modal.name_input.trim())
          .await
      }
      ProjectAction::Delete => {
        self.client.delete_project(modal.project_id).await
      }
    };
    match result {
      Ok(()) => {
        self.status = match modal.action {
          ProjectAction::Update => "Project updated successfully!".into(),
          ProjectAction::Delete => "Project deleted successfully.".into(),
        };
        self.refresh().await
      }
      Err(e) => {
        self.modal = Some(modal);
        self.report(e)
      }
    }
  }

  // ── Create form ───────────────────────────────────────────────────────────

  pub fn open_create(&mut self) {
    self.create_input = Some(String::new());
  }

  pub fn close_create(&mut self) {
    self.create_input = None;
  }

  pub async fn submit_create(&mut self) -> Result<()> {
    let Some(name) = self.create_input.take() else {
      return Ok(());
    };
    let name = name.trim().to_string();
    if name.is_empty() {
      self.status = "Project name is required.".into();
      self.create_input = Some(String::new());
      return Ok(());
    }
    match self.client.create_project(&name).await {
      Ok(()) => {
        self.status = "Project created successfully!".into();
        self.refresh().await
      }
      Err(e) => {
        self.create_input = Some(name);
        self.report(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn project(id: i64, name: &str) -> Project {
    serde_json::from_value(serde_json::json!({ "id": id, "name": name }))
      .unwrap()
  }

  #[test]
  fn modal_is_populated_from_the_selected_row() {
    let modal =
      ProjectModal::prepare(ProjectAction::Update, &project(3, "Byrons"));
    assert_eq!(modal.project_id, 3);
    assert_eq!(modal.project_name, "Byrons");
    assert_eq!(modal.form_action, "/projects/3/update");
    assert_eq!(modal.name_input, "Byrons");

    let modal =
      ProjectModal::prepare(ProjectAction::Delete, &project(3, "Byrons"));
    assert_eq!(modal.form_action, "/projects/3/delete");
  }
}
