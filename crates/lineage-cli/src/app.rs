//! Application state machine and event dispatcher.

use std::{sync::Arc, time::Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lineage_core::project::ProjectAction;

use crate::{
  board::{Board, BoardContext},
  client::{ApiClient, ApiError},
  projects::ProjectsScreen,
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Project roster with the update/delete/create modals.
  Projects,
  /// The relationship board for one project.
  Board,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state. Each screen keeps its own controller state;
/// nothing lives in globals.
pub struct App {
  pub screen:   Screen,
  pub projects: ProjectsScreen,
  pub board:    Option<Board>,
  pub client:   Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    let client = Arc::new(client);
    Self {
      screen: Screen::Projects,
      projects: ProjectsScreen::new(Arc::clone(&client)),
      board: None,
      client,
    }
  }

  /// Load the initial screen. When a project id was given on the command
  /// line, jump straight to its board — the query-parameter entry point.
  pub async fn start(&mut self, project_id: Option<i64>) -> anyhow::Result<()> {
    let result = self.projects.refresh().await;
    self.recover(result).await?;
    if let Some(project_id) = project_id {
      self.open_board(project_id, None).await?;
    }
    Ok(())
  }

  async fn open_board(
    &mut self,
    project_id: i64,
    individual_id: Option<i64>,
  ) -> anyhow::Result<()> {
    let ctx = BoardContext { project_id, individual_id };
    let mut board = Board::new(Arc::clone(&self.client), ctx);
    let result = board.refresh().await;
    self.board = Some(board);
    self.screen = Screen::Board;
    self.recover(result).await
  }

  /// The login-redirect analog: a 401 anywhere re-establishes the session
  /// with the configured credentials instead of showing an action-specific
  /// error. If that login also fails, the app exits.
  async fn recover(
    &mut self,
    result: Result<(), ApiError>,
  ) -> anyhow::Result<()> {
    match result {
      Ok(()) => Ok(()),
      Err(ApiError::Unauthorized) => {
        tracing::info!("session expired; logging in again");
        self.client.login().await?;
        let notice = "Session expired — signed in again, please retry.";
        match self.screen {
          Screen::Projects => self.projects.status = notice.into(),
          Screen::Board => {
            if let Some(board) = &mut self.board {
              board.status = notice.into();
            }
          }
        }
        Ok(())
      }
      // Controllers turn everything else into a status message themselves.
      Err(other) => Err(other.into()),
    }
  }

  // ── Ticks ─────────────────────────────────────────────────────────────────

  /// Periodic work: drives the typeahead debounce.
  pub async fn tick(&mut self, now: Instant) -> anyhow::Result<()> {
    if self.screen != Screen::Board {
      return Ok(());
    }
    let result = match &mut self.board {
      Some(board) => board.tick(now).await,
      None => Ok(()),
    };
    self.recover(result).await
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    match self.screen {
      Screen::Projects => self.handle_projects_key(key).await,
      Screen::Board => self.handle_board_key(key).await,
    }
  }

  // ── Projects screen ───────────────────────────────────────────────────────

  async fn handle_projects_key(
    &mut self,
    key: KeyEvent,
  ) -> anyhow::Result<bool> {
    if self.projects.create_input.is_some() {
      return self.handle_create_project_key(key).await;
    }
    if self.projects.modal.is_some() {
      return self.handle_project_modal_key(key).await;
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Down | KeyCode::Char('j') => self.projects.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.projects.move_cursor(-1),
      KeyCode::Char('r') => {
        let result = self.projects.refresh().await;
        self.recover(result).await?;
      }
      KeyCode::Char('n') => self.projects.open_create(),
      KeyCode::Char('u') => self.projects.open_modal(ProjectAction::Update),
      KeyCode::Char('d') => self.projects.open_modal(ProjectAction::Delete),
      KeyCode::Enter => {
        if let Some(id) = self.projects.selected().map(|p| p.id) {
          self.open_board(id, None).await?;
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_create_project_key(
    &mut self,
    key: KeyEvent,
  ) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => self.projects.close_create(),
      KeyCode::Enter => {
        let result = self.projects.submit_create().await;
        self.recover(result).await?;
      }
      KeyCode::Backspace => {
        if let Some(input) = &mut self.projects.create_input {
          input.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(input) = &mut self.projects.create_input {
          input.push(c);
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_project_modal_key(
    &mut self,
    key: KeyEvent,
  ) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => self.projects.close_modal(),
      KeyCode::Enter => {
        let result = self.projects.submit_modal().await;
        self.recover(result).await?;
      }
      KeyCode::Backspace => {
        if let Some(modal) = &mut self.projects.modal {
          if modal.action == ProjectAction::Update {
            modal.name_input.pop();
          }
        }
      }
      KeyCode::Char(c) => {
        if let Some(modal) = &mut self.projects.modal {
          if modal.action == ProjectAction::Update {
            modal.name_input.push(c);
          }
        }
      }
      _ => {}
    }
    Ok(true)
  }

  // ── Board screen ──────────────────────────────────────────────────────────

  fn board_mut(&mut self) -> Option<&mut Board> {
    self.board.as_mut()
  }

  async fn handle_board_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(board) = &self.board else {
      self.screen = Screen::Projects;
      return Ok(true);
    };

    if board.form.is_some() {
      return self.handle_form_key(key).await;
    }
    if board.editor.is_some() {
      return self.handle_editor_key(key).await;
    }
    if board.pending_removal.is_some() {
      return self.handle_removal_key(key).await;
    }
    if board.search_active {
      return self.handle_search_key(key).await;
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('b') => {
        self.board = None;
        self.screen = Screen::Projects;
        let result = self.projects.refresh().await;
        self.recover(result).await?;
      }
      KeyCode::Tab => {
        if let Some(board) = self.board_mut() {
          board.focus_next_pane();
        }
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if let Some(board) = self.board_mut() {
          board.move_cursor(1);
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if let Some(board) = self.board_mut() {
          board.move_cursor(-1);
        }
      }
      KeyCode::Char('/') => {
        if let Some(board) = self.board_mut() {
          board.open_search();
        }
      }
      KeyCode::Char('r') => {
        let result = match self.board_mut() {
          Some(board) => board.refresh().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Char(' ') => {
        let needs_drop = self
          .board
          .as_ref()
          .is_some_and(|b| !b.select_mode && b.carried.is_some());
        if needs_drop {
          let result = match self.board_mut() {
            Some(board) => board.drop_here().await,
            None => Ok(()),
          };
          self.recover(result).await?;
        } else if let Some(board) = self.board_mut() {
          if board.select_mode {
            board.toggle_checked();
          } else {
            board.grab();
          }
        }
      }
      KeyCode::Enter => {
        let result = match self.board_mut() {
          Some(board) if board.carried.is_some() => board.drop_here().await,
          Some(board) if !board.select_mode => board.activate_row().await,
          _ => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Esc => {
        if let Some(board) = self.board_mut() {
          board.cancel_carry();
        }
      }
      KeyCode::Char('v') => {
        if let Some(board) = self.board_mut() {
          board.toggle_select_mode();
        }
      }
      KeyCode::Char('D') => {
        let result = match self.board_mut() {
          Some(board) => board.delete_selected().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Char('e') => {
        if let Some(board) = self.board_mut() {
          board.toggle_editor();
        }
      }
      KeyCode::Char('a') => {
        if let Some(board) = self.board_mut() {
          board.open_form();
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_form_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        if let Some(board) = self.board_mut() {
          board.close_form();
        }
      }
      KeyCode::Enter => {
        let result = match self.board_mut() {
          Some(board) => board.submit_form().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Tab | KeyCode::Down => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.focus_next();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.focus_prev();
        }
      }
      KeyCode::Backspace => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.backspace();
        }
      }
      KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.add_identity();
        }
      }
      KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.remove_last_identity();
        }
      }
      KeyCode::Char(' ') => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          if form.focused().is_checkbox() {
            form.toggle();
          } else {
            form.type_char(' ');
          }
        }
      }
      KeyCode::Char(c) => {
        if let Some(form) = self.board_mut().and_then(|b| b.form.as_mut()) {
          form.type_char(c);
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_editor_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        if let Some(board) = self.board_mut() {
          board.cancel_editor();
        }
      }
      KeyCode::Enter => {
        let result = match self.board_mut() {
          Some(board) => board.save_editor().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Tab => {
        if let Some(editor) = self.board_mut().and_then(|b| b.editor.as_mut())
        {
          editor.focus_next();
        }
      }
      KeyCode::Left => {
        if let Some(editor) = self.board_mut().and_then(|b| b.editor.as_mut())
        {
          editor.cycle_option(-1);
        }
      }
      KeyCode::Right => {
        if let Some(editor) = self.board_mut().and_then(|b| b.editor.as_mut())
        {
          editor.cycle_option(1);
        }
      }
      KeyCode::Backspace => {
        if let Some(editor) = self.board_mut().and_then(|b| b.editor.as_mut())
        {
          editor.backspace();
        }
      }
      KeyCode::Char(c) => {
        if let Some(editor) = self.board_mut().and_then(|b| b.editor.as_mut())
        {
          editor.type_char(c);
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_removal_key(
    &mut self,
    key: KeyEvent,
  ) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        let result = match self.board_mut() {
          Some(board) => board.confirm_removal().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Char('n') | KeyCode::Esc => {
        if let Some(board) = self.board_mut() {
          board.cancel_removal();
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_search_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let now = Instant::now();
    match key.code {
      KeyCode::Esc => {
        if let Some(board) = self.board_mut() {
          board.close_search();
        }
      }
      KeyCode::Enter => {
        let result = match self.board_mut() {
          Some(board) => board.select_suggestion().await,
          None => Ok(()),
        };
        self.recover(result).await?;
      }
      KeyCode::Down => {
        if let Some(board) = self.board_mut() {
          board.search.move_cursor(1);
        }
      }
      KeyCode::Up => {
        if let Some(board) = self.board_mut() {
          board.search.move_cursor(-1);
        }
      }
      KeyCode::Backspace => {
        if let Some(board) = self.board_mut() {
          board.search.pop_char(now);
        }
      }
      KeyCode::Char(c) => {
        if let Some(board) = self.board_mut() {
          board.search.push_char(c, now);
        }
      }
      _ => {}
    }
    Ok(true)
  }
}
