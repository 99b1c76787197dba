//! The relationship board: roster on the left, the viewed individual's
//! parents/partners/children/siblings on the right.
//!
//! Drag-and-drop becomes grab-and-place: a row is picked up (its payload
//! encoded for the transfer), focus moves to a target list, and the drop is
//! decoded once there. After every successful mutation both the roster and
//! the family card are re-fetched wholesale — the board never keeps a
//! relationship graph of its own.

use std::{collections::HashSet, sync::Arc, time::Instant};

use lineage_core::{
  board::{DragPayload, FamilyCard},
  individual::{Individual, SearchHit},
  relationship::{
    NewRelationship, RelKind, RelationshipPatch, Relative, detail_choices,
  },
};

use crate::{
  client::{ApiClient, ApiError, Result, SearchExclude},
  form::AddIndividualForm,
  typeahead::{SuggestionSink, Typeahead},
};

// ─── Context and panes ───────────────────────────────────────────────────────

/// Page context resolved once at construction, the way the original pages
/// carried project/individual ids on the page-root element.
#[derive(Debug, Clone, Copy)]
pub struct BoardContext {
  pub project_id:    i64,
  pub individual_id: Option<i64>,
}

/// The four relationship lists on the right side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyList {
  Parents,
  Partners,
  Children,
  Siblings,
}

impl FamilyList {
  pub const ALL: [Self; 4] =
    [Self::Parents, Self::Partners, Self::Children, Self::Siblings];

  /// The relationship kind a drop on this list stands for. Siblings are
  /// read-only — computed transitively server-side, never a drop target.
  pub fn drop_target(self) -> Option<RelKind> {
    match self {
      Self::Parents => Some(RelKind::Parent),
      Self::Partners => Some(RelKind::Partner),
      Self::Children => Some(RelKind::Child),
      Self::Siblings => None,
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Self::Parents => "Parents",
      Self::Partners => "Partners",
      Self::Children => "Children",
      Self::Siblings => "Siblings",
    }
  }
}

/// Which list currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPane {
  Roster,
  Family(FamilyList),
}

impl BoardPane {
  const CYCLE: [Self; 5] = [
    Self::Roster,
    Self::Family(FamilyList::Parents),
    Self::Family(FamilyList::Partners),
    Self::Family(FamilyList::Children),
    Self::Family(FamilyList::Siblings),
  ];

  pub fn next(self) -> Self {
    let i = Self::CYCLE.iter().position(|p| *p == self).unwrap_or(0);
    Self::CYCLE[(i + 1) % Self::CYCLE.len()]
  }
}

// ─── Detail editor ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
  Detail,
  UnionDate,
  DissolutionDate,
  Notes,
}

/// Inline editor for one relationship row. At most one is open; opening a
/// second replaces it, and re-opening the same row closes it.
#[derive(Debug)]
pub struct DetailEditor {
  pub relationship_id:  i64,
  pub kind:             RelKind,
  pub options:          Vec<String>,
  pub selected:         usize,
  pub union_date:       String,
  pub dissolution_date: String,
  pub notes:            String,
  pub focus:            EditorField,
}

impl DetailEditor {
  pub fn open(rel: &Relative, kind: RelKind) -> Option<Self> {
    let relationship_id = rel.relationship_id?;
    let current = rel.relationship_detail.as_deref().unwrap_or_default();
    let (options, selected) = detail_choices(kind, current);
    Some(Self {
      relationship_id,
      kind,
      options,
      selected,
      union_date: rel.union_date.clone().unwrap_or_default(),
      dissolution_date: rel.dissolution_date.clone().unwrap_or_default(),
      notes: rel.notes.clone().unwrap_or_default(),
      focus: EditorField::Detail,
    })
  }

  /// Tab order: dates only exist on partner rows.
  pub fn fields(&self) -> Vec<EditorField> {
    if self.kind == RelKind::Partner {
      vec![
        EditorField::Detail,
        EditorField::UnionDate,
        EditorField::DissolutionDate,
        EditorField::Notes,
      ]
    } else {
      vec![EditorField::Detail, EditorField::Notes]
    }
  }

  pub fn focus_next(&mut self) {
    let fields = self.fields();
    let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(i + 1) % fields.len()];
  }

  pub fn cycle_option(&mut self, delta: isize) {
    if self.focus != EditorField::Detail || self.options.is_empty() {
      return;
    }
    let len = self.options.len() as isize;
    self.selected = ((self.selected as isize + delta).rem_euclid(len)) as usize;
  }

  pub fn type_char(&mut self, c: char) {
    match self.focus {
      EditorField::UnionDate => self.union_date.push(c),
      EditorField::DissolutionDate => self.dissolution_date.push(c),
      EditorField::Notes => self.notes.push(c),
      EditorField::Detail => {}
    }
  }

  pub fn backspace(&mut self) {
    match self.focus {
      EditorField::UnionDate => self.union_date.pop(),
      EditorField::DissolutionDate => self.dissolution_date.pop(),
      EditorField::Notes => self.notes.pop(),
      EditorField::Detail => None,
    };
  }

  /// The PATCH body: only the fields this row type supports. Blank partner
  /// dates are sent as explicit nulls so a cleared date actually clears.
  pub fn patch(&self) -> RelationshipPatch {
    let mut patch = RelationshipPatch {
      relationship_detail: self.options.get(self.selected).cloned(),
      notes: Some(self.notes.clone()),
      ..Default::default()
    };
    if self.kind == RelKind::Partner {
      patch.union_date = Some(blank_to_null(&self.union_date));
      patch.dissolution_date = Some(blank_to_null(&self.dissolution_date));
    }
    patch
  }
}

fn blank_to_null(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ─── Suggestion sink ─────────────────────────────────────────────────────────

/// Records the chosen suggestion so the board can navigate to it after the
/// typeahead borrow ends.
#[derive(Default)]
struct NavigateTo {
  target: Option<i64>,
}

impl SuggestionSink for NavigateTo {
  fn suggestion_selected(&mut self, individual: &SearchHit) {
    self.target = Some(individual.id);
  }
}

/// Everyone already on the board is kept out of the suggestions: the
/// viewed individual plus every linked relative. Before the first card
/// fetch only the viewed id is known.
fn search_exclusion(
  individual_id: Option<i64>,
  hidden: &HashSet<i64>,
) -> SearchExclude {
  let Some(id) = individual_id else {
    return SearchExclude::None;
  };
  if hidden.is_empty() {
    return SearchExclude::Id(id);
  }
  let mut ids: Vec<i64> = hidden.iter().copied().collect();
  ids.sort_unstable();
  SearchExclude::Ids(ids)
}

// ─── Board ───────────────────────────────────────────────────────────────────

pub struct Board {
  client: Arc<ApiClient>,
  pub ctx: BoardContext,

  /// Full roster for the project; related individuals are hidden from it.
  pub roster: Vec<Individual>,
  pub hidden: HashSet<i64>,
  pub card:   Option<FamilyCard>,

  pub pane:   BoardPane,
  pub cursor: usize,

  /// Encoded drag payload while a row is picked up.
  pub carried: Option<String>,

  pub select_mode: bool,
  pub checked:     HashSet<i64>,

  pub search:        Typeahead,
  pub search_active: bool,

  pub editor:          Option<DetailEditor>,
  /// Relationship awaiting removal confirmation.
  pub pending_removal: Option<i64>,
  pub form:            Option<AddIndividualForm>,

  pub status: String,
}

impl Board {
  pub fn new(client: Arc<ApiClient>, ctx: BoardContext) -> Self {
    Self {
      client,
      ctx,
      roster: Vec::new(),
      hidden: HashSet::new(),
      card: None,
      pane: BoardPane::Roster,
      cursor: 0,
      carried: None,
      select_mode: false,
      checked: HashSet::new(),
      search: Typeahead::default(),
      search_active: false,
      editor: None,
      pending_removal: None,
      form: None,
      status: String::new(),
    }
  }

  /// Unauthorized bubbles up (back to login); everything else becomes a
  /// status message and leaves the board state untouched.
  fn report(&mut self, err: ApiError) -> Result<()> {
    if matches!(err, ApiError::Unauthorized) {
      return Err(err);
    }
    tracing::warn!(error = %err, "board action failed");
    self.status = err.to_string();
    Ok(())
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Re-fetch the roster and, when an individual is selected, its family
  /// card; recompute which roster rows are hidden.
  pub async fn refresh(&mut self) -> Result<()> {
    let roster = match self.client.list_individuals(self.ctx.project_id).await
    {
      Ok(list) => list,
      Err(e) => return self.report(e),
    };
    self.roster = roster;

    if let Some(individual_id) = self.ctx.individual_id {
      match self
        .client
        .family_card(individual_id, self.ctx.project_id)
        .await
      {
        Ok(card) => {
          self.hidden = card.hidden_ids();
          self.card = Some(card);
        }
        Err(e) => return self.report(e),
      }
    } else {
      self.card = None;
      self.hidden.clear();
    }

    self.clamp_cursor();
    Ok(())
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  /// Roster rows minus everyone already related to the viewed individual.
  pub fn visible_roster(&self) -> Vec<&Individual> {
    self.roster.iter().filter(|i| !self.hidden.contains(&i.id)).collect()
  }

  pub fn family_rows(&self, list: FamilyList) -> &[Relative] {
    let Some(card) = &self.card else { return &[] };
    match list {
      FamilyList::Parents => &card.parents,
      FamilyList::Partners => &card.partners,
      FamilyList::Children => &card.children,
      FamilyList::Siblings => &card.siblings,
    }
  }

  fn focused_len(&self) -> usize {
    match self.pane {
      BoardPane::Roster => self.visible_roster().len(),
      BoardPane::Family(list) => self.family_rows(list).len(),
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.focused_len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  pub fn focus_next_pane(&mut self) {
    self.pane = self.pane.next();
    self.cursor = 0;
    // Focus moving elsewhere clears the suggestion list.
    self.search_active = false;
    self.search.clear();
  }

  pub fn move_cursor(&mut self, delta: isize) {
    let len = self.focused_len();
    if len == 0 {
      return;
    }
    self.cursor = match delta {
      d if d < 0 => self.cursor.saturating_sub(d.unsigned_abs()),
      d => (self.cursor + d as usize).min(len - 1),
    };
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// "Go to this individual" — the full-page-navigation analog: re-key the
  /// board and reload everything.
  pub async fn navigate(&mut self, individual_id: i64) -> Result<()> {
    self.ctx.individual_id = Some(individual_id);
    self.carried = None;
    self.editor = None;
    self.pending_removal = None;
    self.pane = BoardPane::Roster;
    self.cursor = 0;
    self.refresh().await
  }

  /// Enter on a row outside select mode.
  pub async fn activate_row(&mut self) -> Result<()> {
    let target = match self.pane {
      BoardPane::Roster => {
        self.visible_roster().get(self.cursor).map(|i| i.id)
      }
      BoardPane::Family(list) => {
        self.family_rows(list).get(self.cursor).map(|r| r.id)
      }
    };
    match target {
      Some(id) => self.navigate(id).await,
      None => Ok(()),
    }
  }

  // ── Grab and place ────────────────────────────────────────────────────────

  /// Pick up the row under the cursor, encoding its transfer payload.
  pub fn grab(&mut self) {
    let payload = match self.pane {
      BoardPane::Roster => self
        .visible_roster()
        .get(self.cursor)
        .map(|i| DragPayload::individual(i.id)),
      BoardPane::Family(FamilyList::Siblings) => {
        self.status = "Siblings are read-only.".into();
        return;
      }
      BoardPane::Family(list) => {
        self.family_rows(list).get(self.cursor).and_then(|rel| {
          rel
            .relationship_id
            .map(|rid| DragPayload::relationship(rel.id, rid))
        })
      }
    };
    match payload {
      Some(p) => {
        self.carried = Some(p.encode());
        self.status = "Carrying — move to a list and drop, Esc cancels.".into();
      }
      None => self.status = "Nothing to pick up here.".into(),
    }
  }

  pub fn cancel_carry(&mut self) {
    self.carried = None;
    self.status.clear();
  }

  /// Drop the carried payload on the focused list. Decoded exactly once,
  /// here.
  pub async fn drop_here(&mut self) -> Result<()> {
    let Some(raw) = self.carried.take() else {
      return Ok(());
    };
    let payload = match DragPayload::decode(&raw) {
      Ok(p) => p,
      Err(e) => {
        self.status = e.to_string();
        return Ok(());
      }
    };

    match self.pane {
      BoardPane::Family(list) => {
        let Some(target) = list.drop_target() else {
          self.status = "Siblings cannot be assigned directly.".into();
          return Ok(());
        };
        match payload.relationship_id {
          // An existing relationship row: re-categorize it.
          Some(relationship_id) => {
            self.recategorize(relationship_id, target).await
          }
          // A roster row: create a new relationship.
          None => self.create_link(payload.id, target).await,
        }
      }
      // Dropping a relationship row back on the roster removes it, after
      // confirmation. Dropping an individual there is a no-op.
      BoardPane::Roster => {
        if let Some(relationship_id) = payload.relationship_id {
          self.pending_removal = Some(relationship_id);
          self.status = "Remove this relationship? y/n".into();
        }
        Ok(())
      }
    }
  }

  async fn create_link(&mut self, dragged: i64, target: RelKind) -> Result<()> {
    let Some(viewed) = self.ctx.individual_id else {
      self.status = "Select an individual first.".into();
      return Ok(());
    };
    let link = NewRelationship::link(viewed, dragged, target);
    match self.client.create_relationship(self.ctx.project_id, &link).await {
      Ok(()) => {
        self.status = "Relationship created successfully!".into();
        self.refresh().await
      }
      Err(e) => self.report(e),
    }
  }

  async fn recategorize(
    &mut self,
    relationship_id: i64,
    target: RelKind,
  ) -> Result<()> {
    let patch = RelationshipPatch::recategorize(target);
    match self
      .client
      .update_relationship(relationship_id, self.ctx.project_id, &patch)
      .await
    {
      Ok(()) => {
        self.status = "Relationship updated successfully!".into();
        self.refresh().await
      }
      Err(e) => self.report(e),
    }
  }

  pub async fn confirm_removal(&mut self) -> Result<()> {
    let Some(relationship_id) = self.pending_removal.take() else {
      return Ok(());
    };
    match self
      .client
      .delete_relationship(relationship_id, self.ctx.project_id)
      .await
    {
      Ok(()) => {
        self.status = "Relationship deleted successfully.".into();
        self.refresh().await
      }
      Err(e) => self.report(e),
    }
  }

  pub fn cancel_removal(&mut self) {
    self.pending_removal = None;
    self.status.clear();
  }

  // ── Detail editor ─────────────────────────────────────────────────────────

  /// Toggle the inline editor for the relationship row under the cursor.
  pub fn toggle_editor(&mut self) {
    let BoardPane::Family(list) = self.pane else { return };
    let Some(kind) = list.drop_target() else {
      self.status = "Siblings have no editable details.".into();
      return;
    };
    let Some(rel) = self.family_rows(list).get(self.cursor) else {
      return;
    };

    // Toggle semantics: re-opening the same row closes it; opening another
    // replaces the current editor.
    if let Some(editor) = &self.editor {
      if Some(editor.relationship_id) == rel.relationship_id {
        self.editor = None;
        return;
      }
    }
    self.editor = DetailEditor::open(rel, kind);
  }

  pub async fn save_editor(&mut self) -> Result<()> {
    let Some(editor) = self.editor.take() else {
      return Ok(());
    };
    let patch = editor.patch();
    match self
      .client
      .update_relationship(editor.relationship_id, self.ctx.project_id, &patch)
      .await
    {
      Ok(()) => {
        self.status = "Relationship updated successfully!".into();
        self.refresh().await
      }
      Err(e) => {
        // Failure leaves the editor open with its edits intact.
        self.editor = Some(editor);
        self.report(e)
      }
    }
  }

  pub fn cancel_editor(&mut self) {
    self.editor = None;
  }

  // ── Select mode and bulk deletion ─────────────────────────────────────────

  pub fn toggle_select_mode(&mut self) {
    self.select_mode = !self.select_mode;
    self.checked.clear();
  }

  pub fn toggle_checked(&mut self) {
    if !self.select_mode || self.pane != BoardPane::Roster {
      return;
    }
    let Some(id) = self.visible_roster().get(self.cursor).map(|i| i.id) else {
      return;
    };
    if !self.checked.remove(&id) {
      self.checked.insert(id);
    }
  }

  /// One DELETE per checked id, sequentially; failures are logged and do
  /// not stop the loop. Re-fetches afterwards.
  pub async fn delete_selected(&mut self) -> Result<()> {
    if self.checked.is_empty() {
      return Ok(());
    }
    let mut ids: Vec<i64> = self.checked.drain().collect();
    ids.sort_unstable();

    for id in ids {
      match self.client.delete_individual(id, self.ctx.project_id).await {
        Ok(()) => {}
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
        Err(e) => {
          tracing::warn!(individual_id = id, error = %e, "failed to delete individual");
        }
      }
    }
    self.select_mode = false;
    self.status = "Selected individuals deleted.".into();
    self.refresh().await
  }

  // ── Search ────────────────────────────────────────────────────────────────

  pub fn open_search(&mut self) {
    self.search_active = true;
    self.search.reset();
  }

  pub fn close_search(&mut self) {
    self.search_active = false;
    self.search.clear();
  }

  /// Drive the debounce from the event-loop tick; issue the due request
  /// and apply the response under its generation token.
  pub async fn tick(&mut self, now: Instant) -> Result<()> {
    let Some(request) = self.search.poll(now) else {
      return Ok(());
    };
    let exclude = search_exclusion(self.ctx.individual_id, &self.hidden);
    match self
      .client
      .search_individuals(&request.query, self.ctx.project_id, &exclude)
      .await
    {
      Ok(hits) => self.search.apply(request.generation, hits),
      Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
      Err(e) => {
        tracing::warn!(error = %e, "suggestion fetch failed");
      }
    }
    Ok(())
  }

  /// Enter on a suggestion row: navigate to the chosen individual.
  pub async fn select_suggestion(&mut self) -> Result<()> {
    let mut nav = NavigateTo::default();
    self.search.select(&mut nav);
    if let Some(id) = nav.target {
      self.search_active = false;
      self.navigate(id).await?;
    }
    Ok(())
  }

  // ── Add-individual form ───────────────────────────────────────────────────

  pub fn open_form(&mut self) {
    self.form = Some(AddIndividualForm::default());
  }

  pub fn close_form(&mut self) {
    self.form = None;
  }

  /// Validate and submit the form. Validation failures never reach the
  /// network; success resets the form and reloads the roster.
  pub async fn submit_form(&mut self) -> Result<()> {
    let Some(form) = &mut self.form else { return Ok(()) };

    if let Err(e) = form.draft.validate() {
      form.message = Some(e.to_string());
      return Ok(());
    }
    let payload = form.draft.payload();

    match self
      .client
      .create_individual(Some(self.ctx.project_id), &payload)
      .await
    {
      Ok(created) => {
        self.status =
          format!("Individual {} added successfully!", created.display_name());
        // The form stays open, cleared for another entry.
        if let Some(form) = &mut self.form {
          form.reset();
        }
        self.refresh().await
      }
      Err(e) => {
        // The form stays open with its fields intact.
        if let ApiError::Unauthorized = e {
          return Err(e);
        }
        if let Some(form) = &mut self.form {
          form.message = Some(e.to_string());
        }
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn relative(
    id: i64,
    relationship_id: Option<i64>,
    detail: Option<&str>,
  ) -> Relative {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "relationship_id": relationship_id,
      "relationship_detail": detail,
      "union_date": "1835-07-08",
      "notes": "",
    }))
    .unwrap()
  }

  #[test]
  fn sibling_list_is_never_a_drop_target() {
    assert_eq!(FamilyList::Siblings.drop_target(), None);
    assert_eq!(FamilyList::Children.drop_target(), Some(RelKind::Child));
  }

  #[test]
  fn pane_cycle_visits_all_lists() {
    let mut pane = BoardPane::Roster;
    let mut seen = vec![pane];
    for _ in 0..4 {
      pane = pane.next();
      seen.push(pane);
    }
    assert_eq!(pane.next(), BoardPane::Roster);
    assert_eq!(seen.len(), 5);
  }

  #[test]
  fn editor_opens_only_with_a_relationship_id() {
    let sibling = relative(5, None, None);
    assert!(DetailEditor::open(&sibling, RelKind::Parent).is_none());

    let parent = relative(2, Some(10), Some("adoptive"));
    let editor = DetailEditor::open(&parent, RelKind::Parent).unwrap();
    assert_eq!(editor.options[editor.selected], "adoptive");
  }

  #[test]
  fn vertical_patch_omits_partner_dates() {
    let rel = relative(2, Some(10), Some("step"));
    let editor = DetailEditor::open(&rel, RelKind::Parent).unwrap();
    let json = serde_json::to_value(editor.patch()).unwrap();
    let obj = json.as_object().unwrap();
    assert!(obj.contains_key("relationship_detail"));
    assert!(obj.contains_key("notes"));
    assert!(!obj.contains_key("union_date"));
    assert!(!obj.contains_key("dissolution_date"));
  }

  #[test]
  fn partner_patch_sends_blank_dates_as_null() {
    let rel = relative(3, Some(11), Some("marriage"));
    let mut editor = DetailEditor::open(&rel, RelKind::Partner).unwrap();
    editor.dissolution_date.clear();
    let json = serde_json::to_value(editor.patch()).unwrap();
    assert_eq!(
      json.get("union_date").unwrap().as_str(),
      Some("1835-07-08")
    );
    assert!(json.get("dissolution_date").unwrap().is_null());
  }

  #[test]
  fn suggestion_exclusions_cover_everyone_on_the_board() {
    assert_eq!(search_exclusion(None, &HashSet::new()), SearchExclude::None);
    assert_eq!(
      search_exclusion(Some(7), &HashSet::new()),
      SearchExclude::Id(7)
    );

    let card = FamilyCard {
      id: 1,
      parents: vec![relative(2, Some(10), None)],
      partners: vec![relative(3, Some(11), Some("marriage"))],
      children: vec![relative(4, Some(12), None)],
      siblings: vec![relative(5, None, None)],
    };
    // Siblings stay searchable, like everyone not linked directly.
    assert_eq!(
      search_exclusion(Some(1), &card.hidden_ids()),
      SearchExclude::Ids(vec![1, 2, 3, 4])
    );
  }

  #[test]
  fn editor_tab_order_depends_on_orientation() {
    let rel = relative(3, Some(11), None);
    let partner = DetailEditor::open(&rel, RelKind::Partner).unwrap();
    assert_eq!(partner.fields().len(), 4);
    let parent = DetailEditor::open(&rel, RelKind::Parent).unwrap();
    assert_eq!(parent.fields(), vec![EditorField::Detail, EditorField::Notes]);
  }
}
