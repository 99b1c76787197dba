//! Debounced search-as-you-type over the individuals search endpoint.
//!
//! Each edit re-arms a deadline; [`Typeahead::poll`] yields at most one due
//! request per edit burst. Requests are stamped with a generation token and
//! responses for anything but the newest generation are discarded, so a
//! slow early response can never overwrite a newer result set.

use std::time::{Duration, Instant};

use lineage_core::individual::SearchHit;

pub const MIN_QUERY_LEN: usize = 2;
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Selection capability — what happens when a suggestion is chosen.
/// Implemented by the owning screen; mockable in tests.
pub trait SuggestionSink {
  fn suggestion_selected(&mut self, individual: &SearchHit);
}

/// A due search request, stamped with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub query:      String,
  pub generation: u64,
}

/// Controller state for one search box and its suggestion list.
#[derive(Debug)]
pub struct Typeahead {
  pub query:       String,
  pub suggestions: Vec<SearchHit>,
  /// A completed search returned zero rows; render one inert
  /// "no results" row.
  pub no_results:  bool,
  pub cursor:      usize,
  min_len:         usize,
  delay:           Duration,
  deadline:        Option<Instant>,
  generation:      u64,
}

impl Typeahead {
  pub fn new(min_len: usize, delay: Duration) -> Self {
    Self {
      query: String::new(),
      suggestions: Vec::new(),
      no_results: false,
      cursor: 0,
      min_len,
      delay,
      deadline: None,
      generation: 0,
    }
  }

  // ── Input ─────────────────────────────────────────────────────────────────

  pub fn push_char(&mut self, c: char, now: Instant) {
    self.query.push(c);
    self.edited(now);
  }

  pub fn pop_char(&mut self, now: Instant) {
    self.query.pop();
    self.edited(now);
  }

  /// Re-arm the debounce deadline after an edit. Queries under the minimum
  /// length clear the suggestions and issue nothing.
  fn edited(&mut self, now: Instant) {
    // Any pending response for the old query is stale from here on.
    self.generation += 1;
    if self.query.trim().len() < self.min_len {
      self.deadline = None;
      self.suggestions.clear();
      self.no_results = false;
      self.cursor = 0;
    } else {
      self.deadline = Some(now + self.delay);
    }
  }

  // ── Request/response cycle ────────────────────────────────────────────────

  /// Yield the due request, if the debounce window has elapsed.
  pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
    let deadline = self.deadline?;
    if now < deadline {
      return None;
    }
    self.deadline = None;
    Some(SearchRequest {
      query:      self.query.trim().to_string(),
      generation: self.generation,
    })
  }

  /// Apply a response. Stale generations are dropped on the floor.
  pub fn apply(&mut self, generation: u64, results: Vec<SearchHit>) {
    if generation != self.generation {
      tracing::debug!(generation, current = self.generation, "stale search response discarded");
      return;
    }
    self.no_results = results.is_empty();
    self.suggestions = results;
    self.cursor = 0;
  }

  // ── Suggestion list ───────────────────────────────────────────────────────

  pub fn is_open(&self) -> bool {
    !self.suggestions.is_empty() || self.no_results
  }

  pub fn move_cursor(&mut self, delta: isize) {
    if self.suggestions.is_empty() {
      return;
    }
    let last = self.suggestions.len() - 1;
    self.cursor = match delta {
      d if d < 0 => self.cursor.saturating_sub(d.unsigned_abs()),
      d => (self.cursor + d as usize).min(last),
    };
  }

  /// Choose the suggestion under the cursor: hand it to the sink and clear
  /// the list. A "no results" row is inert.
  pub fn select(&mut self, sink: &mut dyn SuggestionSink) {
    let Some(hit) = self.suggestions.get(self.cursor) else {
      return;
    };
    let hit = hit.clone();
    self.clear();
    sink.suggestion_selected(&hit);
  }

  /// Clear the suggestion list (Esc, or focus moving elsewhere — the
  /// outside-click rule).
  pub fn clear(&mut self) {
    self.suggestions.clear();
    self.no_results = false;
    self.deadline = None;
    self.cursor = 0;
    self.generation += 1;
  }

  /// Clear everything including the query text.
  pub fn reset(&mut self) {
    self.clear();
    self.query.clear();
  }
}

impl Default for Typeahead {
  fn default() -> Self {
    Self::new(MIN_QUERY_LEN, DEBOUNCE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hit(id: i64, name: &str) -> SearchHit {
    serde_json::from_value(serde_json::json!({ "id": id, "name": name }))
      .unwrap()
  }

  fn type_str(t: &mut Typeahead, s: &str, now: Instant) {
    for c in s.chars() {
      t.push_char(c, now);
    }
  }

  #[derive(Default)]
  struct Recorder(Vec<i64>);

  impl SuggestionSink for Recorder {
    fn suggestion_selected(&mut self, individual: &SearchHit) {
      self.0.push(individual.id);
    }
  }

  #[test]
  fn short_queries_issue_no_request() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    t.push_char('a', now);
    assert_eq!(t.poll(now + DEBOUNCE), None);
    assert!(t.suggestions.is_empty());
  }

  #[test]
  fn one_request_per_edit_burst() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    type_str(&mut t, "ada", now);

    // Not due before the window elapses.
    assert_eq!(t.poll(now + DEBOUNCE / 2), None);

    let req = t.poll(now + DEBOUNCE).expect("due request");
    assert_eq!(req.query, "ada");

    // Drained: no second request without another edit.
    assert_eq!(t.poll(now + DEBOUNCE * 2), None);
  }

  #[test]
  fn shrinking_below_minimum_clears_suggestions() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    type_str(&mut t, "ad", now);
    let req = t.poll(now + DEBOUNCE).unwrap();
    t.apply(req.generation, vec![hit(1, "Ada")]);
    assert!(t.is_open());

    t.pop_char(now);
    assert!(!t.is_open());
    assert_eq!(t.poll(now + DEBOUNCE), None);
  }

  #[test]
  fn stale_generation_is_discarded() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    type_str(&mut t, "ad", now);
    let early = t.poll(now + DEBOUNCE).unwrap();

    // A later edit supersedes the in-flight request.
    t.push_char('a', now + DEBOUNCE);
    let late = t.poll(now + DEBOUNCE * 2).unwrap();
    t.apply(late.generation, vec![hit(2, "Ada Lovelace")]);

    // The slow early response arrives afterwards and must not overwrite.
    t.apply(early.generation, vec![hit(9, "Adam")]);
    assert_eq!(t.suggestions.len(), 1);
    assert_eq!(t.suggestions[0].id, 2);
  }

  #[test]
  fn zero_results_renders_inert_row() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    type_str(&mut t, "zz", now);
    let req = t.poll(now + DEBOUNCE).unwrap();
    t.apply(req.generation, Vec::new());
    assert!(t.no_results);
    assert!(t.is_open());

    // Selecting the "no results" row does nothing.
    let mut sink = Recorder::default();
    t.select(&mut sink);
    assert!(sink.0.is_empty());
  }

  #[test]
  fn selection_invokes_sink_and_clears_list() {
    let now = Instant::now();
    let mut t = Typeahead::default();
    type_str(&mut t, "ad", now);
    let req = t.poll(now + DEBOUNCE).unwrap();
    t.apply(req.generation, vec![hit(1, "Ada"), hit(2, "Adam")]);
    t.move_cursor(1);

    let mut sink = Recorder::default();
    t.select(&mut sink);
    assert_eq!(sink.0, vec![2]);
    assert!(!t.is_open());
  }
}
