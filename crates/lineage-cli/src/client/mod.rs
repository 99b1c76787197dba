//! Async HTTP client wrapping the genealogy JSON API.
//!
//! The client owns a cookie store, so the session cookie set by the login
//! endpoint travels with every subsequent request — the equivalent of the
//! browser's `credentials: include`.

pub mod error;

use std::time::Duration;

use lineage_core::{
  board::FamilyCard,
  individual::{Individual, NewIndividual, SearchHit},
  project::{Project, ProjectAction},
  relationship::{NewRelationship, RelationshipPatch},
};
use reqwest::{Client, Response};
use serde::Deserialize;

pub use error::{ApiError, Result};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the genealogy API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub email:    String,
  pub password: String,
}

// ─── Search exclusion ────────────────────────────────────────────────────────

/// Which ids to keep out of a search result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchExclude {
  #[default]
  None,
  /// Sent as `exclude_id=`.
  Id(i64),
  /// Sent as `exclude_ids=` with comma-joined values.
  Ids(Vec<i64>),
}

impl SearchExclude {
  fn push_query(&self, query: &mut Vec<(String, String)>) {
    match self {
      Self::None => {}
      Self::Id(id) => query.push(("exclude_id".into(), id.to_string())),
      Self::Ids(ids) if ids.is_empty() => {}
      Self::Ids(ids) => {
        let joined = ids
          .iter()
          .map(i64::to_string)
          .collect::<Vec<_>>()
          .join(",");
        query.push(("exclude_ids".into(), joined));
      }
    }
  }
}

// ─── Response envelopes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IndividualsEnvelope {
  #[serde(default)]
  individuals: Vec<Individual>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
  #[serde(default)]
  individuals: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct IndividualEnvelope {
  individual: Individual,
}

#[derive(Deserialize)]
struct FamilyCardEnvelope {
  data: FamilyCard,
}

#[derive(Deserialize)]
struct ProjectsEnvelope {
  #[serde(default)]
  projects: Vec<Project>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the genealogy JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and the
/// clones share one cookie store.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .cookie_store(true)
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn web_url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Map a non-2xx response to the error taxonomy; pass 2xx through.
  async fn ok(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::from_response(status.as_u16(), &body))
  }

  fn project_query(project_id: Option<i64>) -> Vec<(String, String)> {
    match project_id {
      Some(id) => vec![("project_id".into(), id.to_string())],
      None => Vec::new(),
    }
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /api/auth/login` — establishes the session cookie.
  pub async fn login(&self) -> Result<()> {
    tracing::debug!(email = %self.config.email, "logging in");
    let resp = self
      .client
      .post(self.url("/auth/login"))
      .json(&serde_json::json!({
        "email": self.config.email,
        "password": self.config.password,
      }))
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  /// `GET /api/projects/`
  pub async fn list_projects(&self) -> Result<Vec<Project>> {
    let resp = self.client.get(self.url("/projects/")).send().await?;
    let envelope: ProjectsEnvelope = Self::ok(resp).await?.json().await?;
    Ok(envelope.projects)
  }

  /// `POST /projects/create` — the create-project form submission.
  pub async fn create_project(&self, name: &str) -> Result<()> {
    let resp = self
      .client
      .post(self.web_url("/projects/create"))
      .form(&[("name", name)])
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  /// `POST /projects/{id}/update` — the modal-prepared form submission.
  pub async fn update_project(&self, project_id: i64, name: &str) -> Result<()> {
    let action = ProjectAction::Update.form_action(project_id);
    let resp = self
      .client
      .post(self.web_url(&action))
      .form(&[("name", name)])
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  /// `POST /projects/{id}/delete` — the modal-prepared form submission.
  pub async fn delete_project(&self, project_id: i64) -> Result<()> {
    let action = ProjectAction::Delete.form_action(project_id);
    let resp = self
      .client
      .post(self.web_url(&action))
      .form(&[("confirm", "1")])
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  // ── Individuals ───────────────────────────────────────────────────────────

  /// `GET /api/individuals/?project_id=`
  pub async fn list_individuals(
    &self,
    project_id: i64,
  ) -> Result<Vec<Individual>> {
    let resp = self
      .client
      .get(self.url("/individuals/"))
      .query(&Self::project_query(Some(project_id)))
      .send()
      .await?;
    let envelope: IndividualsEnvelope = Self::ok(resp).await?.json().await?;
    Ok(envelope.individuals)
  }

  /// `POST /api/individuals/[?project_id=]`
  pub async fn create_individual(
    &self,
    project_id: Option<i64>,
    individual: &NewIndividual,
  ) -> Result<Individual> {
    tracing::debug!(?project_id, "creating individual");
    let resp = self
      .client
      .post(self.url("/individuals/"))
      .query(&Self::project_query(project_id))
      .json(individual)
      .send()
      .await?;
    let envelope: IndividualEnvelope = Self::ok(resp).await?.json().await?;
    Ok(envelope.individual)
  }

  /// `GET /api/individuals/{id}?project_id=` — the relationship set.
  pub async fn family_card(
    &self,
    individual_id: i64,
    project_id: i64,
  ) -> Result<FamilyCard> {
    let resp = self
      .client
      .get(self.url(&format!("/individuals/{individual_id}")))
      .query(&Self::project_query(Some(project_id)))
      .send()
      .await?;
    let envelope: FamilyCardEnvelope = Self::ok(resp).await?.json().await?;
    Ok(envelope.data)
  }

  /// `DELETE /api/individuals/{id}?project_id=`
  pub async fn delete_individual(
    &self,
    individual_id: i64,
    project_id: i64,
  ) -> Result<()> {
    tracing::debug!(individual_id, "deleting individual");
    let resp = self
      .client
      .delete(self.url(&format!("/individuals/{individual_id}")))
      .query(&Self::project_query(Some(project_id)))
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  /// `GET /api/individuals/search?q=&project_id=&exclude_id=|exclude_ids=`
  pub async fn search_individuals(
    &self,
    query: &str,
    project_id: i64,
    exclude: &SearchExclude,
  ) -> Result<Vec<SearchHit>> {
    let mut params = vec![("q".to_string(), query.to_string())];
    params.extend(Self::project_query(Some(project_id)));
    exclude.push_query(&mut params);

    let resp = self
      .client
      .get(self.url("/individuals/search"))
      .query(&params)
      .send()
      .await?;
    let envelope: SearchEnvelope = Self::ok(resp).await?.json().await?;
    Ok(envelope.individuals)
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  /// `POST /api/relationships/?project_id=`
  pub async fn create_relationship(
    &self,
    project_id: i64,
    link: &NewRelationship,
  ) -> Result<()> {
    tracing::debug!(
      individual_id = link.individual_id,
      related_id = link.related_id,
      "creating relationship"
    );
    let resp = self
      .client
      .post(self.url("/relationships/"))
      .query(&Self::project_query(Some(project_id)))
      .json(link)
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  /// `PATCH /api/relationships/{id}?project_id=`
  pub async fn update_relationship(
    &self,
    relationship_id: i64,
    project_id: i64,
    patch: &RelationshipPatch,
  ) -> Result<()> {
    tracing::debug!(relationship_id, "updating relationship");
    let resp = self
      .client
      .patch(self.url(&format!("/relationships/{relationship_id}")))
      .query(&Self::project_query(Some(project_id)))
      .json(patch)
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }

  /// `DELETE /api/relationships/{id}?project_id=`
  pub async fn delete_relationship(
    &self,
    relationship_id: i64,
    project_id: i64,
  ) -> Result<()> {
    tracing::debug!(relationship_id, "deleting relationship");
    let resp = self
      .client
      .delete(self.url(&format!("/relationships/{relationship_id}")))
      .query(&Self::project_query(Some(project_id)))
      .send()
      .await?;
    Self::ok(resp).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exclude_variants_build_the_right_query_pairs() {
    let mut q = Vec::new();
    SearchExclude::None.push_query(&mut q);
    assert!(q.is_empty());

    SearchExclude::Id(5).push_query(&mut q);
    assert_eq!(q, vec![("exclude_id".to_string(), "5".to_string())]);

    q.clear();
    SearchExclude::Ids(vec![1, 2, 3]).push_query(&mut q);
    assert_eq!(q, vec![("exclude_ids".to_string(), "1,2,3".to_string())]);

    q.clear();
    SearchExclude::Ids(Vec::new()).push_query(&mut q);
    assert!(q.is_empty());
  }
}
