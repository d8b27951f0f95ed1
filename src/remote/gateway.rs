use std::sync::Arc;

use anyhow::{Context, anyhow};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::config::IntegrationOptions;
use crate::domain::{FormSnapshot, IntegrationId};
use crate::error::{FormError, Result};
use crate::ranking::rank_by_distance;
use crate::schema::RemoteProperty;

use super::dto::{CreatedPageDto, DatabaseDto, ListBody, PageDto, ProjectDto, QueryBody};
use super::payload::build_page_payload;
use super::secrets::{Secret, SecretStore};
use super::transport::{ApiRequest, ApiResponse, Transport};

pub const VERSION_HEADER: &str = "Jira-Version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub id: String,
    pub name: String,
}

/// A page of a related database offered as a relation choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTarget {
    pub id: String,
    pub description: String,
}

/// Authenticated access to the workspace API. Every call resolves the credential first
/// and fails with `AuthenticationRequired` before touching the transport when it is
/// missing.
#[derive(Clone)]
pub struct RemoteGateway {
    integration: IntegrationId,
    options: IntegrationOptions,
    transport: Arc<dyn Transport>,
    secrets: Arc<dyn SecretStore>,
}

impl RemoteGateway {
    pub fn new(
        integration: IntegrationId,
        options: IntegrationOptions,
        transport: Arc<dyn Transport>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            integration,
            options,
            transport,
            secrets,
        }
    }

    pub fn integration(&self) -> &IntegrationId {
        &self.integration
    }

    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let secret = self.credential()?;
        let request = ApiRequest::get(self.endpoint("2/project")?);
        let projects: Vec<ProjectDto> = self.fetch_list(request, &secret).await?;
        let projects: Vec<Project> = projects
            .into_iter()
            .filter(|project| !project.name.is_empty())
            .map(|project| Project {
                id: project.id,
                name: project.name,
            })
            .collect();
        tracing::info!(count = projects.len(), "loaded projects");
        Ok(projects)
    }

    pub async fn list_databases(&self) -> Result<Vec<Database>> {
        self.search_databases(None).await
    }

    /// Databases whose title matches the free-text `query`, in response order.
    pub async fn search_databases(&self, query: Option<&str>) -> Result<Vec<Database>> {
        let databases = self.fetch_databases(query).await?;
        Ok(databases
            .into_iter()
            .map(|database| Database {
                name: database.display_title(),
                id: database.id,
            })
            .collect())
    }

    /// Operable properties of `database_id`, or `None` when the id is not among the
    /// databases the credential can see.
    pub async fn fetch_database_schema(
        &self,
        database_id: &str,
    ) -> Result<Option<Vec<(String, RemoteProperty)>>> {
        let databases = self.fetch_databases(None).await?;
        let Some(database) = databases.into_iter().find(|db| db.id == database_id) else {
            tracing::info!(database_id, "database not found");
            return Ok(None);
        };
        let properties = database.operable_properties();
        tracing::info!(database_id, columns = properties.len(), "loaded database schema");
        Ok(Some(properties))
    }

    /// Pages of `database_id` matching `text`, closest titles first. Ties keep the
    /// response order.
    pub async fn search_relation_targets(
        &self,
        text: &str,
        database_id: &str,
    ) -> Result<Vec<RelationTarget>> {
        let secret = self.credential()?;
        let path = format!("v1/databases/{}/query", encode_segment(database_id));
        let body = QueryBody {
            query: Some(text.to_string()).filter(|t| !t.is_empty()),
            filter: None,
        };
        let request = ApiRequest::post(self.endpoint(&path)?, to_json(&body)?);
        let pages: Vec<PageDto> = self.fetch_list(request, &secret).await?;
        let mut targets: Vec<RelationTarget> = pages
            .into_iter()
            .map(|page| RelationTarget {
                description: page.title(),
                id: page.id,
            })
            .filter(|target| !target.description.is_empty())
            .collect();
        rank_by_distance(&mut targets, text, |target| target.description.as_str());
        tracing::info!(database_id, results = targets.len(), "relation search finished");
        Ok(targets)
    }

    /// Creates a page from the snapshot. The payload is built and validated before any
    /// request; a snapshot that cannot be serialised never reaches the network.
    pub async fn submit(&self, snapshot: &FormSnapshot) -> Result<()> {
        let secret = self.credential()?;
        let payload = build_page_payload(snapshot)?;
        let request = ApiRequest::post(self.endpoint("v1/pages")?, payload);
        let response = self.send(request, &secret).await?;
        let created: CreatedPageDto =
            serde_json::from_str(&response.body).context("failed to decode created page")?;
        tracing::info!(page_id = %created.id, "page created");
        Ok(())
    }

    async fn fetch_databases(&self, query: Option<&str>) -> Result<Vec<DatabaseDto>> {
        let secret = self.credential()?;
        let body = QueryBody {
            query: query.map(str::to_string).filter(|q| !q.is_empty()),
            filter: Some(json!({"property": "object", "value": "database"})),
        };
        let request = ApiRequest::post(self.endpoint("v1/search")?, to_json(&body)?);
        let databases: Vec<DatabaseDto> = self.fetch_list(request, &secret).await?;
        tracing::debug!(count = databases.len(), "fetched databases");
        Ok(databases)
    }

    fn credential(&self) -> Result<Secret> {
        self.secrets
            .get(&self.options.secret_label)
            .ok_or_else(|| FormError::AuthenticationRequired(self.integration.clone()))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let url = self
            .options
            .base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path '{path}'"))?;
        Ok(url)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        secret: &Secret,
    ) -> Result<Vec<T>> {
        let url = request.url.clone();
        let response = self.send(request, secret).await?;
        let body: ListBody<T> = serde_json::from_str(&response.body)
            .with_context(|| format!("failed to decode list from {url}"))?;
        Ok(body.into_results())
    }

    async fn send(&self, request: ApiRequest, secret: &Secret) -> Result<ApiResponse> {
        let request = request
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", secret.expose()))
            .header(VERSION_HEADER, self.options.api_version.clone());
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;
        if response.is_auth_failure() {
            tracing::warn!(%url, status = response.status, "credential rejected");
            return Err(FormError::AuthenticationRequired(self.integration.clone()));
        }
        if !response.is_success() {
            let excerpt: String = response.body.chars().take(200).collect();
            return Err(anyhow!("API error {} from {url}: {excerpt}", response.status).into());
        }
        Ok(response)
    }
}

fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

fn to_json(body: &QueryBody) -> Result<Value> {
    let value = serde_json::to_value(body).context("failed to encode request body")?;
    Ok(value)
}
