#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

use jiraform::config::{DEFAULT_SECRET_LABEL, IntegrationOptions};
use jiraform::form::integration_id;
use jiraform::remote::{ApiRequest, ApiResponse, MemorySecretStore, RemoteGateway, Transport};

/// Transport double answering by path suffix and recording every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<(String, ApiResponse)>>,
    hanging: Mutex<Vec<String>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn respond(&self, path_suffix: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .push((path_suffix.to_string(), ApiResponse::new(status, body.to_string())));
        self
    }

    /// Requests whose path ends with `path_suffix` never get an answer.
    pub fn hang(&self, path_suffix: &str) -> &Self {
        self.hanging.lock().unwrap().push(path_suffix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let path = request.url.path().to_string();
        self.calls.lock().unwrap().push(request);
        let hangs = self
            .hanging
            .lock()
            .unwrap()
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()));
        if hangs {
            std::future::pending::<()>().await;
        }
        let response = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| ApiResponse::new(404, "{}"));
        Ok(response)
    }
}

/// Transport double that always fails as if the connection dropped.
pub struct OfflineTransport;

#[async_trait]
impl Transport for OfflineTransport {
    async fn execute(&self, _request: ApiRequest) -> Result<ApiResponse> {
        anyhow::bail!("connection refused")
    }
}

pub fn test_options() -> IntegrationOptions {
    IntegrationOptions::default().with_search_debounce(Duration::ZERO)
}

pub fn with_token() -> Arc<MemorySecretStore> {
    Arc::new(MemorySecretStore::default().with_secret(DEFAULT_SECRET_LABEL, "secret-token"))
}

pub fn without_token() -> Arc<MemorySecretStore> {
    Arc::new(MemorySecretStore::default())
}

pub fn gateway(transport: Arc<RecordingTransport>, secrets: Arc<MemorySecretStore>) -> RemoteGateway {
    RemoteGateway::new(integration_id(), test_options(), transport, secrets)
}

pub fn databases_body() -> Value {
    json!({
        "results": [
            {
                "id": "db-1",
                "title": [{"plain_text": "Tasks"}],
                "properties": {
                    "Parent": {"id": "r", "type": "relation", "relation": {"database_id": "D1"}},
                    "Status": {"id": "s", "type": "select", "select": {"options": [
                        {"id": "o-b", "name": "b"},
                        {"id": "o-a", "name": "a"}
                    ]}},
                    "Name": {"id": "title", "type": "title", "title": {}},
                    "Rollup": {"id": "x", "type": "rollup", "rollup": {}}
                }
            },
            {
                "id": "db-2",
                "title": [{"plain_text": "Bugs"}],
                "properties": {}
            }
        ]
    })
}

pub fn pages_body(titles: &[&str]) -> Value {
    let results: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            json!({
                "id": format!("page-{idx}"),
                "properties": {
                    "Name": {"type": "title", "title": [{"plain_text": title}]}
                }
            })
        })
        .collect();
    json!({ "results": results })
}
