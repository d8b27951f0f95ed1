use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::RemoteProperty;

/// List bodies arrive either wrapped as `{results: [...]}` or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Envelope { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub fn into_results(self) -> Vec<T> {
        match self {
            ListBody::Envelope { results } => results,
            ListBody::Bare(results) => results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectDto {
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "projectTypeKey")]
    pub project_type_key: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextDto {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

pub fn plain_text(fragments: &[RichTextDto]) -> String {
    fragments.iter().map(|f| f.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseDto {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichTextDto>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl DatabaseDto {
    pub fn display_title(&self) -> String {
        plain_text(&self.title)
    }

    /// Decodes the schema, dropping properties whose type the builder cannot map and
    /// any entry that does not look like a property at all.
    pub fn operable_properties(&self) -> Vec<(String, RemoteProperty)> {
        self.properties
            .iter()
            .filter_map(|(name, raw)| {
                let property: RemoteProperty = match serde_json::from_value(raw.clone()) {
                    Ok(property) => property,
                    Err(err) => {
                        tracing::debug!(property = %name, error = %err, "skipping undecodable property");
                        return None;
                    }
                };
                if property.is_operable() {
                    Some((name.clone(), property))
                } else {
                    tracing::debug!(
                        property = %name,
                        declared_type = %property.declared_type,
                        "dropping non-operable property"
                    );
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageDto {
    pub id: String,
    #[serde(default)]
    pub properties: IndexMap<String, PagePropertyDto>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PagePropertyDto {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: Vec<RichTextDto>,
}

impl PageDto {
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find(|property| property.kind == "title")
            .map(|property| plain_text(&property.title))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPageDto {
    pub id: String,
}
