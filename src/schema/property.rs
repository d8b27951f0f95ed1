use serde::{Deserialize, Serialize};

use crate::domain::{Tag, tags::column_type};

/// The property types the builder knows how to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Title,
    RichText,
    Url,
    Number,
    Date,
    Checkbox,
    Select,
    MultiSelect,
    Relation,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 9] = [
        PropertyKind::Title,
        PropertyKind::RichText,
        PropertyKind::Url,
        PropertyKind::Number,
        PropertyKind::Date,
        PropertyKind::Checkbox,
        PropertyKind::Select,
        PropertyKind::MultiSelect,
        PropertyKind::Relation,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Url => "url",
            PropertyKind::Number => "number",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Select => "select",
            PropertyKind::MultiSelect => "multi_select",
            PropertyKind::Relation => "relation",
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            PropertyKind::Title => column_type::TITLE,
            PropertyKind::RichText => column_type::RICH_TEXT,
            PropertyKind::Url => column_type::URL,
            PropertyKind::Number => column_type::NUMBER,
            PropertyKind::Date => column_type::DATE,
            PropertyKind::Checkbox => column_type::CHECKBOX,
            PropertyKind::Select => column_type::SELECT,
            PropertyKind::MultiSelect => column_type::MULTI_SELECT,
            PropertyKind::Relation => column_type::RELATION,
        }
    }

    /// Reverse of `tag`, used when serialising a template back into a page property.
    pub fn from_tag(tag: &Tag) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| &kind.tag() == tag)
    }
}

/// One property of a remote database schema, as the API describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProperty {
    pub id: String,
    #[serde(rename = "type", default)]
    pub declared_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<SelectField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<SelectField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationField>,
}

impl RemoteProperty {
    pub fn new(id: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            declared_type: declared_type.into(),
            select: None,
            multi_select: None,
            relation: None,
        }
    }

    pub fn kind(&self) -> Option<PropertyKind> {
        PropertyKind::parse(&self.declared_type)
    }

    pub fn is_operable(&self) -> bool {
        self.kind().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationField {
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub synced_property_name: Option<String>,
    #[serde(default)]
    pub synced_property_id: Option<String>,
}
