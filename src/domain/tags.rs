use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic marker attached to a field template. Tags route behaviour; they are never
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    pub const fn from_static(raw: &'static str) -> Self {
        Self(Cow::Borrowed(raw))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(Cow::Owned(raw.into()))
    }

    /// Identity tag of one schema column, derived from the remote property id.
    pub fn column(property_id: &str) -> Self {
        Self::new(format!("{COLUMN_PREFIX}{property_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn column_property_id(&self) -> Option<&str> {
        self.0.strip_prefix(COLUMN_PREFIX)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const COLUMN_PREFIX: &str = "column:";

/// The selector field listing databases or projects.
pub const SCHEMA_SELECTOR: Tag = Tag::from_static("72986fd4-194a-45ee-9c50-5acc47c32b0c");
/// Added next to `SCHEMA_SELECTOR` when the selector lists projects.
pub const PROJECTS_LIST: Tag = Tag::from_static("b6f0e1b2-4a47-4d2b-8f0c-7e3d9c1a5e21");
/// Added next to `SCHEMA_SELECTOR` when the selector lists databases.
pub const DATABASES_LIST: Tag = Tag::from_static("1d3c8f6e-92a4-4f5b-a0d7-6c2e8b9f4a13");
/// Every template produced from a remote schema property carries this tag.
pub const SCHEMA_COLUMN: Tag = Tag::from_static("e4a1c9b8-3f2d-4c6a-9b7e-0d5f8a2c1e64");

pub mod column_type {
    use super::Tag;

    pub const TITLE: Tag = Tag::from_static("column-type:title");
    pub const RICH_TEXT: Tag = Tag::from_static("column-type:rich_text");
    pub const URL: Tag = Tag::from_static("column-type:url");
    pub const NUMBER: Tag = Tag::from_static("column-type:number");
    pub const DATE: Tag = Tag::from_static("column-type:date");
    pub const CHECKBOX: Tag = Tag::from_static("column-type:checkbox");
    pub const SELECT: Tag = Tag::from_static("column-type:select");
    pub const MULTI_SELECT: Tag = Tag::from_static("column-type:multi_select");
    pub const RELATION: Tag = Tag::from_static("column-type:relation");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_tags_round_trip_their_property_id() {
        let tag = Tag::column("a%3Bb");
        assert_eq!(tag.column_property_id(), Some("a%3Bb"));
        assert_eq!(SCHEMA_COLUMN.column_property_id(), None);
    }

    #[test]
    fn static_and_owned_tags_compare_by_content() {
        assert_eq!(Tag::new("column-type:date"), column_type::DATE);
    }
}
