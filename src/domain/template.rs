use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tags::Tag;

/// Stable template identifier. Always derived from a tag so reloading a schema yields
/// the same ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn from_tag(tag: &Tag) -> Self {
        Self(tag.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configurable attribute. `constant` means the host must not let the user change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editable<T> {
    pub value: T,
    pub constant: bool,
}

impl<T> Editable<T> {
    pub fn locked(value: T) -> Self {
        Self {
            value,
            constant: true,
        }
    }

    pub fn open(value: T) -> Self {
        Self {
            value,
            constant: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub id: TemplateId,
    pub name: String,
    pub icon: String,
    pub tags: BTreeSet<Tag>,
}

impl Header {
    /// Builds a header whose id derives from `identity`; `identity` is also kept in the
    /// tag set.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        identity: Tag,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Self {
        let id = TemplateId::from_tag(&identity);
        let mut tags: BTreeSet<Tag> = tags.into_iter().collect();
        tags.insert(identity);
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            tags,
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template<V, C> {
    pub header: Header,
    pub value: V,
    pub default_value: V,
    pub config: C,
}

impl<V: Clone, C> Template<V, C> {
    pub fn new(header: Header, value: V, config: C) -> Self {
        Self {
            header,
            default_value: value.clone(),
            value,
            config,
        }
    }

    pub fn save_value_as_default(&mut self) {
        self.default_value = self.value.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicConfig {
    pub mandatory: Editable<bool>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            mandatory: Editable::open(false),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub option_id: String,
    pub description: String,
    pub selected: bool,
}

impl OptionItem {
    pub fn new(option_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            option_id: option_id.into(),
            description: description.into(),
            selected: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsValue {
    pub options: Vec<OptionItem>,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsConfig {
    pub mandatory: Editable<bool>,
    pub single_selection: Editable<bool>,
    pub typing_search: Editable<bool>,
    pub target_id: Option<String>,
}

pub type TextTemplate = Template<String, BasicConfig>;
pub type NumberTemplate = Template<Option<f64>, BasicConfig>;
pub type DateRangeTemplate = Template<DateRange, BasicConfig>;
pub type BooleanTemplate = Template<bool, BasicConfig>;
pub type OptionsTemplate = Template<OptionsValue, OptionsConfig>;

impl OptionsTemplate {
    pub fn options(&self) -> &[OptionItem] {
        &self.value.options
    }

    pub fn search(&self) -> &str {
        &self.value.search
    }

    pub fn selected(&self) -> impl Iterator<Item = &OptionItem> {
        self.value.options.iter().filter(|option| option.selected)
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.selected().map(|option| option.option_id.as_str()).collect()
    }

    pub fn first_selected_id(&self) -> Option<&str> {
        self.selected().next().map(|option| option.option_id.as_str())
    }

    pub fn is_single_selection(&self) -> bool {
        self.config.single_selection.value
    }

    pub fn typing_search_enabled(&self) -> bool {
        self.config.typing_search.value
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.value.search = text.into();
    }

    /// Marks `option_id` as selected. Single-selection templates drop any previous
    /// selection. Returns false when the id is unknown.
    pub fn select(&mut self, option_id: &str) -> bool {
        if !self.value.options.iter().any(|o| o.option_id == option_id) {
            return false;
        }
        let single = self.is_single_selection();
        for option in &mut self.value.options {
            if option.option_id == option_id {
                option.selected = true;
            } else if single {
                option.selected = false;
            }
        }
        true
    }

    pub fn deselect(&mut self, option_id: &str) {
        for option in &mut self.value.options {
            if option.option_id == option_id {
                option.selected = false;
            }
        }
    }

    /// Replaces the option list. With `keep_selected` the currently selected options
    /// survive (ahead of the new ones) and new entries with the same id are skipped.
    pub fn load_options(&mut self, options: Vec<OptionItem>, keep_selected: bool) {
        let mut next: Vec<OptionItem> = if keep_selected {
            self.selected().cloned().collect()
        } else {
            Vec::new()
        };
        for mut option in options {
            if next.iter().any(|kept| kept.option_id == option.option_id) {
                continue;
            }
            if !keep_selected {
                option.selected = false;
            }
            next.push(option);
        }
        if self.is_single_selection() {
            let mut seen = false;
            for option in &mut next {
                if option.selected {
                    option.selected = !seen;
                    seen = true;
                }
            }
        }
        self.value.options = next;
    }
}

/// Closed set of template kinds a host can render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldTemplate {
    Text(TextTemplate),
    Number(NumberTemplate),
    DateRange(DateRangeTemplate),
    Boolean(BooleanTemplate),
    Options(OptionsTemplate),
}

impl FieldTemplate {
    pub fn header(&self) -> &Header {
        match self {
            FieldTemplate::Text(t) => &t.header,
            FieldTemplate::Number(t) => &t.header,
            FieldTemplate::DateRange(t) => &t.header,
            FieldTemplate::Boolean(t) => &t.header,
            FieldTemplate::Options(t) => &t.header,
        }
    }

    pub fn id(&self) -> &TemplateId {
        &self.header().id
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.header().has_tag(tag)
    }

    pub fn is_mandatory(&self) -> bool {
        match self {
            FieldTemplate::Text(t) => t.config.mandatory.value,
            FieldTemplate::Number(t) => t.config.mandatory.value,
            FieldTemplate::DateRange(t) => t.config.mandatory.value,
            FieldTemplate::Boolean(t) => t.config.mandatory.value,
            FieldTemplate::Options(t) => t.config.mandatory.value,
        }
    }

    /// Whether the current value counts as "filled in". Booleans always do.
    pub fn has_value(&self) -> bool {
        match self {
            FieldTemplate::Text(t) => !t.value.trim().is_empty(),
            FieldTemplate::Number(t) => t.value.is_some(),
            FieldTemplate::DateRange(t) => t.value.start.is_some(),
            FieldTemplate::Boolean(_) => true,
            FieldTemplate::Options(t) => t.selected().next().is_some(),
        }
    }

    pub fn save_value_as_default(&mut self) {
        match self {
            FieldTemplate::Text(t) => t.save_value_as_default(),
            FieldTemplate::Number(t) => t.save_value_as_default(),
            FieldTemplate::DateRange(t) => t.save_value_as_default(),
            FieldTemplate::Boolean(t) => t.save_value_as_default(),
            FieldTemplate::Options(t) => t.save_value_as_default(),
        }
    }

    pub fn as_options(&self) -> Option<&OptionsTemplate> {
        match self {
            FieldTemplate::Options(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_options_mut(&mut self) -> Option<&mut OptionsTemplate> {
        match self {
            FieldTemplate::Options(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_options(single: bool, ids: &[&str]) -> OptionsTemplate {
        let header = Header::new("Status", "list.bullet", Tag::new("status"), []);
        let value = OptionsValue {
            options: ids.iter().map(|id| OptionItem::new(*id, id.to_uppercase())).collect(),
            search: String::new(),
        };
        Template::new(
            header,
            value,
            OptionsConfig {
                mandatory: Editable::open(false),
                single_selection: Editable::locked(single),
                typing_search: Editable::locked(false),
                target_id: None,
            },
        )
    }

    #[test]
    fn single_selection_keeps_one_option_selected() {
        let mut template = mk_options(true, &["a", "b", "c"]);
        assert!(template.select("a"));
        assert!(template.select("c"));
        assert_eq!(template.selected_ids(), vec!["c"]);
        assert!(!template.select("missing"));
    }

    #[test]
    fn multi_selection_accumulates() {
        let mut template = mk_options(false, &["a", "b"]);
        template.select("a");
        template.select("b");
        assert_eq!(template.selected_ids(), vec!["a", "b"]);
        template.deselect("a");
        assert_eq!(template.selected_ids(), vec!["b"]);
    }

    #[test]
    fn load_options_keeps_selection_when_requested() {
        let mut template = mk_options(false, &["a", "b"]);
        template.select("b");
        template.load_options(
            vec![OptionItem::new("b", "B again"), OptionItem::new("z", "Z")],
            true,
        );
        let ids: Vec<_> = template
            .options()
            .iter()
            .map(|o| o.option_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "z"]);
        assert_eq!(template.options()[0].description, "B");
        assert_eq!(template.selected_ids(), vec!["b"]);
    }

    #[test]
    fn load_options_without_keep_clears_selection() {
        let mut template = mk_options(true, &["a"]);
        template.select("a");
        let mut incoming = OptionItem::new("x", "X");
        incoming.selected = true;
        template.load_options(vec![OptionItem::new("a", "A"), incoming], false);
        assert!(template.selected_ids().is_empty());
        assert_eq!(template.options().len(), 2);
    }

    #[test]
    fn header_id_derives_from_identity_tag() {
        let header = Header::new("Name", "textformat", Tag::column("title"), []);
        assert_eq!(header.id.as_str(), "column:title");
        assert!(header.has_tag(&Tag::column("title")));
    }
}
