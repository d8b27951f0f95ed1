use std::cmp::Ordering;

use crate::domain::{
    BasicConfig, DateRange, Editable, FieldTemplate, Header, OptionItem, OptionsConfig,
    OptionsValue, Tag, Template, tags::SCHEMA_COLUMN,
};

use super::property::{PropertyKind, RemoteProperty, SelectField};

/// Target id recorded on relation templates whose schema omits the related database.
pub const INVALID_TARGET: &str = "invalid-target";

/// Maps schema properties to field templates in user-visible column order: title
/// properties first, then by name, then by raw property id.
pub fn build_templates(properties: &[(String, RemoteProperty)]) -> Vec<FieldTemplate> {
    let mut ordered: Vec<&(String, RemoteProperty)> = properties.iter().collect();
    ordered.sort_by(|(name_a, a), (name_b, b)| column_order(name_a, a, name_b, b));
    ordered
        .into_iter()
        .map(|(name, property)| build_template(name, property))
        .collect()
}

fn column_order(name_a: &str, a: &RemoteProperty, name_b: &str, b: &RemoteProperty) -> Ordering {
    let title_a = a.kind() == Some(PropertyKind::Title);
    let title_b = b.kind() == Some(PropertyKind::Title);
    title_b
        .cmp(&title_a)
        .then_with(|| name_a.cmp(name_b))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn build_template(name: &str, property: &RemoteProperty) -> FieldTemplate {
    let kind = property.kind();
    let header = Header::new(
        name,
        icon_for(kind),
        Tag::column(&property.id),
        [Some(SCHEMA_COLUMN), kind.map(PropertyKind::tag)]
            .into_iter()
            .flatten(),
    );

    match kind {
        Some(PropertyKind::Title | PropertyKind::RichText | PropertyKind::Url) | None => {
            FieldTemplate::Text(Template::new(header, String::new(), BasicConfig::default()))
        }
        Some(PropertyKind::Number) => {
            FieldTemplate::Number(Template::new(header, None, BasicConfig::default()))
        }
        Some(PropertyKind::Date) => FieldTemplate::DateRange(Template::new(
            header,
            DateRange::default(),
            BasicConfig::default(),
        )),
        Some(PropertyKind::Checkbox) => {
            FieldTemplate::Boolean(Template::new(header, false, BasicConfig::default()))
        }
        Some(PropertyKind::Select) => {
            select_template(header, property.select.as_ref(), true)
        }
        Some(PropertyKind::MultiSelect) => {
            select_template(header, property.multi_select.as_ref(), false)
        }
        Some(PropertyKind::Relation) => {
            let target = property
                .relation
                .as_ref()
                .and_then(|relation| relation.database_id.clone())
                .unwrap_or_else(|| INVALID_TARGET.to_string());
            FieldTemplate::Options(Template::new(
                header,
                OptionsValue::default(),
                OptionsConfig {
                    mandatory: Editable::open(false),
                    single_selection: Editable::locked(false),
                    typing_search: Editable::locked(true),
                    target_id: Some(target),
                },
            ))
        }
    }
}

fn select_template(header: Header, field: Option<&SelectField>, single: bool) -> FieldTemplate {
    let mut options: Vec<OptionItem> = field
        .map(|field| {
            field
                .options
                .iter()
                .map(|option| OptionItem::new(option.id.clone(), option.name.clone()))
                .collect()
        })
        .unwrap_or_default();
    options.sort_by(|a, b| a.description.cmp(&b.description));

    FieldTemplate::Options(Template::new(
        header,
        OptionsValue {
            options,
            search: String::new(),
        },
        OptionsConfig {
            mandatory: Editable::open(false),
            single_selection: Editable::locked(single),
            typing_search: Editable::locked(false),
            target_id: None,
        },
    ))
}

fn icon_for(kind: Option<PropertyKind>) -> &'static str {
    match kind {
        Some(PropertyKind::Title) => "textformat",
        Some(PropertyKind::RichText) | None => "text.alignleft",
        Some(PropertyKind::Url) => "link",
        Some(PropertyKind::Number) => "number",
        Some(PropertyKind::Date) => "calendar",
        Some(PropertyKind::Checkbox) => "checkmark.square",
        Some(PropertyKind::Select) => "list.bullet.circle",
        Some(PropertyKind::MultiSelect) => "list.bullet",
        Some(PropertyKind::Relation) => "arrow.up.right.square",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tags::column_type;
    use crate::schema::property::{RelationField, SelectOption};

    fn prop(id: &str, ty: &str) -> RemoteProperty {
        RemoteProperty::new(id, ty)
    }

    fn names(templates: &[FieldTemplate]) -> Vec<&str> {
        templates.iter().map(|t| t.header().name.as_str()).collect()
    }

    #[test]
    fn title_sorts_first_then_name_then_id() {
        let input = vec![
            ("Budget".to_string(), prop("b2", "number")),
            ("Alpha".to_string(), prop("z9", "rich_text")),
            ("Name".to_string(), prop("t1", "title")),
            ("Budget".to_string(), prop("b1", "checkbox")),
        ];
        let templates = build_templates(&input);
        assert_eq!(names(&templates), vec!["Name", "Alpha", "Budget", "Budget"]);
        assert_eq!(templates[2].id().as_str(), "column:b1");
        assert_eq!(templates[3].id().as_str(), "column:b2");
    }

    #[test]
    fn maps_each_kind_to_its_template() {
        let input = vec![
            ("a".to_string(), prop("1", "url")),
            ("b".to_string(), prop("2", "number")),
            ("c".to_string(), prop("3", "date")),
            ("d".to_string(), prop("4", "checkbox")),
        ];
        let templates = build_templates(&input);
        assert!(matches!(templates[0], FieldTemplate::Text(_)));
        assert!(matches!(templates[1], FieldTemplate::Number(_)));
        assert!(matches!(templates[2], FieldTemplate::DateRange(_)));
        assert!(matches!(templates[3], FieldTemplate::Boolean(_)));
        assert!(templates.iter().all(|t| t.has_tag(&SCHEMA_COLUMN)));
        assert!(templates[2].has_tag(&column_type::DATE));
    }

    #[test]
    fn unknown_type_falls_back_to_text_without_type_tag() {
        let template = build_template("Formula", &prop("f", "formula"));
        let FieldTemplate::Text(text) = &template else {
            panic!("expected text template");
        };
        assert!(text.header.has_tag(&SCHEMA_COLUMN));
        assert_eq!(text.header.tags.len(), 2);
    }

    #[test]
    fn relation_without_database_gets_sentinel_target() {
        let mut property = prop("r", "relation");
        property.relation = Some(RelationField::default());
        let template = build_template("Parent", &property);
        let options = template.as_options().expect("options template");
        assert_eq!(options.config.target_id.as_deref(), Some(INVALID_TARGET));

        let bare = build_template("Parent", &prop("r", "relation"));
        assert_eq!(
            bare.as_options().and_then(|o| o.config.target_id.as_deref()),
            Some(INVALID_TARGET)
        );
    }

    #[test]
    fn multi_select_sorts_options_and_allows_many() {
        let mut property = prop("m", "multi_select");
        property.multi_select = Some(SelectField {
            options: vec![
                SelectOption {
                    id: "2".into(),
                    name: "zeta".into(),
                    color: String::new(),
                },
                SelectOption {
                    id: "1".into(),
                    name: "eta".into(),
                    color: String::new(),
                },
            ],
        });
        let template = build_template("Labels", &property);
        let options = template.as_options().unwrap();
        assert!(!options.is_single_selection());
        assert!(!options.typing_search_enabled());
        assert_eq!(options.options()[0].description, "eta");
        assert!(options.config.target_id.is_none());
    }
}
