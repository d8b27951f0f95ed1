use crate::config::TopLevelSource;
use crate::domain::{
    Editable, FieldTemplate, FormSnapshot, FormStyle, Header, IntegrationId, OptionsConfig,
    OptionsValue, Rgba, Step, Template,
    tags::{DATABASES_LIST, PROJECTS_LIST, SCHEMA_SELECTOR},
};

pub const INTEGRATION_NAME: &str = "Jira";
pub const INTEGRATION_ICON: &str = "JiraLogo";
pub const INTEGRATION_ID: &str = "4f6a9d57-b8d0-4635-852a-9a49de2e7ada";

const ACCENT: Rgba = Rgba {
    r: 0,
    g: 122,
    b: 255,
    a: 255,
};

pub fn integration_id() -> IntegrationId {
    IntegrationId(INTEGRATION_ID.to_string())
}

/// Empty form shape offered when the user creates a new form: a single selector
/// field whose choices are filled by `load`.
pub fn scratch_template() -> FormSnapshot {
    scratch_template_for(TopLevelSource::Databases)
}

pub fn scratch_template_for(source: TopLevelSource) -> FormSnapshot {
    let (name, icon, source_tag, step_name) = match source {
        TopLevelSource::Databases => ("Jira Databases", "tray.2", DATABASES_LIST, "Select database"),
        TopLevelSource::Projects => ("Jira Projects", "folder", PROJECTS_LIST, "Select project"),
    };
    let selector = Template::new(
        Header::new(name, icon, SCHEMA_SELECTOR, [source_tag]),
        OptionsValue::default(),
        OptionsConfig {
            mandatory: Editable::locked(true),
            single_selection: Editable::locked(true),
            typing_search: Editable::open(true),
            target_id: None,
        },
    );

    FormSnapshot {
        integration: integration_id(),
        style: FormStyle {
            name: INTEGRATION_NAME.to_string(),
            icon: INTEGRATION_ICON.to_string(),
            color: ACCENT,
        },
        first_field: Some(selector.header.id.clone()),
        fields: vec![FieldTemplate::Options(selector)],
        steps: vec![Step {
            id: SCHEMA_SELECTOR,
            name: step_name.to_string(),
        }],
    }
}
