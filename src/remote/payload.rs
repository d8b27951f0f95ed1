use serde_json::{Map, Number, Value, json};

use crate::domain::{
    FieldTemplate, FormSnapshot,
    tags::{SCHEMA_COLUMN, SCHEMA_SELECTOR},
};
use crate::error::{FormError, Result};
use crate::schema::PropertyKind;

/// Builds the create-page body for the current snapshot and validates it before any
/// request is made.
pub fn build_page_payload(snapshot: &FormSnapshot) -> Result<Value> {
    let database_id = snapshot
        .first_with_tag(&SCHEMA_SELECTOR)
        .and_then(FieldTemplate::as_options)
        .and_then(|selector| selector.first_selected_id())
        .unwrap_or_default()
        .to_string();

    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in snapshot.fields.iter().filter(|f| f.has_tag(&SCHEMA_COLUMN)) {
        let Some(kind) = column_kind(field) else {
            tracing::debug!(field = %field.id(), "column without a known type is not submitted");
            continue;
        };
        let name = field.header().name.clone();
        if field.is_mandatory() {
            required.push(Value::String(name.clone()));
        }
        if !field.has_value() {
            continue;
        }
        properties.insert(name, encode_value(kind, field)?);
    }

    let payload = json!({
        "parent": {"database_id": database_id},
        "properties": properties,
    });
    validate(&payload, required)?;
    Ok(payload)
}

fn column_kind(field: &FieldTemplate) -> Option<PropertyKind> {
    field.header().tags.iter().find_map(PropertyKind::from_tag)
}

fn encode_value(kind: PropertyKind, field: &FieldTemplate) -> Result<Value> {
    let name = &field.header().name;
    let value = match (kind, field) {
        (PropertyKind::Title, FieldTemplate::Text(t)) => json!({"title": rich_text(&t.value)}),
        (PropertyKind::RichText, FieldTemplate::Text(t)) => {
            json!({"rich_text": rich_text(&t.value)})
        }
        (PropertyKind::Url, FieldTemplate::Text(t)) => json!({"url": t.value.trim()}),
        (PropertyKind::Number, FieldTemplate::Number(t)) => {
            let number = t.value.and_then(Number::from_f64).ok_or_else(|| {
                FormError::PayloadNotConstructible(format!("'{name}' is not a finite number"))
            })?;
            json!({"number": number})
        }
        (PropertyKind::Date, FieldTemplate::DateRange(t)) => {
            let range = t.value;
            if let (Some(start), Some(end)) = (range.start, range.end)
                && end < start
            {
                return Err(FormError::PayloadNotConstructible(format!(
                    "'{name}' ends before it starts"
                )));
            }
            let mut date = Map::new();
            for (bound, day) in [("start", range.start), ("end", range.end)] {
                if let Some(day) = day {
                    date.insert(bound.into(), json!(day.format("%Y-%m-%d").to_string()));
                }
            }
            json!({"date": date})
        }
        (PropertyKind::Checkbox, FieldTemplate::Boolean(t)) => json!({"checkbox": t.value}),
        (PropertyKind::Select, FieldTemplate::Options(t)) => {
            json!({"select": t.first_selected_id().map(|id| json!({"id": id}))})
        }
        (PropertyKind::MultiSelect, FieldTemplate::Options(t)) => {
            json!({"multi_select": id_list(t.selected_ids())})
        }
        (PropertyKind::Relation, FieldTemplate::Options(t)) => {
            json!({"relation": id_list(t.selected_ids())})
        }
        (kind, _) => {
            return Err(FormError::PayloadNotConstructible(format!(
                "'{name}' holds a value that cannot be sent as {}",
                kind.as_str()
            )));
        }
    };
    Ok(value)
}

fn rich_text(content: &str) -> Value {
    json!([{"text": {"content": content}}])
}

fn id_list(ids: Vec<&str>) -> Value {
    Value::Array(ids.into_iter().map(|id| json!({"id": id})).collect())
}

fn validate(payload: &Value, required: Vec<Value>) -> Result<()> {
    let schema = json!({
        "type": "object",
        "required": ["parent", "properties"],
        "properties": {
            "parent": {
                "type": "object",
                "required": ["database_id"],
                "properties": {"database_id": {"type": "string", "minLength": 1}}
            },
            "properties": {"type": "object", "required": required}
        }
    });
    let validator = jsonschema::validator_for(&schema)
        .map_err(|err| FormError::PayloadNotConstructible(err.to_string()))?;
    let problems: Vec<String> = validator
        .iter_errors(payload)
        .map(|error| format!("{}: {}", error.instance_path, error))
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(FormError::PayloadNotConstructible(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DateRange, Editable};
    use crate::form::scratch_template;
    use crate::schema::{RemoteProperty, build_templates};

    fn snapshot_with_columns(props: Vec<(&str, RemoteProperty)>) -> FormSnapshot {
        let mut snapshot = scratch_template();
        let selector = snapshot.fields[0].as_options_mut().unwrap();
        selector.load_options(vec![crate::domain::OptionItem::new("db-1", "Tasks")], false);
        selector.select("db-1");
        let props: Vec<_> = props.into_iter().map(|(n, p)| (n.to_string(), p)).collect();
        snapshot.fields.extend(build_templates(&props));
        snapshot
    }

    #[test]
    fn encodes_filled_columns_and_skips_empty_ones() {
        let mut snapshot = snapshot_with_columns(vec![
            ("Name", RemoteProperty::new("title", "title")),
            ("Done", RemoteProperty::new("c", "checkbox")),
            ("Notes", RemoteProperty::new("n", "rich_text")),
        ]);
        if let FieldTemplate::Text(t) = &mut snapshot.fields[1] {
            t.value = "Write docs".into();
        }
        let payload = build_page_payload(&snapshot).unwrap();
        assert_eq!(payload["parent"]["database_id"], json!("db-1"));
        assert_eq!(
            payload["properties"]["Name"]["title"][0]["text"]["content"],
            json!("Write docs")
        );
        assert_eq!(payload["properties"]["Done"]["checkbox"], json!(false));
        assert!(payload["properties"].get("Notes").is_none());
    }

    #[test]
    fn missing_mandatory_column_fails() {
        let mut snapshot = snapshot_with_columns(vec![("Name", RemoteProperty::new("t", "title"))]);
        if let FieldTemplate::Text(t) = &mut snapshot.fields[1] {
            t.config.mandatory = Editable::open(true);
        }
        let err = build_page_payload(&snapshot).unwrap_err();
        assert!(matches!(err, FormError::PayloadNotConstructible(_)));
    }

    #[test]
    fn missing_database_selection_fails() {
        let snapshot = scratch_template();
        let err = build_page_payload(&snapshot).unwrap_err();
        assert!(matches!(err, FormError::PayloadNotConstructible(_)));
    }

    #[test]
    fn inverted_date_range_fails() {
        let mut snapshot = snapshot_with_columns(vec![("Due", RemoteProperty::new("d", "date"))]);
        if let FieldTemplate::DateRange(t) = &mut snapshot.fields[1] {
            t.value = DateRange {
                start: NaiveDate::from_ymd_opt(2024, 5, 2),
                end: NaiveDate::from_ymd_opt(2024, 5, 1),
            };
        }
        assert!(build_page_payload(&snapshot).is_err());
    }

    #[test]
    fn open_ended_date_leaves_out_end() {
        let mut snapshot = snapshot_with_columns(vec![("Due", RemoteProperty::new("d", "date"))]);
        if let FieldTemplate::DateRange(t) = &mut snapshot.fields[1] {
            t.value = DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 1),
                end: None,
            };
        }
        let payload = build_page_payload(&snapshot).unwrap();
        assert_eq!(payload["properties"]["Due"]["date"], json!({"start": "2024-01-01"}));
    }

    #[test]
    fn non_finite_number_fails() {
        let mut snapshot = snapshot_with_columns(vec![("Cost", RemoteProperty::new("c", "number"))]);
        if let FieldTemplate::Number(t) = &mut snapshot.fields[1] {
            t.value = Some(f64::NAN);
        }
        assert!(build_page_payload(&snapshot).is_err());
    }
}
