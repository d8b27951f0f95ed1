use crate::domain::{DomainMutation, FormSnapshot};

/// Applies `mutation` to the host-owned snapshot. Applying the same mutation twice
/// leaves the snapshot as after the first application.
pub fn apply_mutation(snapshot: &mut FormSnapshot, mutation: &DomainMutation) {
    match mutation {
        DomainMutation::ReplaceField(field) => snapshot.upsert(field.clone()),
        DomainMutation::InsertFields { leading, fields } => {
            snapshot.fields = std::iter::once(leading.clone())
                .chain(fields.iter().cloned())
                .collect();
            if let Some(first) = fields.first() {
                snapshot.first_field = Some(first.id().clone());
            }
        }
        DomainMutation::MarkDefaults => snapshot.save_values_as_default(),
        DomainMutation::Batch { mutations } => {
            for mutation in mutations {
                apply_mutation(snapshot, mutation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldTemplate, OptionItem};
    use crate::form::scratch_template;
    use crate::schema::{RemoteProperty, build_templates};

    fn columns() -> Vec<FieldTemplate> {
        build_templates(&[
            ("Name".to_string(), RemoteProperty::new("title", "title")),
            ("Done".to_string(), RemoteProperty::new("c", "checkbox")),
        ])
    }

    #[test]
    fn replace_field_updates_in_place() {
        let mut snapshot = scratch_template();
        let mut selector = snapshot.fields[0].clone();
        selector
            .as_options_mut()
            .unwrap()
            .load_options(vec![OptionItem::new("a", "A")], false);
        apply_mutation(&mut snapshot, &DomainMutation::ReplaceField(selector.clone()));
        assert_eq!(snapshot.fields.len(), 1);
        assert_eq!(snapshot.fields[0], selector);
    }

    #[test]
    fn insert_fields_resets_columns_and_focus() {
        let mut snapshot = scratch_template();
        let leading = snapshot.fields[0].clone();
        let mutation = DomainMutation::Batch {
            mutations: vec![
                DomainMutation::InsertFields {
                    leading,
                    fields: columns(),
                },
                DomainMutation::MarkDefaults,
            ],
        };
        apply_mutation(&mut snapshot, &mutation);
        let once = snapshot.clone();
        apply_mutation(&mut snapshot, &mutation);

        assert_eq!(snapshot, once);
        assert_eq!(snapshot.fields.len(), 3);
        assert_eq!(
            snapshot.first_field.as_ref().map(|id| id.as_str()),
            Some("column:title")
        );
    }

    #[test]
    fn mark_defaults_snapshots_values() {
        let mut snapshot = scratch_template();
        snapshot.fields.extend(columns());
        if let FieldTemplate::Text(t) = &mut snapshot.fields[1] {
            t.value = "draft".into();
        }
        apply_mutation(&mut snapshot, &DomainMutation::MarkDefaults);
        let FieldTemplate::Text(t) = &snapshot.fields[1] else {
            panic!("expected text");
        };
        assert_eq!(t.default_value, "draft");
    }
}
