use crate::domain::{
    FieldTemplate, OptionsTemplate,
    tags::{SCHEMA_SELECTOR, column_type},
};
use crate::schema::INVALID_TARGET;

/// Side effect selected for one reported field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NoOp,
    FetchDependentFields,
    FilterByText,
    SearchRelationTarget,
}

struct ChangeHandler {
    name: &'static str,
    applies: fn(&OptionsTemplate) -> bool,
    decide: fn(&OptionsTemplate, &OptionsTemplate) -> Route,
}

// Evaluated in order; the first handler whose predicate holds decides.
const HANDLERS: [ChangeHandler; 2] = [
    ChangeHandler {
        name: "schema selector",
        applies: is_selector,
        decide: decide_selector,
    },
    ChangeHandler {
        name: "relation field",
        applies: is_relation,
        decide: decide_relation,
    },
];

/// Decides which effect, if any, a change from `old` to `new` needs. Stateless: the same
/// pair always yields the same route.
pub fn route(old: &FieldTemplate, new: &FieldTemplate) -> Route {
    let (Some(old), Some(new)) = (old.as_options(), new.as_options()) else {
        return Route::NoOp;
    };
    if old.header.id != new.header.id {
        return Route::NoOp;
    }
    match HANDLERS.iter().find(|handler| (handler.applies)(new)) {
        Some(handler) => {
            let route = (handler.decide)(old, new);
            tracing::debug!(handler = handler.name, field = %new.header.id, ?route, "routed field change");
            route
        }
        None => Route::NoOp,
    }
}

fn is_selector(input: &OptionsTemplate) -> bool {
    input.header.has_tag(&SCHEMA_SELECTOR)
}

fn is_relation(input: &OptionsTemplate) -> bool {
    input.header.has_tag(&column_type::RELATION)
}

fn decide_selector(old: &OptionsTemplate, new: &OptionsTemplate) -> Route {
    if old.search() != new.search() && new.typing_search_enabled() {
        Route::FilterByText
    } else if old.selected_ids() != new.selected_ids() {
        Route::FetchDependentFields
    } else {
        Route::NoOp
    }
}

fn decide_relation(old: &OptionsTemplate, new: &OptionsTemplate) -> Route {
    let has_target = new
        .config
        .target_id
        .as_deref()
        .is_some_and(|target| !target.is_empty() && target != INVALID_TARGET);
    if old.search() != new.search()
        && new.typing_search_enabled()
        && !new.search().is_empty()
        && has_target
    {
        Route::SearchRelationTarget
    } else {
        Route::NoOp
    }
}
