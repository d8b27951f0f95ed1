mod builder;
mod property;

pub use builder::{INVALID_TARGET, build_template, build_templates};
pub use property::{
    PropertyKind, RelationField, RemoteProperty, SelectField, SelectOption,
};
