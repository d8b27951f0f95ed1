mod form;
mod mutation;
pub mod tags;
mod template;

pub use form::{FormSnapshot, FormStyle, IntegrationId, Rgba, Step};
pub use mutation::DomainMutation;
pub use tags::Tag;
pub use template::{
    BasicConfig, BooleanTemplate, DateRange, DateRangeTemplate, Editable, FieldTemplate,
    Header, NumberTemplate, OptionItem, OptionsConfig, OptionsTemplate, OptionsValue,
    Template, TemplateId, TextTemplate,
};
