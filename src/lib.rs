#![deny(rust_2018_idioms)]

pub mod config;
pub mod domain;
mod error;
pub mod form;
pub mod ranking;
pub mod remote;
pub mod schema;

pub use config::{IntegrationOptions, TopLevelSource};
pub use domain::{DomainMutation, FieldTemplate, FormSnapshot};
pub use error::{FormError, Result};
pub use form::{FormIntegrationService, Route, SessionPhase, apply_mutation, route, scratch_template};
pub use remote::RemoteGateway;
pub use schema::build_templates;

pub mod prelude {
    pub use super::{
        DomainMutation, FieldTemplate, FormError, FormIntegrationService, FormSnapshot,
        IntegrationOptions, RemoteGateway, apply_mutation,
    };
}
