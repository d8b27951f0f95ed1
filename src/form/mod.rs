mod dispatch;
mod reducers;
mod scratch;
mod service;

pub use dispatch::{Route, route};
pub use reducers::apply_mutation;
pub use scratch::{
    INTEGRATION_ICON, INTEGRATION_ID, INTEGRATION_NAME, integration_id, scratch_template,
    scratch_template_for,
};
pub use service::{FormIntegrationService, SessionPhase};
