use thiserror::Error;

use crate::domain::{IntegrationId, Tag};
use crate::form::SessionPhase;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    /// Missing or rejected credential. Hosts route the user to re-authentication.
    #[error("authentication required for integration {0}")]
    AuthenticationRequired(IntegrationId),

    #[error("remote unavailable: {0:#}")]
    RemoteUnavailable(#[from] anyhow::Error),

    #[error("payload not constructible: {0}")]
    PayloadNotConstructible(String),

    #[error("no input tagged {0} in the form")]
    InputNotLocated(Tag),

    #[error("cannot {operation} while the session is {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },

    /// No handler applies to a change. Benign; never surface it to the user.
    #[error("no effect needed")]
    Skip,
}

impl FormError {
    pub fn is_skip(&self) -> bool {
        matches!(self, FormError::Skip)
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, FormError::AuthenticationRequired(_))
    }
}
