use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{IntegrationOptions, TopLevelSource};
use crate::domain::{
    DomainMutation, FieldTemplate, FormSnapshot, IntegrationId, OptionItem, OptionsTemplate,
    tags::SCHEMA_SELECTOR,
};
use crate::error::{FormError, Result};
use crate::ranking::rank_by_distance;
use crate::remote::{RemoteGateway, SecretStore, Transport};
use crate::schema::build_templates;

use super::dispatch::{Route, route};
use super::scratch::{integration_id, scratch_template_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loaded,
    Idle,
    AwaitingRemote,
    Submitted,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    in_flight: usize,
}

/// Drives one form session: initial load, reactions to field changes and submission.
/// Every call receives the current snapshot and answers with a mutation; the snapshot
/// itself is never retained.
pub struct FormIntegrationService {
    gateway: RemoteGateway,
    state: Mutex<SessionState>,
}

impl FormIntegrationService {
    pub fn new(gateway: RemoteGateway) -> Self {
        Self {
            gateway,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Uninitialized,
                in_flight: 0,
            }),
        }
    }

    pub fn with_parts(
        options: IntegrationOptions,
        transport: Arc<dyn Transport>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self::new(RemoteGateway::new(
            integration_id(),
            options,
            transport,
            secrets,
        ))
    }

    pub fn id(&self) -> &IntegrationId {
        self.gateway.integration()
    }

    pub fn gateway(&self) -> &RemoteGateway {
        &self.gateway
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    pub fn scratch_template(&self) -> FormSnapshot {
        scratch_template_for(self.gateway.options().top_level)
    }

    /// Fills the selector field with the configured top-level list.
    pub async fn load(&self, snapshot: &FormSnapshot) -> Result<DomainMutation> {
        self.ensure_phase(
            "load",
            &[
                SessionPhase::Uninitialized,
                SessionPhase::Loaded,
                SessionPhase::Idle,
            ],
        )?;
        let mut selector = selector_of(snapshot)?.clone();
        let options = self.top_level_options(None).await?;
        tracing::info!(options = options.len(), "selector loaded");
        selector.load_options(options, false);

        let mut state = self.lock();
        if state.phase == SessionPhase::Uninitialized {
            state.phase = SessionPhase::Loaded;
        }
        Ok(DomainMutation::ReplaceField(FieldTemplate::Options(selector)))
    }

    /// Runs at most one remote effect for the change from `old` to `new`. `Skip` means
    /// nothing needed to happen.
    pub async fn on_field_change(
        &self,
        snapshot: &FormSnapshot,
        old: &FieldTemplate,
        new: &FieldTemplate,
    ) -> Result<DomainMutation> {
        self.ensure_phase(
            "handle a field change",
            &[
                SessionPhase::Loaded,
                SessionPhase::Idle,
                SessionPhase::AwaitingRemote,
            ],
        )?;
        let decision = route(old, new);
        let input = match new.as_options() {
            Some(input) if decision != Route::NoOp => input,
            _ => {
                self.settle_idle();
                tracing::debug!(field = %new.id(), "field change skipped");
                return Err(FormError::Skip);
            }
        };
        tracing::debug!(
            field = %input.header.id,
            ?decision,
            fields = snapshot.fields.len(),
            "running field change effect"
        );

        let _guard = InFlight::enter(self);
        let outcome = match decision {
            Route::FetchDependentFields => self.load_dependent_fields(input).await,
            Route::FilterByText => self.filter_selector(input).await,
            Route::SearchRelationTarget => self.search_relation(input).await,
            Route::NoOp => Err(FormError::Skip),
        };
        if let Err(err) = &outcome
            && !err.is_skip()
        {
            tracing::warn!(field = %input.header.id, error = %err, "field change failed");
        }
        outcome
    }

    /// Submits the form. Only valid once loaded and while no call is in flight; on
    /// failure the phase is left untouched.
    pub async fn send(&self, snapshot: &FormSnapshot) -> Result<()> {
        self.ensure_phase("send", &[SessionPhase::Loaded, SessionPhase::Idle])?;
        self.gateway.submit(snapshot).await?;
        self.lock().phase = SessionPhase::Submitted;
        tracing::info!(integration = %self.id(), "form submitted");
        Ok(())
    }

    async fn load_dependent_fields(&self, input: &OptionsTemplate) -> Result<DomainMutation> {
        let Some(database_id) = input.first_selected_id() else {
            return Err(FormError::Skip);
        };
        tracing::info!(database_id, "loading dependent fields");
        let Some(properties) = self.gateway.fetch_database_schema(database_id).await? else {
            return Err(FormError::Skip);
        };
        let columns = build_templates(&properties);
        tracing::info!(database_id, columns = columns.len(), "dependent fields loaded");
        Ok(DomainMutation::Batch {
            mutations: vec![
                DomainMutation::InsertFields {
                    leading: FieldTemplate::Options(input.clone()),
                    fields: columns,
                },
                DomainMutation::MarkDefaults,
            ],
        })
    }

    async fn filter_selector(&self, input: &OptionsTemplate) -> Result<DomainMutation> {
        let text = input.search().trim();
        let mut options = self
            .top_level_options(Some(text).filter(|t| !t.is_empty()))
            .await?;
        if !text.is_empty() {
            rank_by_distance(&mut options, text, |option| option.description.as_str());
        }
        let mut updated = input.clone();
        updated.load_options(options, true);
        Ok(DomainMutation::ReplaceField(FieldTemplate::Options(updated)))
    }

    async fn search_relation(&self, input: &OptionsTemplate) -> Result<DomainMutation> {
        let Some(target) = input.config.target_id.as_deref() else {
            return Err(FormError::Skip);
        };
        let debounce = self.gateway.options().search_debounce;
        if !debounce.is_zero() {
            tokio::time::sleep(debounce).await;
        }
        let results = self
            .gateway
            .search_relation_targets(input.search(), target)
            .await?;
        let options = results
            .into_iter()
            .map(|target| OptionItem::new(target.id, target.description))
            .collect();
        let mut updated = input.clone();
        updated.load_options(options, true);
        Ok(DomainMutation::ReplaceField(FieldTemplate::Options(updated)))
    }

    async fn top_level_options(&self, query: Option<&str>) -> Result<Vec<OptionItem>> {
        let options = match self.gateway.options().top_level {
            TopLevelSource::Databases => self
                .gateway
                .search_databases(query)
                .await?
                .into_iter()
                .map(|database| OptionItem::new(database.id, database.name))
                .collect(),
            TopLevelSource::Projects => {
                let needle = query.map(str::to_lowercase);
                self.gateway
                    .list_projects()
                    .await?
                    .into_iter()
                    .filter(|project| {
                        needle
                            .as_deref()
                            .is_none_or(|needle| project.name.to_lowercase().contains(needle))
                    })
                    .map(|project| OptionItem::new(project.id, project.name))
                    .collect()
            }
        };
        Ok(options)
    }

    fn ensure_phase(&self, operation: &'static str, allowed: &[SessionPhase]) -> Result<()> {
        let phase = self.lock().phase;
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(FormError::InvalidState { operation, phase })
        }
    }

    fn settle_idle(&self) {
        let mut state = self.lock();
        if state.phase == SessionPhase::Loaded {
            state.phase = SessionPhase::Idle;
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn selector_of(snapshot: &FormSnapshot) -> Result<&OptionsTemplate> {
    snapshot
        .first_with_tag(&SCHEMA_SELECTOR)
        .and_then(FieldTemplate::as_options)
        .ok_or(FormError::InputNotLocated(SCHEMA_SELECTOR))
}

/// Marks a remote call in flight; dropping it (normally or because the host cancelled
/// the future) returns the session to `Idle` once no other call is pending.
struct InFlight<'a> {
    service: &'a FormIntegrationService,
}

impl<'a> InFlight<'a> {
    fn enter(service: &'a FormIntegrationService) -> Self {
        let mut state = service.lock();
        state.in_flight += 1;
        state.phase = SessionPhase::AwaitingRemote;
        Self { service }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.service.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.phase == SessionPhase::AwaitingRemote {
            state.phase = SessionPhase::Idle;
        }
    }
}
