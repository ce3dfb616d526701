//! Runs fetch tickets against the Data Service and feeds the state
//!
//! Responses are handed back with the generation of the ticket that issued
//! them, so a response that lost the race to a newer request is dropped by
//! the state machine rather than drawn.

use crate::{ExamServiceClient, ServiceConfig};
use exam_core::{ChartResult, FieldId};
use exam_state::{AppState, FetchTicket};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Chart actions that may need the network
#[derive(Clone)]
pub struct ExamService {
    client: ExamServiceClient,
    state: AppState,
}

impl ExamService {
    pub fn new(state: AppState) -> Self {
        Self::with_config(state, ServiceConfig::default())
    }

    pub fn with_config(state: AppState, config: ServiceConfig) -> Self {
        Self {
            client: ExamServiceClient::new(config),
            state,
        }
    }

    /// Load patients and the field catalog concurrently
    pub fn load_reference_data(&self) {
        let client = self.client.clone();
        let state = self.state;
        state.set_loading(true);

        spawn_local(async move {
            let (patients, fields) =
                futures::join!(client.fetch_patients(), client.fetch_fields());

            match patients {
                Ok(patients) => state.set_patients(patients),
                Err(e) => {
                    tracing::error!("Failed to load patients: {}", e);
                    state.set_error(format!("Failed to load patients: {}", e));
                }
            }

            match fields {
                Ok(fields) => state.set_fields(fields),
                Err(e) => {
                    tracing::error!("Failed to load fields: {}", e);
                    state.set_error(format!("Failed to load fields: {}", e));
                }
            }

            state.set_loading(false);
        });
    }

    /// Explicit fetch; returns false when the filters suppressed it
    pub fn fetch(&self) -> bool {
        self.dispatch(self.state.request_fetch())
    }

    pub fn toggle_mode(&self) -> bool {
        self.dispatch(self.state.toggle_mode())
    }

    pub fn reorder(&self, from: usize, to: isize) -> ChartResult<bool> {
        let ticket = self.state.reorder(from, to)?;
        Ok(self.dispatch(ticket))
    }

    pub fn toggle_field(&self, field_id: FieldId) {
        self.state.toggle_field(field_id);
    }

    fn dispatch(&self, ticket: Option<FetchTicket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };

        let client = self.client.clone();
        let state = self.state;

        spawn_local(async move {
            match client.fetch_exams(&ticket.query).await {
                Ok(rows) => {
                    tracing::debug!(
                        generation = ticket.generation,
                        no_data = rows.is_no_data(),
                        "Received {} exam records",
                        rows.len()
                    );
                    state.apply_response(ticket.generation, rows);
                }
                Err(e) => {
                    tracing::warn!(generation = ticket.generation, "Exam fetch failed: {}", e);
                    state.apply_failure(ticket.generation, e.to_string());
                }
            }
        });

        true
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

pub fn provide_exam_service(state: AppState, config: ServiceConfig) -> ExamService {
    let service = ExamService::with_config(state, config);
    provide_context(service.clone());
    service
}

pub fn use_exam_service() -> ExamService {
    expect_context::<ExamService>()
}
