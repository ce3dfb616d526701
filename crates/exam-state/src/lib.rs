//! # exam-state
//!
//! Reactive state for the exam chart view.
//! The chart pipeline itself lives in [`ChartController`], a plain value;
//! Leptos signals wrap it so the UI re-renders on every transition.

pub mod chart;

pub use chart::*;

use exam_core::{
    ChartResult, DateRange, ExamRows, Field, FieldCatalog, FieldId, PatientId,
};
use leptos::prelude::*;

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global application state with reactive signals
#[derive(Clone, Copy)]
pub struct AppState {
    /// Field metadata from the Data Service
    pub catalog: RwSignal<FieldCatalog>,
    /// Patients available for charting
    pub patients: RwSignal<Vec<PatientId>>,
    /// Chart inputs and render phase
    pub chart: RwSignal<ChartController>,
    /// Latest plan waiting for (or already given to) the surface pool
    pub plan: RwSignal<Option<RenderPlan>>,
    /// Current error message
    pub error: RwSignal<Option<String>>,
    /// Reference data loading
    pub loading: RwSignal<bool>,
}

impl AppState {
    /// Create new application state
    pub fn new() -> Self {
        Self {
            catalog: RwSignal::new(FieldCatalog::default()),
            patients: RwSignal::new(Vec::new()),
            chart: RwSignal::new(ChartController::default()),
            plan: RwSignal::new(None),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    // ========================================================================
    // Reference Data
    // ========================================================================

    /// Replace the field catalog; the catalog ordering restarts from it
    pub fn set_fields(&self, fields: Vec<Field>) {
        let catalog = FieldCatalog::from(fields);
        let order = catalog.ids();
        tracing::info!("Loaded {} fields", catalog.len());
        self.catalog.set(catalog);
        self.chart.update(|c| c.set_catalog_order(order));
    }

    pub fn set_patients(&self, patients: Vec<PatientId>) {
        tracing::info!("Loaded {} patients", patients.len());
        self.patients.set(patients);
    }

    // ========================================================================
    // Chart Inputs
    // ========================================================================

    pub fn select_patient(&self, patient: Option<PatientId>) {
        self.chart.update(|c| c.set_patient(patient));
    }

    pub fn set_range(&self, range: DateRange) {
        self.chart.update(|c| c.set_range(range));
    }

    pub fn toggle_field(&self, field_id: FieldId) {
        self.chart.update(|c| c.toggle_field(field_id));
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Explicit fetch request; `None` means the guard suppressed it
    pub fn request_fetch(&self) -> Option<FetchTicket> {
        self.chart.try_update(ChartController::request_fetch).flatten()
    }

    pub fn toggle_mode(&self) -> Option<FetchTicket> {
        self.chart.try_update(ChartController::toggle_mode).flatten()
    }

    pub fn reorder(&self, from: usize, to: isize) -> ChartResult<Option<FetchTicket>> {
        self.chart
            .try_update(|c| c.reorder(from, to))
            .unwrap_or(Ok(None))
    }

    /// Feed a response back in; a current one becomes the next render plan
    pub fn apply_response(&self, generation: u64, rows: ExamRows) {
        let outcome = self.catalog.with_untracked(|catalog| {
            self.chart
                .try_update(|c| c.resolve(generation, &rows, catalog))
        });

        match outcome {
            Some(Ok(Some(plan))) => {
                tracing::debug!(generation, "Exam data ready, {} datasets", plan.datasets.len());
                self.clear_error();
                self.plan.set(Some(plan));
            }
            Some(Ok(None)) | None => {}
            Some(Err(e)) => {
                tracing::error!("Cannot chart exam data: {}", e);
                self.set_error(e.to_string());
            }
        }
    }

    pub fn apply_failure(&self, generation: u64, message: impl Into<String>) {
        let current = self.chart.try_update(|c| c.fail(generation)).unwrap_or(false);
        if current {
            self.set_error(message);
        }
    }

    pub fn mark_rendered(&self, generation: u64) {
        self.chart.update(|c| {
            c.mark_rendered(generation);
        });
    }

    pub fn render_failed(&self, generation: u64, message: impl Into<String>) {
        self.chart.update(|c| c.render_failed(generation));
        self.set_error(message);
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Set error message
    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
    }

    /// Clear error
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    // ========================================================================
    // Loading State
    // ========================================================================

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide app state context to component tree
pub fn provide_app_state() -> AppState {
    let state = AppState::new();
    provide_context(state);
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
