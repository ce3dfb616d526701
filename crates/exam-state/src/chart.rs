//! Chart pipeline state and the render-phase machine
//!
//! [`ChartState`] is the whole user-controlled input of a render pass.
//! [`ChartController`] owns it together with the request generation used to
//! drop responses that arrive after a newer request was issued.

use exam_charts::{SurfaceSpec, plan_surfaces};
use exam_core::{
    ChartMode, ChartResult, Dataset, DateRange, ExamQuery, ExamRows, FieldCatalog, FieldId,
    FieldOrder, PatientId, Selection, assign_datasets, extract_series,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// STATE RECORD
// ============================================================================

/// Everything the user picked that feeds a render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub patient: Option<PatientId>,
    pub range: DateRange,
    /// Catalog ordering and selection, reordered in lockstep
    pub fields: FieldOrder,
    pub mode: ChartMode,
}

impl ChartState {
    pub fn selection(&self) -> &Selection {
        &self.fields.selection
    }

    /// The query this state would issue, if every filter is set
    pub fn query(&self) -> Option<ExamQuery> {
        ExamQuery::build(self.patient.as_ref(), self.selection(), self.range)
    }
}

// ============================================================================
// PHASES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderPhase {
    /// No data requested
    #[default]
    Idle,
    FetchPending,
    DataReady,
    Rendered,
}

impl RenderPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::FetchPending => "Loading…",
            Self::DataReady => "Rendering…",
            Self::Rendered => "Ready",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Idle => "phase-idle",
            Self::FetchPending => "phase-pending",
            Self::DataReady => "phase-ready",
            Self::Rendered => "phase-rendered",
        }
    }
}

/// Permission to issue one request; its generation identifies the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ExamQuery,
}

/// Render-ready output of one resolved fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub generation: u64,
    pub mode: ChartMode,
    pub datasets: Vec<Dataset>,
    /// Extent of every distinct exam date in the response
    pub timeline: Option<(i64, i64)>,
}

impl RenderPlan {
    pub fn surface_count(&self) -> usize {
        self.mode.surface_count(self.datasets.len())
    }

    pub fn surfaces(&self) -> Vec<SurfaceSpec> {
        plan_surfaces(self.datasets.clone(), self.mode, self.timeline)
    }
}

/// Pure extraction and assignment for one response.
///
/// A `NoData` response plans no datasets: no surface in separate mode and a
/// single empty one in combined mode.
pub fn build_plan(
    generation: u64,
    rows: &ExamRows,
    state: &ChartState,
    catalog: &FieldCatalog,
) -> ChartResult<RenderPlan> {
    if rows.is_no_data() {
        return Ok(RenderPlan {
            generation,
            mode: state.mode,
            datasets: Vec::new(),
            timeline: None,
        });
    }

    let extraction = extract_series(rows.records(), state.selection(), catalog)?;
    let timeline = extraction.timeline_range();

    Ok(RenderPlan {
        generation,
        mode: state.mode,
        datasets: assign_datasets(extraction.series, state.mode),
        timeline,
    })
}

// ============================================================================
// CONTROLLER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartController {
    state: ChartState,
    phase: RenderPhase,
    generation: u64,
}

impl ChartController {
    pub fn new(state: ChartState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> ChartMode {
        self.state.mode
    }

    /// Issue a fetch if every filter is present and valid.
    ///
    /// On success the generation advances, so any response still in flight
    /// becomes stale. When the guard fails nothing is issued and the phase
    /// only changes if a superseded fetch was pending.
    pub fn request_fetch(&mut self) -> Option<FetchTicket> {
        let Some(query) = self.state.query() else {
            tracing::debug!("Fetch suppressed: filters incomplete or invalid");
            self.cancel_pending();
            return None;
        };

        self.generation += 1;
        self.phase = RenderPhase::FetchPending;
        tracing::info!(
            generation = self.generation,
            "Fetching exams for {} ({})",
            query.patient_id,
            query.selection.join(",")
        );

        Some(FetchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Accept a response. Stale responses yield `Ok(None)` and change nothing.
    pub fn resolve(
        &mut self,
        generation: u64,
        rows: &ExamRows,
        catalog: &FieldCatalog,
    ) -> ChartResult<Option<RenderPlan>> {
        if !self.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale exam response"
            );
            return Ok(None);
        }

        self.phase = RenderPhase::DataReady;
        match build_plan(generation, rows, &self.state, catalog) {
            Ok(plan) => Ok(Some(plan)),
            Err(e) => {
                self.phase = RenderPhase::Idle;
                Err(e)
            }
        }
    }

    /// A current request failed; returns false if it was already stale
    pub fn fail(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.phase = RenderPhase::Idle;
        true
    }

    /// The pool mounted the plan of `generation`
    pub fn mark_rendered(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != RenderPhase::DataReady {
            return false;
        }
        self.phase = RenderPhase::Rendered;
        true
    }

    /// The pool could not mount the plan of `generation`
    pub fn render_failed(&mut self, generation: u64) {
        if generation == self.generation && self.phase == RenderPhase::DataReady {
            self.phase = RenderPhase::Idle;
        }
    }

    /// Flip the mode and re-run the pipeline
    pub fn toggle_mode(&mut self) -> Option<FetchTicket> {
        self.state.mode = self.state.mode.toggle();
        tracing::info!("Chart mode switched to {}", self.state.mode);
        self.request_fetch()
    }

    /// Move a field in the catalog and the selection, then re-run the pipeline
    pub fn reorder(&mut self, from: usize, to: isize) -> ChartResult<Option<FetchTicket>> {
        self.state.fields.reorder(from, to)?;
        tracing::debug!(from, to, "Reordered fields to {}", self.state.selection().join(","));
        Ok(self.request_fetch())
    }

    pub fn set_catalog_order(&mut self, catalog: Vec<FieldId>) {
        self.state.fields.catalog = catalog;
    }

    pub fn set_patient(&mut self, patient: Option<PatientId>) {
        self.state.patient = patient;
        self.cancel_pending();
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.state.range = range;
        self.cancel_pending();
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.state.fields.selection = selection;
        self.cancel_pending();
    }

    pub fn toggle_field(&mut self, field_id: FieldId) {
        self.state.fields.selection.toggle(field_id);
        self.cancel_pending();
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.phase == RenderPhase::FetchPending
    }

    /// Drop interest in the in-flight response, if any
    fn cancel_pending(&mut self) {
        if self.phase == RenderPhase::FetchPending {
            self.generation += 1;
            self.phase = RenderPhase::Idle;
            tracing::debug!(generation = self.generation, "Cancelled pending fetch");
        }
    }
}
