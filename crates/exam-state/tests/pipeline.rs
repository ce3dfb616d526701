//! End-to-end pipeline: state record -> fetch ticket -> records -> plan -> surfaces

use chrono::NaiveDate;
use exam_charts::{ChartInstancePool, SurfaceHost, SurfaceSpec};
use exam_core::{
    AxisPosition, ChartMode, ChartResult, DateRange, ExamRows, Field, FieldCatalog, FieldOrder,
    PatientId, Selection, colors, decode_exam_rows,
};
use exam_state::{ChartController, ChartState, RenderPhase};
use serde_json::json;

/// Counts attached surfaces, nothing else
#[derive(Default)]
struct CountingHost {
    attached: Vec<String>,
    created: usize,
}

impl SurfaceHost for CountingHost {
    type Handle = String;

    fn create(&mut self, spec: &SurfaceSpec) -> ChartResult<String> {
        self.created += 1;
        self.attached.push(spec.id());
        Ok(spec.id())
    }

    fn destroy(&mut self, handle: String) -> ChartResult<()> {
        self.attached.retain(|id| *id != handle);
        Ok(())
    }

    fn clear_container(&mut self) -> ChartResult<()> {
        self.attached.clear();
        Ok(())
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn catalog() -> FieldCatalog {
    FieldCatalog::from(vec![
        Field::new("A", "Field A", "mg/dL"),
        Field::new("B", "Field B", "%"),
        Field::new("C", "Field C", "U/L"),
    ])
}

fn controller(selection: &[&str], mode: ChartMode) -> ChartController {
    ChartController::new(ChartState {
        patient: Some(PatientId::from("42")),
        range: DateRange::new(date("2024-01-01"), date("2024-01-31")),
        fields: FieldOrder::new(catalog().ids(), Selection::from_ids(selection.iter().copied())),
        mode,
    })
}

/// The Data Service response for the reference example
fn response() -> ExamRows {
    let body = json!([
        { "id": { "exam_date": "2024-01-01" }, "field": { "field_id": "A" }, "val": 5 },
        { "id": { "exam_date": "2024-01-02" }, "field": { "field_id": "A" }, "val": 7 },
        { "id": { "exam_date": "2024-01-01" }, "field": { "field_id": "B" }, "val": 2 },
    ]);
    decode_exam_rows(body, &PatientId::from("42")).unwrap()
}

#[test]
fn test_reference_example() {
    let mut chart = controller(&["A", "B"], ChartMode::Combined);
    let ticket = chart.request_fetch().unwrap();
    let plan = chart
        .resolve(ticket.generation, &response(), &catalog())
        .unwrap()
        .unwrap();

    let a = &plan.datasets[0];
    let b = &plan.datasets[1];

    let a_points: Vec<_> = a
        .series
        .points
        .iter()
        .map(|p| (p.timestamp.date_naive(), p.value))
        .collect();
    assert_eq!(a_points, vec![(date("2024-01-01"), 5.0), (date("2024-01-02"), 7.0)]);

    let b_points: Vec<_> = b
        .series
        .points
        .iter()
        .map(|p| (p.timestamp.date_naive(), p.value))
        .collect();
    assert_eq!(b_points, vec![(date("2024-01-01"), 2.0)]);

    assert_eq!(a.color, colors::PALETTE[0]);
    assert_eq!(a.axis_id().as_deref(), Some("axis-0"));
    assert_eq!(a.axis.position, AxisPosition::Left);

    assert_eq!(b.color, colors::PALETTE[1]);
    assert_eq!(b.axis_id().as_deref(), Some("axis-1"));
    assert_eq!(b.axis.position, AxisPosition::Right);
}

#[test]
fn test_render_twice_is_idempotent() {
    let tuples = || {
        let mut chart = controller(&["A", "B", "C"], ChartMode::Combined);
        let ticket = chart.request_fetch().unwrap();
        let plan = chart
            .resolve(ticket.generation, &response(), &catalog())
            .unwrap()
            .unwrap();
        plan.datasets
            .iter()
            .map(|d| (d.color, d.axis_id(), d.series.values().collect::<Vec<_>>()))
            .collect::<Vec<_>>()
    };

    assert_eq!(tuples(), tuples());
}

#[test]
fn test_stale_response_is_discarded() {
    let mut chart = controller(&["A", "B"], ChartMode::Combined);
    let slow = chart.request_fetch().unwrap();
    let fresh = chart.toggle_mode().unwrap();

    let plan = chart
        .resolve(fresh.generation, &response(), &catalog())
        .unwrap()
        .unwrap();
    assert_eq!(plan.mode, ChartMode::Separate);

    // the superseded response shows up late
    assert_eq!(chart.resolve(slow.generation, &response(), &catalog()), Ok(None));
    assert_eq!(chart.phase(), RenderPhase::DataReady);
}

#[test]
fn test_empty_selection_creates_nothing() {
    let mut chart = controller(&[], ChartMode::Separate);
    let mut pool = ChartInstancePool::new(CountingHost::default());

    assert!(chart.request_fetch().is_none());
    assert_eq!(chart.phase(), RenderPhase::Idle);
    assert_eq!(pool.live_count(), 0);
    assert_eq!(pool.host().created, 0);

    // toggling the mode re-runs the guard, still nothing
    assert!(chart.toggle_mode().is_none());
    assert_eq!(pool.render(&[]).unwrap(), 0);
}

#[test]
fn test_surface_count_follows_mode() {
    let selection = ["A", "B", "C"];
    let mut chart = controller(&selection, ChartMode::Separate);
    let mut pool = ChartInstancePool::new(CountingHost::default());

    for expected in [selection.len(), 1, selection.len()] {
        let ticket = chart.request_fetch().unwrap();
        let plan = chart
            .resolve(ticket.generation, &response(), &catalog())
            .unwrap()
            .unwrap();

        let live = pool.render(&plan.surfaces()).unwrap();
        assert!(chart.mark_rendered(plan.generation));

        assert_eq!(live, expected);
        assert_eq!(plan.surface_count(), expected);
        assert_eq!(pool.host().attached.len(), expected);
        assert_eq!(chart.phase(), RenderPhase::Rendered);

        let toggled = chart.toggle_mode().unwrap();
        assert_eq!(chart.phase(), RenderPhase::FetchPending);
        assert_eq!(toggled.generation, plan.generation + 1);
    }

    // every pass replaced the previous one instead of adding to it
    assert_eq!(pool.host().created, 3 + 1 + 3);
}

#[test]
fn test_reorder_changes_colors_and_axes() {
    let mut chart = controller(&["A", "B"], ChartMode::Combined);
    let ticket = chart.reorder(1, 0).unwrap().unwrap();
    let plan = chart
        .resolve(ticket.generation, &response(), &catalog())
        .unwrap()
        .unwrap();

    assert_eq!(plan.datasets[0].series.field_id.as_str(), "B");
    assert_eq!(plan.datasets[0].color, colors::PALETTE[0]);
    assert_eq!(plan.datasets[0].axis_id().as_deref(), Some("axis-0"));
}

#[test]
fn test_reorder_after_render_refetches() {
    let mut chart = controller(&["A", "B"], ChartMode::Separate);
    let ticket = chart.request_fetch().unwrap();
    let plan = chart
        .resolve(ticket.generation, &response(), &catalog())
        .unwrap()
        .unwrap();
    assert!(chart.mark_rendered(plan.generation));

    let reordered = chart.reorder(0, 1).unwrap().unwrap();
    assert_eq!(chart.phase(), RenderPhase::FetchPending);
    assert!(reordered.generation > plan.generation);
    assert_eq!(reordered.query.selection.join(","), "B,A");
}

#[test]
fn test_non_array_body_draws_no_separate_surfaces() {
    let render = |body: serde_json::Value, mode: ChartMode| {
        let mut chart = controller(&["A", "B", "C"], mode);
        let mut pool = ChartInstancePool::new(CountingHost::default());
        let ticket = chart.request_fetch().unwrap();
        let rows = decode_exam_rows(body, &PatientId::from("42")).unwrap();
        let plan = chart
            .resolve(ticket.generation, &rows, &catalog())
            .unwrap()
            .unwrap();
        let live = pool.render(&plan.surfaces()).unwrap();
        assert!(chart.mark_rendered(plan.generation));
        (plan.datasets.len(), live)
    };

    // not an array: nothing to chart
    assert_eq!(render(json!({ "error": "no data" }), ChartMode::Separate), (0, 0));
    assert_eq!(render(json!({ "error": "no data" }), ChartMode::Combined), (0, 1));

    // an empty array still yields one empty series per selected field
    assert_eq!(render(json!([]), ChartMode::Separate), (3, 3));
    assert_eq!(render(json!([]), ChartMode::Combined), (3, 1));
}
