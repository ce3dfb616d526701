//! Patient, date range, fetch and mode controls

use chrono::NaiveDate;
use exam_client::use_exam_service;
use exam_core::{PatientId, QUERY_DATE_FORMAT};
use exam_state::use_app_state;
use leptos::{ev, prelude::*};

/// Which end of the date range an input edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Start,
    End,
}

impl RangeEnd {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Start Date",
            Self::End => "End Date",
        }
    }
}

/// Parse the value of an `<input type="date">`; empty or partial input is unset
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), QUERY_DATE_FORMAT).ok()
}

#[component]
pub fn ChartControls() -> impl IntoView {
    view! {
        <div class="chart-controls">
            <PatientSelect />
            <DateInput end=RangeEnd::Start />
            <DateInput end=RangeEnd::End />
            <FetchButton />
            <ModeToggle />
        </div>
    }
}

#[component]
fn PatientSelect() -> impl IntoView {
    let state = use_app_state();

    let on_change = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        let patient = (!value.is_empty()).then(|| PatientId::new(value));
        state.select_patient(patient);
    };

    view! {
        <label class="control">
            <span class="control-label">"Patient"</span>
            <select on:change=on_change>
                <option value="">"Select patient"</option>
                {move || {
                    state.patients.get().into_iter().map(|patient| {
                        let id = patient.to_string();
                        let value = id.clone();
                        view! { <option value=value>{id}</option> }
                    }).collect_view()
                }}
            </select>
        </label>
    }
}

#[component]
fn DateInput(end: RangeEnd) -> impl IntoView {
    let state = use_app_state();

    let on_change = move |ev: ev::Event| {
        let date = parse_date_input(&event_target_value(&ev));
        let mut range = state.chart.with_untracked(|c| c.state().range);
        match end {
            RangeEnd::Start => range.start = date,
            RangeEnd::End => range.end = date,
        }
        state.set_range(range);
    };

    view! {
        <label class="control">
            <span class="control-label">{end.label()}</span>
            <input type="date" on:change=on_change />
        </label>
    }
}

#[component]
fn FetchButton() -> impl IntoView {
    let service = StoredValue::new(use_exam_service());

    let on_click = move |_: ev::MouseEvent| {
        if !service.with_value(|s| s.fetch()) {
            tracing::debug!("Fetch button: filters incomplete, nothing requested");
        }
    };

    view! {
        <button class="btn btn-primary" on:click=on_click>"Fetch Data"</button>
    }
}

#[component]
fn ModeToggle() -> impl IntoView {
    let state = use_app_state();
    let service = StoredValue::new(use_exam_service());

    view! {
        <button
            class="btn btn-secondary"
            on:click=move |_| {
                service.with_value(|s| s.toggle_mode());
            }
        >
            {move || state.chart.with(|c| c.mode().toggle_label())}
        </button>
    }
}
