//! Field selection and ordering
//!
//! `FieldPicker` toggles fields in catalog order; `SelectedFields` shows the
//! selection as chips that can be dragged or nudged to reorder. A reorder
//! moves the same positions in the catalog ordering too.

use exam_client::use_exam_service;
use exam_core::{FieldId, colors};
use exam_state::use_app_state;
use leptos::{ev, prelude::*};

/// Target index for nudging the chip at `index` one step; `None` at the edges
pub fn nudge_target(index: usize, len: usize, forward: bool) -> Option<isize> {
    if forward {
        (index + 1 < len).then(|| index as isize + 1)
    } else {
        (index > 0).then(|| index as isize - 1)
    }
}

#[component]
pub fn FieldPicker() -> impl IntoView {
    let state = use_app_state();

    // (id, label, unit, checked) in catalog order
    let rows = move || {
        state.chart.with(|chart| {
            let fields = &chart.state().fields;
            state.catalog.with(|catalog| {
                catalog
                    .ordered_by(&fields.catalog)
                    .into_iter()
                    .map(|field| {
                        (
                            field.field_id.clone(),
                            field.label().to_string(),
                            field.measurement_unit.clone(),
                            fields.selection.contains(&field.field_id),
                        )
                    })
                    .collect::<Vec<_>>()
            })
        })
    };

    view! {
        <div class="field-picker">
            <div class="panel-header">
                <span class="panel-title">"Fields"</span>
            </div>
            <ul class="field-list">
                {move || {
                    rows().into_iter().map(|(id, label, unit, checked)| {
                        view! { <FieldRow id=id label=label unit=unit checked=checked /> }
                    }).collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
fn FieldRow(id: FieldId, label: String, unit: String, checked: bool) -> impl IntoView {
    let state = use_app_state();
    let field_id = StoredValue::new(id);

    view! {
        <li class="field-row">
            <label>
                <input
                    type="checkbox"
                    prop:checked=checked
                    on:change=move |_: ev::Event| state.toggle_field(field_id.get_value())
                />
                <span class="field-label">{label}</span>
                {(!unit.is_empty()).then(|| view! { <span class="field-unit">{format!("({})", unit)}</span> })}
            </label>
        </li>
    }
}

#[component]
pub fn SelectedFields() -> impl IntoView {
    let state = use_app_state();
    let service = StoredValue::new(use_exam_service());
    let dragging = StoredValue::new(None::<usize>);

    let reorder = move |from: usize, to: isize| {
        if let Err(e) = service.with_value(|s| s.reorder(from, to)) {
            tracing::warn!("Reorder rejected: {}", e);
            state.set_error(e.to_string());
        }
    };

    // (label, color) in selection order
    let chips = move || {
        state.chart.with(|chart| {
            state.catalog.with(|catalog| {
                chart
                    .state()
                    .selection()
                    .iter()
                    .enumerate()
                    .map(|(i, id)| {
                        let label = catalog
                            .get(id)
                            .map(|f| f.label().to_string())
                            .unwrap_or_else(|| id.to_string());
                        (label, colors::palette_color(i))
                    })
                    .collect::<Vec<_>>()
            })
        })
    };

    view! {
        <div class="selected-fields">
            {move || {
                let chips = chips();
                let len = chips.len();
                chips.into_iter().enumerate().map(|(index, (label, color))| {
                    let back = nudge_target(index, len, false);
                    let forward = nudge_target(index, len, true);

                    view! {
                        <span
                            class="field-chip"
                            style=format!("border-color: {}", color)
                            draggable="true"
                            on:dragstart=move |_: ev::DragEvent| dragging.set_value(Some(index))
                            on:dragover=move |ev: ev::DragEvent| ev.prevent_default()
                            on:drop=move |ev: ev::DragEvent| {
                                ev.prevent_default();
                                if let Some(from) = dragging.get_value() {
                                    dragging.set_value(None);
                                    if from != index {
                                        reorder(from, index as isize);
                                    }
                                }
                            }
                        >
                            <button
                                class="chip-nudge"
                                disabled=back.is_none()
                                on:click=move |_: ev::MouseEvent| {
                                    if let Some(to) = back {
                                        reorder(index, to);
                                    }
                                }
                            >
                                "◀"
                            </button>
                            <span class="chip-label" style=format!("color: {}", color)>{label}</span>
                            <button
                                class="chip-nudge"
                                disabled=forward.is_none()
                                on:click=move |_: ev::MouseEvent| {
                                    if let Some(to) = forward {
                                        reorder(index, to);
                                    }
                                }
                            >
                                "▶"
                            </button>
                        </span>
                    }
                }).collect_view()
            }}
        </div>
    }
}
