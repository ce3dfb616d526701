//! Main exam chart layout component

use exam_state::use_app_state;
use leptos::prelude::*;

use crate::{ChartControls, ChartPanel, FieldPicker, SelectedFields};

#[component]
pub fn ExamExplorer() -> impl IntoView {
    view! {
        <div class="exam-explorer">
            <header class="explorer-header">
                <h1 class="explorer-title">"Patient Exams Chart"</h1>
                <ChartControls />
            </header>

            <main class="explorer-main">
                <aside class="explorer-sidebar">
                    <FieldPicker />
                </aside>

                <section class="explorer-center">
                    <SelectedFields />
                    <ChartPanel />
                </section>
            </main>

            <footer class="explorer-footer">
                <StatusBar />
            </footer>
        </div>
    }
}

#[component]
fn StatusBar() -> impl IntoView {
    let state = use_app_state();
    let error = state.error;
    let phase = move || state.chart.with(|c| c.phase());

    view! {
        <div class="status-bar">
            <div class="sb-phase">
                <span class="sb-label">"Status:"</span>
                <span class=move || format!("sb-value {}", phase().css_class())>
                    {move || phase().label()}
                </span>
            </div>

            {move || state.is_loading().then(|| view! {
                <div class="sb-loading">"Loading patients and fields…"</div>
            })}

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="sb-error">
                            <span class="error-icon">"⚠"</span>
                            <span class="error-msg">{e}</span>
                        </div>
                    }
                })
            }}

            <div class="sb-version">
                <span>"v0.1.0"</span>
            </div>
        </div>
    }
}
