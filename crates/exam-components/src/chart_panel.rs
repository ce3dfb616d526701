//! Panel owning the chart surface container
//!
//! The container `<div>` has no Leptos children: only the surface pool adds
//! or removes nodes in it.

use exam_charts::{ChartInstancePool, DomSurfaceHost, SurfaceConfig};
use exam_state::use_app_state;
use leptos::{html, prelude::*};

#[component]
pub fn ChartPanel(#[prop(optional)] config: Option<SurfaceConfig>) -> impl IntoView {
    let state = use_app_state();
    let config = config.unwrap_or_default();
    let container = NodeRef::<html::Div>::new();
    let pool = StoredValue::new_local(None::<ChartInstancePool<DomSurfaceHost>>);

    Effect::new(move |_| {
        let Some(node) = container.get() else {
            return;
        };
        let Some(plan) = state.plan.get() else {
            return;
        };

        let specs = plan.surfaces();
        let config = config.clone();
        // Surface components must not subscribe this effect to their signals
        let outcome = untrack(|| {
            pool.try_update_value(|slot| {
                slot.get_or_insert_with(|| {
                    ChartInstancePool::new(DomSurfaceHost::new(node.into(), config))
                })
                .render(&specs)
            })
        });

        match outcome {
            Some(Ok(live)) => {
                tracing::debug!(generation = plan.generation, "Chart panel shows {} surfaces", live);
                state.mark_rendered(plan.generation);
            }
            Some(Err(e)) => {
                tracing::error!("Chart render failed: {}", e);
                state.render_failed(plan.generation, format!("Chart render failed: {}", e));
            }
            None => {}
        }
    });

    on_cleanup(move || {
        pool.try_update_value(|slot| {
            if let Some(mut pool) = slot.take() {
                if let Err(e) = pool.teardown() {
                    tracing::warn!("Chart panel teardown failed: {}", e);
                }
            }
        });
    });

    let mode_class = move || {
        state
            .chart
            .with(|c| format!("chart-panel {}", c.mode().css_class()))
    };

    view! {
        <section class=mode_class>
            <div class="chart-container" node_ref=container></div>
        </section>
    }
}
