//! Patient exam charts, browser entry point

use exam_client::{ServiceConfig, provide_exam_service};
use exam_components::ExamExplorer;
use exam_state::provide_app_state;
use leptos::prelude::*;
use tracing_subscriber::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfig::default()))
        .init();

    tracing::info!("Starting exam charts v{}", env!("CARGO_PKG_VERSION"));
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let state = provide_app_state();
    let service = provide_exam_service(state, ServiceConfig::default());
    service.load_reference_data();

    view! { <ExamExplorer /> }
}
