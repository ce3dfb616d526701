//! # exam-components
//!
//! Leptos UI for the exam chart view: filters, field selection with
//! reordering, the mode toggle, and the panel that hosts chart surfaces.

pub mod chart_panel;
pub mod controls;
pub mod explorer;
pub mod field_picker;

pub use chart_panel::*;
pub use controls::*;
pub use explorer::*;
pub use field_picker::*;
