//! # exam-client
//!
//! HTTP client for the external Data Service and the glue that runs fetch
//! tickets against it, feeding results back into the reactive state.

pub mod client;
pub mod service;

pub use client::*;
pub use service::*;

/// Same-origin by default; the page is served next to the Data Service
pub const DEFAULT_BASE_URL: &str = "";

// ============================================================================
// SERVICE CONFIGURATION
// ============================================================================

/// Data Service location and endpoint paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub patients_path: String,
    pub fields_path: String,
    pub exams_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            patients_path: "/patient/get-all".to_string(),
            fields_path: "/fields/get-all".to_string(),
            exams_path: "/eav/get-specific-exams".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn patients(mut self, path: impl Into<String>) -> Self {
        self.patients_path = path.into();
        self
    }

    pub fn fields(mut self, path: impl Into<String>) -> Self {
        self.fields_path = path.into();
        self
    }

    pub fn exams(mut self, path: impl Into<String>) -> Self {
        self.exams_path = path.into();
        self
    }

    /// Absolute (or same-origin) URL of an endpoint path
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
