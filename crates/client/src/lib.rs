//! HTTP client for the AI studio scenario endpoints.
//!
//! - [`StudioApi`] — `reqwest`-backed client for the five scenario
//!   operations (parse, estimate, create, generate, status).
//! - [`ScenarioBackend`] — the trait seam the wizard depends on, so tests
//!   can substitute a fake collaborator.
//! - [`types`] — request/response wire DTOs.

pub mod api;
pub mod backend;
pub mod types;

pub use api::{ApiError, StudioApi};
pub use backend::ScenarioBackend;
