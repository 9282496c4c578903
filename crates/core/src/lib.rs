//! Domain types and pure logic for the script-to-scenes generation workflow.
//!
//! This crate has no I/O. It defines:
//!
//! - [`scenario`] — scenario/scene status enums and the server snapshot
//!   aggregates reflected back during generation.
//! - [`script`] — script length and reference-image-count validation.
//! - [`scene`] — editable scene drafts, duration clamping, and the
//!   contiguous 1-based ordering invariant.
//! - [`credits`] — the generate gate and the reference cost formula.
//! - [`model`] — generation model catalog filtering.
//! - [`character`] — advisory character hints attached to a generation run.
//! - [`settings`] — output settings passed through to the provider.

pub mod character;
pub mod credits;
pub mod error;
pub mod model;
pub mod scenario;
pub mod scene;
pub mod script;
pub mod settings;
pub mod types;

pub use error::CoreError;
