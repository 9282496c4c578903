//! The script-to-scenes scenario wizard.
//!
//! Orchestrates one generation run end to end:
//! input → parse → scene editing → generate → status polling → terminal.
//!
//! - [`ScenarioWizard`] — the phase-guarded state machine.
//! - [`StatusPoller`] — the cancellable fixed-interval status loop.
//! - [`WizardError`] — layered error type wrapping domain and transport
//!   failures.

pub mod error;
pub mod poller;
pub mod wizard;

pub use error::WizardError;
pub use poller::{PollOutcome, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use wizard::{ScenarioWizard, WizardPhase};
