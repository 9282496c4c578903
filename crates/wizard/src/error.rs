use reelkit_client::ApiError;
use reelkit_core::CoreError;

/// Errors surfaced by wizard operations.
///
/// Validation failures and collaborator rejections keep the wizard in its
/// current phase; callers surface the message and let the user re-trigger.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// An operation was triggered from a phase that does not allow it.
    #[error("Cannot {action} while the wizard is in the {phase} phase")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },

    /// A domain validation error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collaborator call failed or was rejected by the server.
    #[error(transparent)]
    Backend(#[from] ApiError),
}
