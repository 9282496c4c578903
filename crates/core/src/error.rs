use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(
        "Insufficient credits: need {} more (required {required}, available {available})",
        .required - .available
    )]
    InsufficientCredits { required: i64, available: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}
