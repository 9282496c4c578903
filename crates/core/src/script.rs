//! Script input validation.
//!
//! The parse transition is only reachable for scripts within the length
//! bounds, and at most [`MAX_REFERENCE_IMAGES`] images may accompany a
//! parse request. Lengths are counted in characters, not bytes, since
//! scripts are routinely non-ASCII.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Minimum script length in characters.
pub const MIN_SCRIPT_CHARS: usize = 10;

/// Maximum script length in characters.
pub const MAX_SCRIPT_CHARS: usize = 10_000;

/// Maximum number of reference images attached to a parse request.
pub const MAX_REFERENCE_IMAGES: usize = 10;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a script is within the allowed length bounds.
pub fn validate_script(script: &str) -> Result<(), CoreError> {
    let len = script.chars().count();
    if len < MIN_SCRIPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Script too short: {len} characters, minimum is {MIN_SCRIPT_CHARS}"
        )));
    }
    if len > MAX_SCRIPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Script too long: {len} characters, maximum is {MAX_SCRIPT_CHARS}"
        )));
    }
    Ok(())
}

/// Whether the parse transition is reachable for this script.
pub fn can_parse(script: &str) -> bool {
    validate_script(script).is_ok()
}

/// Validate the number of reference images attached to a parse request.
pub fn validate_reference_image_count(count: usize) -> Result<(), CoreError> {
    if count > MAX_REFERENCE_IMAGES {
        return Err(CoreError::Validation(format!(
            "Too many reference images: {count}, maximum is {MAX_REFERENCE_IMAGES}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
