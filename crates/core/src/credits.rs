//! Credit gating and the reference cost formula.
//!
//! The authoritative estimate comes from the estimator collaborator; the
//! formula here mirrors it (video: seconds times the model rate, image: one
//! rate unit per scene) for offline previews and tests. The generate gate
//! hard-blocks whenever the current balance is below the estimate, even a
//! stale one.

use crate::error::CoreError;
use crate::scenario::OutputType;

// ---------------------------------------------------------------------------
// Shortfall
// ---------------------------------------------------------------------------

/// How many credits are missing to cover `required`. Zero when covered.
pub fn credit_shortfall(required: i64, available: i64) -> i64 {
    (required - available).max(0)
}

// ---------------------------------------------------------------------------
// Generate gate
// ---------------------------------------------------------------------------

/// Validate the preconditions of the generate transition.
///
/// - A model must be selected.
/// - At least one scene must exist.
/// - The balance must cover the estimate; `available == required` passes.
pub fn validate_generate_ready(
    model_selected: bool,
    scene_count: usize,
    required_credits: i64,
    available_credits: i64,
) -> Result<(), CoreError> {
    if !model_selected {
        return Err(CoreError::Validation(
            "A generation model must be selected before generating".to_string(),
        ));
    }
    if scene_count == 0 {
        return Err(CoreError::Validation(
            "At least one scene is required before generating".to_string(),
        ));
    }
    if available_credits < required_credits {
        return Err(CoreError::InsufficientCredits {
            required: required_credits,
            available: available_credits,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference cost formula
// ---------------------------------------------------------------------------

/// Total credit cost for a scene list at a model-specific rate.
///
/// Video is billed per second of requested duration; image is billed per
/// scene.
pub fn estimate_total_credits(
    output_type: OutputType,
    durations_secs: &[u32],
    rate: i64,
) -> i64 {
    match output_type {
        OutputType::Video => durations_secs.iter().map(|&d| d as i64).sum::<i64>() * rate,
        OutputType::Image => durations_secs.len() as i64 * rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- credit_shortfall --

    #[test]
    fn shortfall_when_under() {
        assert_eq!(credit_shortfall(210, 100), 110);
    }

    #[test]
    fn shortfall_zero_when_exact() {
        assert_eq!(credit_shortfall(100, 100), 0);
    }

    #[test]
    fn shortfall_zero_when_over() {
        assert_eq!(credit_shortfall(100, 500), 0);
    }

    // -- validate_generate_ready --

    #[test]
    fn ready_with_exact_balance() {
        assert!(validate_generate_ready(true, 2, 100, 100).is_ok());
    }

    #[test]
    fn blocked_one_credit_short() {
        assert_matches!(
            validate_generate_ready(true, 2, 100, 99),
            Err(CoreError::InsufficientCredits {
                required: 100,
                available: 99
            })
        );
    }

    #[test]
    fn blocked_without_model() {
        assert_matches!(
            validate_generate_ready(false, 2, 0, 100),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn blocked_without_scenes() {
        assert_matches!(
            validate_generate_ready(true, 0, 0, 100),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn insufficiency_message_names_the_shortfall() {
        let err = validate_generate_ready(true, 1, 210, 100).unwrap_err();
        assert!(err.to_string().contains("110"));
    }

    // -- estimate_total_credits --

    #[test]
    fn video_cost_is_seconds_times_rate() {
        // 6 + 15 = 21 seconds at 10 credits/sec.
        assert_eq!(
            estimate_total_credits(OutputType::Video, &[6, 15], 10),
            210
        );
    }

    #[test]
    fn image_cost_is_per_scene() {
        assert_eq!(estimate_total_credits(OutputType::Image, &[0, 0, 0], 25), 75);
    }

    #[test]
    fn empty_scene_list_costs_nothing() {
        assert_eq!(estimate_total_credits(OutputType::Video, &[], 10), 0);
        assert_eq!(estimate_total_credits(OutputType::Image, &[], 10), 0);
    }
}
