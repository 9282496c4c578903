//! Generation model catalog.
//!
//! The model list is provider-supplied; the wizard only offers entries that
//! are enabled and not flagged as coming soon.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scenario::OutputType;

// ---------------------------------------------------------------------------
// ModelInfo
// ---------------------------------------------------------------------------

/// One entry from the provider-supplied model catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider model identifier, e.g. `"kling-v1.6"`.
    pub id: String,
    /// Human-readable label for display.
    pub label: String,
    /// Credit cost rate: per second for video, per scene for image output.
    pub credits_cost: i64,
    /// Output types this model can produce.
    pub output_types: Vec<OutputType>,
    pub enabled: bool,
    pub coming_soon: bool,
}

impl ModelInfo {
    /// Whether the wizard may offer this model for selection.
    pub fn is_selectable(&self) -> bool {
        self.enabled && !self.coming_soon
    }

    /// Whether this model can produce the given output type.
    pub fn supports(&self, output_type: OutputType) -> bool {
        self.output_types.contains(&output_type)
    }
}

// ---------------------------------------------------------------------------
// Catalog helpers
// ---------------------------------------------------------------------------

/// Filter a catalog down to the models the wizard may offer.
pub fn selectable_models<'a>(
    models: &'a [ModelInfo],
    output_type: OutputType,
) -> impl Iterator<Item = &'a ModelInfo> {
    models
        .iter()
        .filter(move |m| m.is_selectable() && m.supports(output_type))
}

/// Look up a model by id, requiring it to be selectable.
pub fn find_selectable<'a>(models: &'a [ModelInfo], id: &str) -> Result<&'a ModelInfo, CoreError> {
    let model = models
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| CoreError::Validation(format!("Unknown model '{id}'")))?;
    if !model.is_selectable() {
        return Err(CoreError::Validation(format!(
            "Model '{id}' is not available for selection"
        )));
    }
    Ok(model)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
