//! Output settings passed through to the generation provider.

use serde::{Deserialize, Serialize};

/// Settings attached to estimate and create requests.
///
/// The provider interprets these; the wizard only carries them. Changing
/// any of them invalidates the current credit estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Output resolution label, e.g. `"720p"`.
    pub resolution: String,
    /// Aspect ratio, e.g. `"16:9"`.
    pub aspect_ratio: String,
    /// Whether generated video clips include audio.
    pub audio_enabled: bool,
    /// Ask the provider to keep character appearance consistent across
    /// scenes by chaining frames. Advisory; passed through verbatim.
    pub frame_chain_mode: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            resolution: "720p".to_string(),
            aspect_ratio: "16:9".to_string(),
            audio_enabled: false,
            frame_chain_mode: false,
        }
    }
}
