//! Request and response wire types for the scenario endpoints.
//!
//! Every response carries a `success` flag plus an optional server-provided
//! `message`; payload fields are only trusted when `success` is true. The
//! conversion from envelope to `Result` lives in [`crate::api`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use reelkit_core::character::Character;
use reelkit_core::scenario::{OutputType, Scenario};
use reelkit_core::scene::{ReferenceImage, SceneDraft};
use reelkit_core::settings::GenerationSettings;

// ---------------------------------------------------------------------------
// Image payloads
// ---------------------------------------------------------------------------

/// A reference image as it travels in a request body: base64-encoded bytes
/// plus the original file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUpload {
    pub name: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageUpload {
    /// Encode a client-owned image blob for transmission.
    pub fn from_reference(image: &ReferenceImage) -> Self {
        Self {
            name: image.name.clone(),
            data: BASE64.encode(&image.bytes),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// `POST /ai-studio/scenarios/parse`
#[derive(Debug, Clone, Serialize)]
pub struct ParseScriptRequest {
    pub script: String,
    pub output_type: OutputType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageUpload>,
}

/// One scene descriptor in the parser's output order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedScene {
    pub description: String,
    pub prompt: String,
    /// Suggested duration in seconds; only present for video output.
    pub duration_secs: Option<u32>,
}

/// Payload of a successful parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseData {
    pub scenes: Vec<ParsedScene>,
    /// Parser-suggested scenario title.
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseResponse {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<ParseData>,
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

/// One scene row in an estimate request. Prompt and duration only; the
/// estimator never needs binary payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSceneRow {
    pub prompt: String,
    pub duration_secs: u32,
}

impl EstimateSceneRow {
    pub fn from_draft(draft: &SceneDraft) -> Self {
        Self {
            prompt: draft.prompt.clone(),
            duration_secs: draft.duration_secs,
        }
    }
}

/// `POST /ai-studio/scenarios/estimate`
#[derive(Debug, Clone, Serialize)]
pub struct EstimateRequest {
    pub model: String,
    pub output_type: OutputType,
    pub scenes: Vec<EstimateSceneRow>,
    pub settings: GenerationSettings,
}

#[derive(Debug, Deserialize)]
pub struct EstimateResponse {
    pub success: bool,
    pub message: Option<String>,
    pub total_credits: Option<i64>,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// One scene in a create request, including its optional base64 source
/// image.
#[derive(Debug, Clone, Serialize)]
pub struct SceneUpload {
    pub order: u32,
    pub description: String,
    pub prompt: String,
    pub duration_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
}

impl SceneUpload {
    pub fn from_draft(draft: &SceneDraft) -> Self {
        Self {
            order: draft.order,
            description: draft.description.clone(),
            prompt: draft.prompt.clone(),
            duration_secs: draft.duration_secs,
            source_image: draft.image.as_ref().map(|img| BASE64.encode(&img.bytes)),
        }
    }
}

/// `POST /ai-studio/scenarios`
#[derive(Debug, Clone, Serialize)]
pub struct CreateScenarioRequest {
    pub script: String,
    pub title: Option<String>,
    pub output_type: OutputType,
    pub model: String,
    pub scenes: Vec<SceneUpload>,
    pub settings: GenerationSettings,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<Character>,
}

// ---------------------------------------------------------------------------
// Scenario envelope (create / generate / status)
// ---------------------------------------------------------------------------

/// Shared response shape for the create, generate, and status calls: a
/// success flag plus the current scenario snapshot.
#[derive(Debug, Deserialize)]
pub struct ScenarioResponse {
    pub success: bool,
    pub message: Option<String>,
    pub scenario: Option<Scenario>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use reelkit_core::scene::{ParsedSceneContent, number_scenes};

    fn draft_with_image() -> SceneDraft {
        let mut scenes = number_scenes(
            vec![ParsedSceneContent {
                description: "sunrise".to_string(),
                prompt: "a sunrise over hills".to_string(),
                duration_secs: None,
            }],
            OutputType::Video,
        );
        scenes[0].image = Some(ReferenceImage {
            name: "ref.png".to_string(),
            bytes: vec![1, 2, 3],
        });
        scenes.remove(0)
    }

    #[test]
    fn image_upload_encodes_base64() {
        let upload = ImageUpload::from_reference(&ReferenceImage {
            name: "ref.png".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert_eq!(upload.name, "ref.png");
        assert_eq!(upload.data, "AQID");
    }

    #[test]
    fn scene_upload_carries_base64_source_image() {
        let upload = SceneUpload::from_draft(&draft_with_image());
        assert_eq!(upload.order, 1);
        assert_eq!(upload.source_image.as_deref(), Some("AQID"));
    }

    #[test]
    fn scene_upload_omits_missing_image() {
        let mut draft = draft_with_image();
        draft.image = None;
        let json = serde_json::to_value(SceneUpload::from_draft(&draft)).unwrap();
        assert!(json.get("source_image").is_none());
    }

    #[test]
    fn parse_request_omits_empty_image_list() {
        let request = ParseScriptRequest {
            script: "a script long enough".to_string(),
            output_type: OutputType::Video,
            images: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("images").is_none());
        assert_eq!(json["output_type"], "video");
    }

    #[test]
    fn estimate_row_from_draft_strips_binary() {
        let row = EstimateSceneRow::from_draft(&draft_with_image());
        assert_eq!(row.duration_secs, 6);
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("source_image").is_none());
    }
}
