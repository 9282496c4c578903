//! Scenario and scene status enums plus the server snapshot aggregates.
//!
//! During generation the studio server is the sole source of truth: every
//! status poll returns a full [`Scenario`] snapshot that replaces the local
//! copy wholesale (last-write-wins, never a merge).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Output type
// ---------------------------------------------------------------------------

/// What the generation run produces: one video clip or one image per scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    #[default]
    Video,
    Image,
}

impl OutputType {
    /// Parse an output type from its API string.
    pub fn from_str_api(s: &str) -> Result<Self, CoreError> {
        match s {
            "video" => Ok(Self::Video),
            "image" => Ok(Self::Image),
            _ => Err(CoreError::Validation(format!(
                "Invalid output type '{s}'. Must be one of: video, image"
            ))),
        }
    }

    /// Convert to the API string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario status
// ---------------------------------------------------------------------------

/// Lifecycle status of a scenario.
///
/// `draft` is client-only (not yet persisted); the server moves a scenario
/// from `generating` into exactly one of the three terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Draft,
    Generating,
    Completed,
    Partial,
    Failed,
}

impl ScenarioStatus {
    /// Parse a status string from the API.
    pub fn from_str_api(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "generating" => Ok(Self::Generating),
            "completed" => Ok(Self::Completed),
            "partial" => Ok(Self::Partial),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::Validation(format!(
                "Invalid scenario status '{s}'. Must be one of: \
                 draft, generating, completed, partial, failed"
            ))),
        }
    }

    /// Convert to the API string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    /// Whether this status ends the generation run. Polling stops on the
    /// first terminal status and never resumes without a new generate.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Partial | Self::Failed)
    }
}

// ---------------------------------------------------------------------------
// Scene status
// ---------------------------------------------------------------------------

/// Per-scene generation status, owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneStatus {
    Pending,
    Generating,
    Completed,
    Failed,
}

impl SceneStatus {
    /// Parse a status string from the API.
    pub fn from_str_api(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "generating" => Ok(Self::Generating),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::Validation(format!(
                "Invalid scene status '{s}'. Must be one of: \
                 pending, generating, completed, failed"
            ))),
        }
    }

    /// Convert to the API string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Server snapshots
// ---------------------------------------------------------------------------

/// One scene as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: DbId,
    /// 1-based position within the scenario. Fixed at parse time.
    pub order: u32,
    pub description: String,
    pub prompt: String,
    /// Seconds; only meaningful for video output.
    pub duration_secs: Option<u32>,
    pub status: SceneStatus,
    /// Set once the provider finishes this scene.
    pub result_url: Option<String>,
    /// Set when the provider fails this scene.
    pub error_message: Option<String>,
}

/// The persisted scenario aggregate as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: DbId,
    pub title: Option<String>,
    /// The source script the scenario was created from.
    pub script: Option<String>,
    pub output_type: OutputType,
    pub model: String,
    pub status: ScenarioStatus,
    pub total_scenes: u32,
    pub completed_scenes: u32,
    /// Aggregate progress, 0..=100.
    pub progress: u8,
    /// Ordered by `order` ascending; orders are exactly `1..=total_scenes`.
    pub scenes: Vec<Scene>,
    /// Server-side creation time; absent before the scenario is persisted.
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- OutputType --

    #[test]
    fn output_type_default_is_video() {
        assert_eq!(OutputType::default(), OutputType::Video);
    }

    #[test]
    fn output_type_roundtrip() {
        for ot in [OutputType::Video, OutputType::Image] {
            assert_eq!(OutputType::from_str_api(ot.as_str()).unwrap(), ot);
        }
    }

    #[test]
    fn output_type_invalid() {
        assert!(OutputType::from_str_api("audio").is_err());
        assert!(OutputType::from_str_api("").is_err());
    }

    // -- ScenarioStatus --

    #[test]
    fn scenario_status_roundtrip() {
        for status in [
            ScenarioStatus::Draft,
            ScenarioStatus::Generating,
            ScenarioStatus::Completed,
            ScenarioStatus::Partial,
            ScenarioStatus::Failed,
        ] {
            assert_eq!(
                ScenarioStatus::from_str_api(status.as_str()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn scenario_status_invalid() {
        assert!(ScenarioStatus::from_str_api("done").is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!ScenarioStatus::Draft.is_terminal());
        assert!(!ScenarioStatus::Generating.is_terminal());
        assert!(ScenarioStatus::Completed.is_terminal());
        assert!(ScenarioStatus::Partial.is_terminal());
        assert!(ScenarioStatus::Failed.is_terminal());
    }

    // -- SceneStatus --

    #[test]
    fn scene_status_roundtrip() {
        for status in [
            SceneStatus::Pending,
            SceneStatus::Generating,
            SceneStatus::Completed,
            SceneStatus::Failed,
        ] {
            assert_eq!(SceneStatus::from_str_api(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn scene_status_invalid() {
        assert!(SceneStatus::from_str_api("error").is_err());
    }

    // -- serde wire form --

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&ScenarioStatus::Generating).unwrap(),
            "\"generating\""
        );
        assert_eq!(
            serde_json::to_string(&SceneStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&OutputType::Video).unwrap(),
            "\"video\""
        );
    }
}
