//! Editable scene drafts and the scene ordering invariant.
//!
//! Scenes are created in bulk from a parser response, numbered `1..=N` at
//! that moment, and the set of orders never changes afterwards: prompt,
//! duration, and image edits are field-level only.

use serde::Serialize;

use crate::error::CoreError;
use crate::scenario::OutputType;

// ---------------------------------------------------------------------------
// Duration bounds
// ---------------------------------------------------------------------------

/// Minimum per-scene duration in seconds (video output).
pub const MIN_SCENE_DURATION_SECS: u32 = 4;

/// Maximum per-scene duration in seconds (video output).
pub const MAX_SCENE_DURATION_SECS: u32 = 15;

/// Default per-scene duration in seconds (video output).
pub const DEFAULT_SCENE_DURATION_SECS: u32 = 6;

/// The parser is expected to emit at most this many scenes regardless of
/// script length. Observed provider behavior, not enforced here.
pub const EXPECTED_MAX_PARSED_SCENES: usize = 10;

/// Clamp a requested scene duration into the allowed range.
pub fn clamp_duration(secs: u32) -> u32 {
    secs.clamp(MIN_SCENE_DURATION_SECS, MAX_SCENE_DURATION_SECS)
}

// ---------------------------------------------------------------------------
// Reference images
// ---------------------------------------------------------------------------

/// A client-owned, ephemeral reference image.
///
/// The bytes live only until the scenario is submitted; they are dropped on
/// replace, clear, and wizard reset so repeated runs do not accumulate blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Scene drafts
// ---------------------------------------------------------------------------

/// One editable scene between parse and generate.
#[derive(Debug, Clone)]
pub struct SceneDraft {
    /// 1-based position, assigned at parse time and never changed.
    pub order: u32,
    /// Human-readable summary produced by the parser.
    pub description: String,
    /// User-editable generation instruction.
    pub prompt: String,
    /// Seconds, within `[4, 15]`. Only meaningful for video output.
    pub duration_secs: u32,
    /// Optional per-scene reference image.
    pub image: Option<ReferenceImage>,
}

/// Raw scene content as produced by the parser, before numbering.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedSceneContent {
    pub description: String,
    pub prompt: String,
    pub duration_secs: Option<u32>,
}

/// Turn a parser response into numbered scene drafts.
///
/// Orders are assigned `1..=N` in the parser's output order. Video scenes
/// without a parser-suggested duration default to
/// [`DEFAULT_SCENE_DURATION_SECS`]; suggested durations are clamped.
pub fn number_scenes(parsed: Vec<ParsedSceneContent>, output_type: OutputType) -> Vec<SceneDraft> {
    parsed
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            let duration_secs = match output_type {
                OutputType::Video => {
                    clamp_duration(content.duration_secs.unwrap_or(DEFAULT_SCENE_DURATION_SECS))
                }
                OutputType::Image => content.duration_secs.unwrap_or(0),
            };
            SceneDraft {
                order: i as u32 + 1,
                description: content.description,
                prompt: content.prompt,
                duration_secs,
                image: None,
            }
        })
        .collect()
}

/// Validate that scene orders are exactly `{1..=N}` with no gaps.
pub fn validate_scene_order(scenes: &[SceneDraft]) -> Result<(), CoreError> {
    for (i, scene) in scenes.iter().enumerate() {
        let expected = i as u32 + 1;
        if scene.order != expected {
            return Err(CoreError::Validation(format!(
                "Scene order invariant violated: expected order {expected} at position {i}, \
                 found {}",
                scene.order
            )));
        }
    }
    Ok(())
}

/// Pair uploaded reference images with scenes by position.
///
/// `scene[i]` receives `image[i]` for `i < images.len()`; surplus images
/// are dropped. Best-effort heuristic applied once after a parse; per-scene
/// attachment remains available afterwards.
pub fn pair_reference_images(scenes: &mut [SceneDraft], images: Vec<ReferenceImage>) {
    for (scene, image) in scenes.iter_mut().zip(images) {
        scene.image = Some(image);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(n: usize) -> Vec<ParsedSceneContent> {
        (0..n)
            .map(|i| ParsedSceneContent {
                description: format!("scene {i}"),
                prompt: format!("prompt {i}"),
                duration_secs: None,
            })
            .collect()
    }

    fn image(name: &str) -> ReferenceImage {
        ReferenceImage {
            name: name.to_string(),
            bytes: vec![0u8; 4],
        }
    }

    // -- clamp_duration --

    #[test]
    fn clamp_below_minimum() {
        assert_eq!(clamp_duration(3), MIN_SCENE_DURATION_SECS);
        assert_eq!(clamp_duration(0), MIN_SCENE_DURATION_SECS);
    }

    #[test]
    fn clamp_above_maximum() {
        assert_eq!(clamp_duration(16), MAX_SCENE_DURATION_SECS);
        assert_eq!(clamp_duration(1000), MAX_SCENE_DURATION_SECS);
    }

    #[test]
    fn clamp_within_range_unchanged() {
        for secs in MIN_SCENE_DURATION_SECS..=MAX_SCENE_DURATION_SECS {
            assert_eq!(clamp_duration(secs), secs);
        }
    }

    // -- number_scenes --

    #[test]
    fn numbering_is_one_based_and_contiguous() {
        let scenes = number_scenes(parsed(5), OutputType::Video);
        let orders: Vec<u32> = scenes.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn video_scenes_default_duration() {
        let scenes = number_scenes(parsed(2), OutputType::Video);
        assert!(scenes
            .iter()
            .all(|s| s.duration_secs == DEFAULT_SCENE_DURATION_SECS));
    }

    #[test]
    fn video_suggested_duration_is_clamped() {
        let mut input = parsed(1);
        input[0].duration_secs = Some(30);
        let scenes = number_scenes(input, OutputType::Video);
        assert_eq!(scenes[0].duration_secs, MAX_SCENE_DURATION_SECS);
    }

    #[test]
    fn image_scenes_have_no_meaningful_duration() {
        let scenes = number_scenes(parsed(2), OutputType::Image);
        assert!(scenes.iter().all(|s| s.duration_secs == 0));
    }

    #[test]
    fn numbering_empty_input() {
        assert!(number_scenes(vec![], OutputType::Video).is_empty());
    }

    // -- validate_scene_order --

    #[test]
    fn order_valid_for_numbered_scenes() {
        let scenes = number_scenes(parsed(4), OutputType::Video);
        assert!(validate_scene_order(&scenes).is_ok());
    }

    #[test]
    fn order_valid_for_empty_list() {
        assert!(validate_scene_order(&[]).is_ok());
    }

    #[test]
    fn order_rejects_gap() {
        let mut scenes = number_scenes(parsed(3), OutputType::Video);
        scenes[1].order = 5;
        assert!(validate_scene_order(&scenes).is_err());
    }

    #[test]
    fn order_rejects_zero_based() {
        let mut scenes = number_scenes(parsed(2), OutputType::Video);
        scenes[0].order = 0;
        assert!(validate_scene_order(&scenes).is_err());
    }

    #[test]
    fn order_rejects_duplicates() {
        let mut scenes = number_scenes(parsed(2), OutputType::Video);
        scenes[1].order = 1;
        assert!(validate_scene_order(&scenes).is_err());
    }

    // -- pair_reference_images --

    #[test]
    fn pairing_is_positional() {
        let mut scenes = number_scenes(parsed(3), OutputType::Video);
        pair_reference_images(&mut scenes, vec![image("a"), image("b")]);
        assert_eq!(scenes[0].image.as_ref().unwrap().name, "a");
        assert_eq!(scenes[1].image.as_ref().unwrap().name, "b");
        assert!(scenes[2].image.is_none());
    }

    #[test]
    fn pairing_drops_surplus_images() {
        let mut scenes = number_scenes(parsed(1), OutputType::Video);
        pair_reference_images(&mut scenes, vec![image("a"), image("b"), image("c")]);
        assert_eq!(scenes[0].image.as_ref().unwrap().name, "a");
    }

    #[test]
    fn pairing_preserves_order_and_count() {
        let mut scenes = number_scenes(parsed(3), OutputType::Video);
        pair_reference_images(&mut scenes, vec![image("a")]);
        assert_eq!(scenes.len(), 3);
        assert!(validate_scene_order(&scenes).is_ok());
    }
}
