//! The scenario wizard state machine.
//!
//! Phases advance `Input` → `Scenes` → `Generating` → `Finished`, with
//! `reset` returning to an empty `Input` from anywhere. Every operation is
//! phase-guarded, and because all operations take `&mut self`, two
//! collaborator calls of the same kind can never be in flight at once.
//!
//! The estimate is advisory: refresh failures are logged and the previous
//! value kept. The generate gate is not advisory: it hard-blocks whenever
//! the (possibly stale) estimate exceeds the current balance.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelkit_client::types::{
    CreateScenarioRequest, EstimateRequest, EstimateSceneRow, ImageUpload, ParseScriptRequest,
    SceneUpload,
};
use reelkit_client::ScenarioBackend;
use reelkit_core::character::{validate_character, Character};
use reelkit_core::credits::validate_generate_ready;
use reelkit_core::error::CoreError;
use reelkit_core::model::{find_selectable, ModelInfo};
use reelkit_core::scenario::{OutputType, Scenario, ScenarioStatus};
use reelkit_core::scene::{
    clamp_duration, number_scenes, pair_reference_images, validate_scene_order,
    ParsedSceneContent, ReferenceImage, SceneDraft,
};
use reelkit_core::script::{
    can_parse, validate_reference_image_count, validate_script, MAX_REFERENCE_IMAGES,
};
use reelkit_core::settings::GenerationSettings;
use reelkit_core::types::DbId;

use crate::error::WizardError;
use crate::poller::{PollOutcome, StatusPoller, DEFAULT_POLL_INTERVAL};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the wizard is in one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Collecting the script, output type, model, and reference images.
    Input,
    /// Editing the parsed scene list before generation.
    Scenes,
    /// Generation started; scene content is read-only, state comes from
    /// status polls.
    Generating,
    /// The run ended with the given terminal status. Only `reset` applies.
    Finished(ScenarioStatus),
}

impl WizardPhase {
    /// Short name for error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Scenes => "scenes",
            Self::Generating => "generating",
            Self::Finished(_) => "finished",
        }
    }
}

/// Callback invoked once per run when the scenario reaches a terminal
/// status, so the surrounding application can refresh the displayed
/// credit balance.
pub type CreditsListener = Box<dyn Fn(&Scenario) + Send + Sync>;

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// The script-to-scenes wizard.
///
/// Holds the draft state for one run and talks to the studio through the
/// injected [`ScenarioBackend`].
pub struct ScenarioWizard {
    backend: Arc<dyn ScenarioBackend>,
    catalog: Vec<ModelInfo>,
    phase: WizardPhase,

    // -- Input phase --
    script: String,
    output_type: OutputType,
    model: Option<ModelInfo>,
    reference_images: Vec<ReferenceImage>,

    // -- Scenes phase --
    title: Option<String>,
    scenes: Vec<SceneDraft>,
    characters: Vec<Character>,
    settings: GenerationSettings,
    total_credits: i64,

    // -- Cross-cutting --
    current_credits: i64,
    scenario: Option<Scenario>,
    poll_interval: Duration,
    poll_deadline: Option<Duration>,
    credits_listener: Option<CreditsListener>,
    credits_notified: bool,
}

impl ScenarioWizard {
    /// Create a wizard in the `Input` phase.
    ///
    /// * `catalog` - the provider-supplied model list; only entries that
    ///   are enabled and not coming soon can be selected.
    pub fn new(backend: Arc<dyn ScenarioBackend>, catalog: Vec<ModelInfo>) -> Self {
        Self {
            backend,
            catalog,
            phase: WizardPhase::Input,
            script: String::new(),
            output_type: OutputType::default(),
            model: None,
            reference_images: Vec::new(),
            title: None,
            scenes: Vec::new(),
            characters: Vec::new(),
            settings: GenerationSettings::default(),
            total_credits: 0,
            current_credits: 0,
            scenario: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_deadline: None,
            credits_listener: None,
            credits_notified: false,
        }
    }

    /// Register the credits-changed callback. Fires exactly once per run,
    /// when the scenario reaches a terminal status.
    pub fn on_credits_update(mut self, listener: CreditsListener) -> Self {
        self.credits_listener = Some(listener);
        self
    }

    /// Override the status polling cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Give up polling after this much wall-clock time without a terminal
    /// status. Without a deadline, polling runs until terminal or cancelled.
    pub fn with_poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = Some(deadline);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn selected_model(&self) -> Option<&ModelInfo> {
        self.model.as_ref()
    }

    pub fn reference_images(&self) -> &[ReferenceImage] {
        &self.reference_images
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn scenes(&self) -> &[SceneDraft] {
        &self.scenes
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn total_credits(&self) -> i64 {
        self.total_credits
    }

    pub fn current_credits(&self) -> i64 {
        self.current_credits
    }

    /// The latest server snapshot, present from generate onwards.
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    // -----------------------------------------------------------------------
    // Input phase
    // -----------------------------------------------------------------------

    /// Replace the script text.
    pub fn set_script(&mut self, script: impl Into<String>) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Input, "edit the script")?;
        self.script = script.into();
        Ok(())
    }

    /// Change the output type. Deselects the current model if it cannot
    /// produce the new type.
    pub fn set_output_type(&mut self, output_type: OutputType) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Input, "change the output type")?;
        self.output_type = output_type;
        if let Some(model) = &self.model {
            if !model.supports(output_type) {
                self.model = None;
            }
        }
        Ok(())
    }

    /// Select a generation model by id. The model must be in the catalog,
    /// enabled, not coming soon, and able to produce the current output
    /// type. Allowed while editing scenes too, since switching models
    /// changes the cost.
    pub fn select_model(&mut self, model_id: &str) -> Result<(), WizardError> {
        self.require_editable("select a model")?;
        let model = find_selectable(&self.catalog, model_id)?;
        if !model.supports(self.output_type) {
            return Err(CoreError::Validation(format!(
                "Model '{model_id}' does not support {} output",
                self.output_type.as_str()
            ))
            .into());
        }
        self.model = Some(model.clone());
        Ok(())
    }

    /// Attach a reference image for the upcoming parse (at most
    /// [`MAX_REFERENCE_IMAGES`]).
    pub fn add_reference_image(&mut self, image: ReferenceImage) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Input, "attach a reference image")?;
        if self.reference_images.len() >= MAX_REFERENCE_IMAGES {
            return Err(CoreError::Validation(format!(
                "Too many reference images: maximum is {MAX_REFERENCE_IMAGES}"
            ))
            .into());
        }
        self.reference_images.push(image);
        Ok(())
    }

    /// Drop all attached reference images.
    pub fn clear_reference_images(&mut self) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Input, "clear reference images")?;
        self.reference_images.clear();
        Ok(())
    }

    /// Whether the parse transition is currently reachable.
    pub fn can_parse(&self) -> bool {
        self.phase == WizardPhase::Input && can_parse(&self.script)
    }

    /// Parse the script into scenes and move to the `Scenes` phase.
    ///
    /// On success the scene list is replaced wholesale: scenes are numbered
    /// `1..=N` in parser order, video durations default to 6 seconds,
    /// uploaded images are paired positionally, and the parser's suggested
    /// title is adopted. On failure the wizard stays in `Input` with no
    /// partial state committed.
    pub async fn parse(&mut self) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Input, "parse the script")?;
        validate_script(&self.script)?;
        validate_reference_image_count(self.reference_images.len())?;

        let request = ParseScriptRequest {
            script: self.script.clone(),
            output_type: self.output_type,
            images: self
                .reference_images
                .iter()
                .map(ImageUpload::from_reference)
                .collect(),
        };
        let data = self.backend.parse_script(&request).await?;

        let parsed: Vec<ParsedSceneContent> = data
            .scenes
            .into_iter()
            .map(|s| ParsedSceneContent {
                description: s.description,
                prompt: s.prompt,
                duration_secs: s.duration_secs,
            })
            .collect();
        let mut scenes = number_scenes(parsed, self.output_type);

        // The uploaded blobs move into the scene drafts; surplus images are
        // dropped here, releasing their memory.
        let images = mem::take(&mut self.reference_images);
        pair_reference_images(&mut scenes, images);

        if data.title.is_some() {
            self.title = data.title;
        }
        self.scenes = scenes;
        self.phase = WizardPhase::Scenes;
        tracing::info!(scene_count = self.scenes.len(), "Script parsed into scenes");

        self.refresh_estimate().await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Scenes phase
    // -----------------------------------------------------------------------

    /// Replace the prompt of the scene with the given order.
    pub fn set_scene_prompt(
        &mut self,
        order: u32,
        prompt: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "edit a scene prompt")?;
        self.scene_mut(order)?.prompt = prompt.into();
        Ok(())
    }

    /// Set the duration of the scene with the given order, clamped to the
    /// allowed range. Video output only.
    pub fn set_scene_duration(&mut self, order: u32, secs: u32) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "edit a scene duration")?;
        if self.output_type != OutputType::Video {
            return Err(CoreError::Validation(
                "Scene durations only apply to video output".to_string(),
            )
            .into());
        }
        self.scene_mut(order)?.duration_secs = clamp_duration(secs);
        Ok(())
    }

    /// Attach or replace the reference image of one scene. A replaced blob
    /// is dropped.
    pub fn attach_scene_image(
        &mut self,
        order: u32,
        image: ReferenceImage,
    ) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "attach a scene image")?;
        self.scene_mut(order)?.image = Some(image);
        Ok(())
    }

    /// Remove the reference image of one scene, if any.
    pub fn remove_scene_image(&mut self, order: u32) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "remove a scene image")?;
        self.scene_mut(order)?.image = None;
        Ok(())
    }

    /// Set the scenario title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "edit the title")?;
        self.title = Some(title.into());
        Ok(())
    }

    /// Replace the generation settings.
    pub fn set_settings(&mut self, settings: GenerationSettings) -> Result<(), WizardError> {
        self.require_editable("change generation settings")?;
        self.settings = settings;
        Ok(())
    }

    /// Add an advisory character hint. The name must be non-empty.
    /// Characters never affect scene count or ordering.
    pub fn add_character(&mut self, character: Character) -> Result<(), WizardError> {
        self.require_phase(WizardPhase::Scenes, "add a character")?;
        validate_character(&character)?;
        self.characters.push(character);
        Ok(())
    }

    /// Remove a character by name. Returns whether one was removed.
    pub fn remove_character(&mut self, name: &str) -> Result<bool, WizardError> {
        self.require_phase(WizardPhase::Scenes, "remove a character")?;
        let before = self.characters.len();
        self.characters.retain(|c| c.name != name);
        Ok(self.characters.len() != before)
    }

    /// Update the credit balance reported by the surrounding application.
    pub fn set_current_credits(&mut self, credits: i64) {
        self.current_credits = credits;
    }

    /// Recompute the credit estimate through the estimator collaborator.
    ///
    /// Advisory: a failure is logged and the previous (possibly stale)
    /// estimate kept. Call after any scene, settings, or model change.
    /// Does nothing until a model is selected.
    pub async fn refresh_estimate(&mut self) {
        if self.phase != WizardPhase::Scenes {
            return;
        }
        let Some(model) = &self.model else {
            return;
        };
        let request = EstimateRequest {
            model: model.id.clone(),
            output_type: self.output_type,
            scenes: self.scenes.iter().map(EstimateSceneRow::from_draft).collect(),
            settings: self.settings.clone(),
        };
        match self.backend.estimate_credits(&request).await {
            Ok(total) => {
                self.total_credits = total;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credit estimate failed; keeping previous value");
            }
        }
    }

    /// Whether the generate transition is currently enabled, judged against
    /// the cached estimate. [`generate`](Self::generate) recomputes the
    /// estimate before its final gate.
    pub fn can_generate(&self) -> bool {
        self.phase == WizardPhase::Scenes && self.generate_readiness().is_ok()
    }

    /// The precondition check behind [`can_generate`](Self::can_generate),
    /// with the blocking reason. Equality of balance and estimate passes.
    pub fn generate_readiness(&self) -> Result<(), CoreError> {
        validate_generate_ready(
            self.model.is_some(),
            self.scenes.len(),
            self.total_credits,
            self.current_credits,
        )
    }

    /// Persist the scenario, start generation, and move to `Generating`.
    ///
    /// The estimate is recomputed first so the gate never runs against a
    /// value that predates the latest scene, settings, or model change.
    /// Returns the server-assigned scenario id. If the create or the
    /// generate call fails the wizard stays in `Scenes` and nothing is
    /// retried.
    pub async fn generate(&mut self) -> Result<DbId, WizardError> {
        self.require_phase(WizardPhase::Scenes, "start generation")?;
        self.refresh_estimate().await;
        self.generate_readiness()?;
        validate_scene_order(&self.scenes)?;

        let model = self.model.as_ref().map(|m| m.id.clone()).unwrap_or_default();
        let request = CreateScenarioRequest {
            script: self.script.clone(),
            title: self.title.clone(),
            output_type: self.output_type,
            model,
            scenes: self.scenes.iter().map(SceneUpload::from_draft).collect(),
            settings: self.settings.clone(),
            characters: self.characters.clone(),
        };

        let created = self.backend.create_scenario(&request).await?;
        let scenario_id = created.id;
        let snapshot = self.backend.start_generation(scenario_id).await?;

        self.scenario = Some(snapshot);
        self.credits_notified = false;
        self.phase = WizardPhase::Generating;
        tracing::info!(scenario_id, "Generation started");
        Ok(scenario_id)
    }

    // -----------------------------------------------------------------------
    // Generating phase
    // -----------------------------------------------------------------------

    /// Replace the local scenario state with a server snapshot.
    ///
    /// Only meaningful while `Generating`; snapshots arriving in any other
    /// phase are ignored. Last-write-wins on the whole aggregate, never a
    /// merge. A terminal status moves the wizard to `Finished` and fires
    /// the credits-changed callback exactly once.
    pub fn apply_snapshot(&mut self, snapshot: Scenario) {
        if self.phase != WizardPhase::Generating {
            return;
        }
        let status = snapshot.status;
        self.scenario = Some(snapshot);
        if status.is_terminal() {
            self.phase = WizardPhase::Finished(status);
            if !self.credits_notified {
                self.credits_notified = true;
                if let (Some(listener), Some(scenario)) =
                    (&self.credits_listener, &self.scenario)
                {
                    listener(scenario);
                }
            }
        }
    }

    /// Poll the scenario status until terminal, applying every snapshot.
    ///
    /// Returns how the polling run ended. On `Terminal` the wizard is in
    /// `Finished`; on `Cancelled` or `TimedOut` it remains `Generating`.
    pub async fn poll_until_terminal(
        &mut self,
        cancel: CancellationToken,
    ) -> Result<PollOutcome, WizardError> {
        self.require_phase(WizardPhase::Generating, "poll generation status")?;
        let scenario_id = match &self.scenario {
            Some(s) => s.id,
            None => {
                return Err(CoreError::Internal(
                    "Generating phase without a scenario snapshot".to_string(),
                )
                .into())
            }
        };

        let mut poller = StatusPoller::new(self.backend.clone(), scenario_id)
            .with_interval(self.poll_interval);
        if let Some(deadline) = self.poll_deadline {
            poller = poller.with_max_duration(deadline);
        }
        let outcome = poller
            .run(cancel, |snapshot| self.apply_snapshot(snapshot))
            .await;
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Discard all run state and return to an empty `Input` phase.
    ///
    /// Valid from any phase and idempotent. Image blobs and the scene list
    /// are dropped; the model catalog, balance, and listeners survive.
    pub fn reset(&mut self) {
        self.phase = WizardPhase::Input;
        self.script.clear();
        self.output_type = OutputType::default();
        self.model = None;
        self.reference_images.clear();
        self.title = None;
        self.scenes.clear();
        self.characters.clear();
        self.settings = GenerationSettings::default();
        self.total_credits = 0;
        self.scenario = None;
        self.credits_notified = false;
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn require_phase(
        &self,
        expected: WizardPhase,
        action: &'static str,
    ) -> Result<(), WizardError> {
        if self.phase != expected {
            return Err(WizardError::InvalidPhase {
                action,
                phase: self.phase.name(),
            });
        }
        Ok(())
    }

    /// Model and settings changes are allowed both before and after parse.
    fn require_editable(&self, action: &'static str) -> Result<(), WizardError> {
        match self.phase {
            WizardPhase::Input | WizardPhase::Scenes => Ok(()),
            _ => Err(WizardError::InvalidPhase {
                action,
                phase: self.phase.name(),
            }),
        }
    }

    fn scene_mut(&mut self, order: u32) -> Result<&mut SceneDraft, CoreError> {
        self.scenes
            .iter_mut()
            .find(|s| s.order == order)
            .ok_or(CoreError::NotFound {
                entity: "Scene",
                id: order as i64,
            })
    }
}
