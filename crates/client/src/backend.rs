//! The collaborator seam between the wizard and the studio server.
//!
//! [`ScenarioBackend`] abstracts the five HTTP operations so the wizard can
//! run against [`StudioApi`] in production and a programmable fake in tests.

use async_trait::async_trait;

use reelkit_core::scenario::Scenario;
use reelkit_core::types::DbId;

use crate::api::{ApiError, StudioApi};
use crate::types::{CreateScenarioRequest, EstimateRequest, ParseData, ParseScriptRequest};

/// The five scenario operations the wizard performs against the server.
#[async_trait]
pub trait ScenarioBackend: Send + Sync {
    /// Turn a script (plus optional reference images) into an ordered
    /// scene list and an optional suggested title.
    async fn parse_script(&self, request: &ParseScriptRequest) -> Result<ParseData, ApiError>;

    /// Preview the total credit cost for the given scenes and settings.
    /// Idempotent and side-effect-free.
    async fn estimate_credits(&self, request: &EstimateRequest) -> Result<i64, ApiError>;

    /// Persist the scenario aggregate, returning the server snapshot with
    /// its assigned id.
    async fn create_scenario(&self, request: &CreateScenarioRequest)
        -> Result<Scenario, ApiError>;

    /// Start generation for a persisted scenario.
    async fn start_generation(&self, scenario_id: DbId) -> Result<Scenario, ApiError>;

    /// Fetch the current generation status snapshot.
    async fn fetch_status(&self, scenario_id: DbId) -> Result<Scenario, ApiError>;
}

#[async_trait]
impl ScenarioBackend for StudioApi {
    async fn parse_script(&self, request: &ParseScriptRequest) -> Result<ParseData, ApiError> {
        StudioApi::parse_script(self, request).await
    }

    async fn estimate_credits(&self, request: &EstimateRequest) -> Result<i64, ApiError> {
        StudioApi::estimate_credits(self, request).await
    }

    async fn create_scenario(
        &self,
        request: &CreateScenarioRequest,
    ) -> Result<Scenario, ApiError> {
        StudioApi::create_scenario(self, request).await
    }

    async fn start_generation(&self, scenario_id: DbId) -> Result<Scenario, ApiError> {
        StudioApi::start_generation(self, scenario_id).await
    }

    async fn fetch_status(&self, scenario_id: DbId) -> Result<Scenario, ApiError> {
        StudioApi::fetch_status(self, scenario_id).await
    }
}
