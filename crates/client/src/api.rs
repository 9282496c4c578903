//! REST client for the AI studio scenario endpoints.
//!
//! Wraps the five scenario operations (parse, estimate, create, generate,
//! status) using [`reqwest`]. All calls share one session credential
//! (cookie header) configured once at construction.

use reelkit_core::scenario::Scenario;
use reelkit_core::types::DbId;

use crate::types::{
    CreateScenarioRequest, EstimateRequest, EstimateResponse, ParseData, ParseResponse,
    ParseScriptRequest, ScenarioResponse,
};

/// HTTP client for one AI studio deployment.
pub struct StudioApi {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

/// Errors from the studio REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Studio API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The server reported `success: false`, whether in a 2xx envelope or
    /// in the body of an error status. Carries the server-provided message
    /// verbatim when present.
    #[error("{0}")]
    Rejected(String),

    /// A 2xx `success: true` response was missing its payload.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Fallback message when a rejection carries no server-provided text.
const GENERIC_FAILURE: &str = "The studio service reported a failure";

/// Minimal envelope shape for bodies carried by error status codes (e.g. a
/// 422 validation reply).
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    success: bool,
    message: Option<String>,
}

impl StudioApi {
    /// Create a new client for a studio deployment.
    ///
    /// * `base_url` - base HTTP URL, e.g. `https://studio.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            session_cookie: None,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful for
    /// connection pooling across components).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            session_cookie: None,
        }
    }

    /// Attach the session cookie sent with every request.
    ///
    /// The credential is established outside this workflow; the client only
    /// carries it.
    pub fn with_session(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Base HTTP URL of the studio deployment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse a script into an ordered scene list.
    ///
    /// `POST /ai-studio/scenarios/parse`
    pub async fn parse_script(
        &self,
        request: &ParseScriptRequest,
    ) -> Result<ParseData, ApiError> {
        let response: ParseResponse = self
            .post_json(format!("{}/ai-studio/scenarios/parse", self.base_url), request)
            .await?;
        Self::accept(response.success, response.message, response.data, "parse data")
    }

    /// Preview the credit cost of a scene list.
    ///
    /// `POST /ai-studio/scenarios/estimate`
    pub async fn estimate_credits(&self, request: &EstimateRequest) -> Result<i64, ApiError> {
        let response: EstimateResponse = self
            .post_json(
                format!("{}/ai-studio/scenarios/estimate", self.base_url),
                request,
            )
            .await?;
        Self::accept(
            response.success,
            response.message,
            response.total_credits,
            "total_credits",
        )
    }

    /// Persist a scenario with its scenes.
    ///
    /// `POST /ai-studio/scenarios`
    pub async fn create_scenario(
        &self,
        request: &CreateScenarioRequest,
    ) -> Result<Scenario, ApiError> {
        let response: ScenarioResponse = self
            .post_json(format!("{}/ai-studio/scenarios", self.base_url), request)
            .await?;
        Self::accept(response.success, response.message, response.scenario, "scenario")
    }

    /// Start generation for a persisted scenario.
    ///
    /// `POST /ai-studio/scenarios/{id}/generate`
    pub async fn start_generation(&self, scenario_id: DbId) -> Result<Scenario, ApiError> {
        let response = self
            .client
            .post(format!(
                "{}/ai-studio/scenarios/{scenario_id}/generate",
                self.base_url
            ))
            .headers(self.headers())
            .send()
            .await?;
        let response: ScenarioResponse = Self::parse_response(response).await?;
        Self::accept(response.success, response.message, response.scenario, "scenario")
    }

    /// Poll the generation status of a scenario.
    ///
    /// `GET /ai-studio/scenarios/{id}/status`
    pub async fn fetch_status(&self, scenario_id: DbId) -> Result<Scenario, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/ai-studio/scenarios/{scenario_id}/status",
                self.base_url
            ))
            .headers(self.headers())
            .send()
            .await?;
        let response: ScenarioResponse = Self::parse_response(response).await?;
        Self::accept(response.success, response.message, response.scenario, "scenario")
    }

    // ---- private helpers ----

    fn headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(cookie) = &self.session_cookie {
            if let Ok(value) = reqwest::header::HeaderValue::from_str(cookie) {
                headers.insert(reqwest::header::COOKIE, value);
            }
        }
        headers
    }

    /// POST a JSON body and parse the JSON response.
    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(url)
            .headers(self.headers())
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success. A failure body carrying a `success: false`
    /// envelope becomes [`ApiError::Rejected`] with the server message
    /// verbatim; anything else becomes [`ApiError::Api`] with the status
    /// and raw body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if let Some(message) = Self::rejection_message(&body) {
                return Err(ApiError::Rejected(message));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Extract the server message from an error body, if the body is a
    /// `success: false` envelope with a message.
    fn rejection_message(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        if envelope.success {
            return None;
        }
        envelope.message
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Convert a response envelope into a `Result`, surfacing the server
    /// message verbatim on `success: false`.
    fn accept<T>(
        success: bool,
        message: Option<String>,
        payload: Option<T>,
        what: &str,
    ) -> Result<T, ApiError> {
        if !success {
            return Err(ApiError::Rejected(
                message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ));
        }
        payload.ok_or_else(|| ApiError::Malformed(format!("successful response missing {what}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
