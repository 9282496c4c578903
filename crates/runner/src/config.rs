use std::time::Duration;

/// Runner configuration loaded from environment variables.
///
/// All fields except `MODEL_ID` have defaults suitable for a local studio
/// deployment.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base URL of the studio deployment (default: `http://localhost:8000`).
    pub base_url: String,
    /// Session cookie sent with every request, if set.
    pub session_cookie: Option<String>,
    /// Path of the script file to read (default: `script.txt`).
    pub script_path: String,
    /// Output type, `video` or `image` (default: `video`).
    pub output_type: String,
    /// Id of the generation model to select. Required.
    pub model_id: String,
    /// Credit cost per unit for the selected model (default: `10`).
    pub model_credits_cost: i64,
    /// Status polling cadence (default: `3000` ms).
    pub poll_interval: Duration,
    /// Credit balance to run the generate gate against (default: `0`).
    pub current_credits: i64,
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `STUDIO_BASE_URL`    | `http://localhost:8000` |
    /// | `STUDIO_SESSION`     | (none)                  |
    /// | `SCRIPT_PATH`        | `script.txt`            |
    /// | `OUTPUT_TYPE`        | `video`                 |
    /// | `MODEL_ID`           | (required)              |
    /// | `MODEL_CREDITS_COST` | `10`                    |
    /// | `POLL_INTERVAL_MS`   | `3000`                  |
    /// | `CURRENT_CREDITS`    | `0`                     |
    pub fn from_env() -> Self {
        let base_url = std::env::var("STUDIO_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());

        let session_cookie = std::env::var("STUDIO_SESSION").ok();

        let script_path = std::env::var("SCRIPT_PATH").unwrap_or_else(|_| "script.txt".into());

        let output_type = std::env::var("OUTPUT_TYPE").unwrap_or_else(|_| "video".into());

        let model_id = std::env::var("MODEL_ID").expect("MODEL_ID must be set");

        let model_credits_cost: i64 = std::env::var("MODEL_CREDITS_COST")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("MODEL_CREDITS_COST must be a valid i64");

        let poll_interval_ms: u64 = std::env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("POLL_INTERVAL_MS must be a valid u64");

        let current_credits: i64 = std::env::var("CURRENT_CREDITS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("CURRENT_CREDITS must be a valid i64");

        Self {
            base_url,
            session_cookie,
            script_path,
            output_type,
            model_id,
            model_credits_cost,
            poll_interval: Duration::from_millis(poll_interval_ms),
            current_credits,
        }
    }
}
