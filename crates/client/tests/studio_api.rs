//! Integration tests for [`StudioApi`] against an in-process fake studio
//! server.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use reelkit_client::types::{EstimateRequest, EstimateSceneRow, ParseScriptRequest};
use reelkit_client::{ApiError, StudioApi};
use reelkit_core::scenario::{OutputType, ScenarioStatus};
use reelkit_core::settings::GenerationSettings;

/// Spawn a fake studio server on an ephemeral port, returning its base URL.
async fn spawn_fake_studio() -> String {
    let app = Router::new()
        .route("/ai-studio/scenarios", post(create))
        .route("/ai-studio/scenarios/parse", post(parse))
        .route("/ai-studio/scenarios/estimate", post(estimate))
        .route("/ai-studio/scenarios/{id}/status", get(status));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake studio");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake studio");
    });
    format!("http://{addr}")
}

async fn parse(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    // The fake rejects unauthenticated calls so the test can verify the
    // session cookie is forwarded.
    if !headers.contains_key(axum::http::header::COOKIE) {
        return Json(json!({ "success": false, "message": "Unauthenticated." }));
    }
    let script = body["script"].as_str().unwrap_or_default();
    if script.contains("unparseable") {
        return Json(json!({
            "success": false,
            "message": "Could not extract any scenes from the script",
        }));
    }
    Json(json!({
        "success": true,
        "data": {
            "title": "Sunrise over the city",
            "scenes": [
                { "description": "sunrise", "prompt": "a sunrise", "duration_secs": 6 },
                { "description": "city view", "prompt": "a city skyline", "duration_secs": null },
            ],
        },
    }))
}

// The fake's create endpoint always answers with a Laravel-style 422
// validation reply, so tests can verify the envelope message survives an
// error status code.
async fn create(Json(_body): Json<Value>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "success": false,
            "message": "The script field is required.",
        })),
    )
}

async fn estimate(Json(body): Json<Value>) -> Json<Value> {
    let total: i64 = body["scenes"]
        .as_array()
        .map(|scenes| {
            scenes
                .iter()
                .map(|s| s["duration_secs"].as_i64().unwrap_or(0))
                .sum::<i64>()
                * 10
        })
        .unwrap_or(0);
    Json(json!({ "success": true, "total_credits": total }))
}

async fn status(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "success": true,
        "scenario": {
            "id": id,
            "title": "Sunrise over the city",
            "output_type": "video",
            "model": "kling-v1.6",
            "status": "partial",
            "total_scenes": 2,
            "completed_scenes": 1,
            "progress": 100,
            "created_at": "2026-08-27T10:00:00Z",
            "scenes": [
                {
                    "id": 11, "order": 1, "description": "sunrise",
                    "prompt": "a sunrise", "duration_secs": 6,
                    "status": "completed",
                    "result_url": "https://cdn.example.com/clips/11.mp4",
                    "error_message": null,
                },
                {
                    "id": 12, "order": 2, "description": "city view",
                    "prompt": "a city skyline", "duration_secs": 6,
                    "status": "failed",
                    "result_url": null,
                    "error_message": "provider rejected the prompt",
                },
            ],
        },
    }))
}

fn parse_request(script: &str) -> ParseScriptRequest {
    ParseScriptRequest {
        script: script.to_string(),
        output_type: OutputType::Video,
        images: vec![],
    }
}

#[tokio::test]
async fn parse_returns_scenes_and_title() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    let data = api
        .parse_script(&parse_request("Cảnh 1: sunrise. Cảnh 2: city view."))
        .await
        .expect("parse should succeed");

    assert_eq!(data.title.as_deref(), Some("Sunrise over the city"));
    assert_eq!(data.scenes.len(), 2);
    assert_eq!(data.scenes[0].duration_secs, Some(6));
    assert_eq!(data.scenes[1].duration_secs, None);
}

#[tokio::test]
async fn session_cookie_is_sent_with_requests() {
    let base = spawn_fake_studio().await;
    let without_session = StudioApi::new(base);

    let err = without_session
        .parse_script(&parse_request("a script long enough"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rejected(ref m) if m == "Unauthenticated."));
}

#[tokio::test]
async fn rejection_surfaces_server_message_verbatim() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    let err = api
        .parse_script(&parse_request("this is unparseable noise"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::Rejected(ref m) if m == "Could not extract any scenes from the script")
    );
}

#[tokio::test]
async fn estimate_returns_total_credits() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    let total = api
        .estimate_credits(&EstimateRequest {
            model: "kling-v1.6".to_string(),
            output_type: OutputType::Video,
            scenes: vec![
                EstimateSceneRow {
                    prompt: "a sunrise".to_string(),
                    duration_secs: 6,
                },
                EstimateSceneRow {
                    prompt: "a city skyline".to_string(),
                    duration_secs: 15,
                },
            ],
            settings: GenerationSettings::default(),
        })
        .await
        .expect("estimate should succeed");

    assert_eq!(total, 210);
}

#[tokio::test]
async fn status_deserializes_full_snapshot() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    let scenario = api.fetch_status(42).await.expect("status should succeed");

    assert_eq!(scenario.id, 42);
    assert_eq!(scenario.status, ScenarioStatus::Partial);
    assert!(scenario.created_at.is_some());
    assert!(scenario.status.is_terminal());
    assert_eq!(scenario.scenes.len(), 2);
    assert_eq!(
        scenario.scenes[0].result_url.as_deref(),
        Some("https://cdn.example.com/clips/11.mp4")
    );
    assert_eq!(
        scenario.scenes[1].error_message.as_deref(),
        Some("provider rejected the prompt")
    );
}

#[tokio::test]
async fn validation_status_surfaces_envelope_message_verbatim() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    // The fake answers create with a 422 carrying a success:false envelope.
    let err = api
        .create_scenario(&reelkit_client::types::CreateScenarioRequest {
            script: "a script long enough".to_string(),
            title: None,
            output_type: OutputType::Video,
            model: "kling-v1.6".to_string(),
            scenes: vec![],
            settings: GenerationSettings::default(),
            characters: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rejected(ref m) if m == "The script field is required."));
}

#[tokio::test]
async fn missing_route_maps_to_api_error() {
    let base = spawn_fake_studio().await;
    let api = StudioApi::new(base).with_session("studio_session=abc");

    // The fake has no generate route; axum answers 404 without an envelope.
    let err = api.start_generation(42).await.unwrap_err();

    assert!(matches!(err, ApiError::Api { .. }));
}
