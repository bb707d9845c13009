//! HTTP endpoints
//!
//! REST API for the assistant: text and voice question endpoints, profile
//! management, and price alerts.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use krishi_agent_core::{AlertDirection, Language, PriceAlert, UserProfile};

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins);

    Router::new()
        // Question endpoints
        .route("/api/ask", post(ask))
        .route("/api/ask-voice", post(ask_voice))
        // Profile endpoints
        .route("/api/profile/:user_id", get(get_profile))
        .route("/api/profile/:user_id", put(put_profile))
        // Alert endpoints
        .route("/api/alerts/:user_id", get(get_alerts))
        .route("/api/alerts/:user_id", post(post_alert))
        // Health check
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer; no configured origins means localhost-only
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin, skipping");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}

/// Text question request
#[derive(Debug, Deserialize)]
struct AskRequest {
    user_id: String,
    query_text: String,
}

/// Text question response
#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
    language: String,
    source: String,
}

/// Ask a question as text
async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    if request.query_text.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty.".into()));
    }

    let result = state.agent.ask(&request.user_id, &request.query_text).await;
    Ok(Json(AskResponse {
        answer: result.answer,
        language: result.language.code().to_string(),
        source: result.source.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct VoiceParams {
    user_id: String,
}

/// Ask a question as audio; answers with audio when TTS succeeds, JSON text
/// otherwise
async fn ask_voice(
    State(state): State<AppState>,
    Query(params): Query<VoiceParams>,
    audio: Bytes,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if audio.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Audio body is empty.".into()));
    }

    let transcript = state
        .stt
        .transcribe(&audio)
        .await
        .unwrap_or_default();
    if transcript.text.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Could not understand the audio.".into(),
        ));
    }

    let result = state.agent.ask(&params.user_id, &transcript.text).await;
    let spoken = state
        .tts
        .synthesize(&result.answer, result.language)
        .await
        .unwrap_or_default();

    if spoken.is_empty() {
        // TTS degraded: still answer, as text
        return Ok(Json(AskResponse {
            answer: result.answer,
            language: result.language.code().to_string(),
            source: result.source.to_string(),
        })
        .into_response());
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("audio/mpeg"),
    );
    // header values cannot carry newlines; flatten the answer
    let answer_line = result.answer.replace(['\n', '\r'], " ");
    if let Ok(value) = HeaderValue::from_bytes(answer_line.as_bytes()) {
        headers.insert("x-answer-text", value);
    }
    if let Ok(value) = HeaderValue::from_str(result.language.code()) {
        headers.insert("x-answer-language", value);
    }

    Ok((headers, spoken).into_response())
}

/// Profile update request; absent fields stay untouched
#[derive(Debug, Deserialize)]
struct ProfileUpdate {
    name: Option<String>,
    preferred_language: Option<String>,
    default_location: Option<String>,
    crops: Option<Vec<String>>,
}

/// Get a user's profile (a fresh default if none exists yet)
async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let profile = state
        .profiles
        .get(&user_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| UserProfile::new(&user_id));
    Ok(Json(profile))
}

/// Update a user's profile
async fn put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    let mut profile = state
        .profiles
        .get(&user_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| UserProfile::new(&user_id));

    if let Some(name) = update.name {
        profile.name = Some(name);
    }
    if let Some(language) = update.preferred_language {
        profile.preferred_language = Some(Language::from_code_lossy(&language));
    }
    if let Some(location) = update.default_location {
        profile.default_location = Some(location);
    }
    if let Some(crops) = update.crops {
        profile.crops = crops;
    }

    state.profiles.set(profile.clone()).await.map_err(internal)?;
    Ok(Json(profile))
}

/// Alert registration request
#[derive(Debug, Deserialize)]
struct AlertRequest {
    commodity: String,
    state: Option<String>,
    target_price_per_quintal: f64,
    /// "above" or "below"
    direction: String,
}

/// Register a price alert
async fn post_alert(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AlertRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let direction = match request.direction.to_lowercase().as_str() {
        "above" => AlertDirection::Above,
        "below" => AlertDirection::Below,
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("direction must be 'above' or 'below', got '{other}'"),
            ))
        }
    };

    state.alerts.register(
        &user_id,
        PriceAlert {
            commodity: request.commodity,
            state: request.state,
            target_price_per_quintal: request.target_price_per_quintal,
            direction,
        },
    );
    Ok(StatusCode::CREATED)
}

/// Registered alerts plus triggered notices for a user
async fn get_alerts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "alerts": state.alerts.alerts_for(&user_id),
        "notices": state.alerts.notices_for(&user_id),
    }))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn internal(e: krishi_agent_core::Error) -> (StatusCode, String) {
    tracing::error!(error = %e, "Request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_agent_config::Settings;

    #[test]
    fn test_router_creation() {
        let mut settings = Settings::default();
        settings.market.api_key = "test-key".into();
        let state = AppState::from_settings(settings);
        let _ = create_router(state);
    }

    #[test]
    fn test_cors_layer_with_invalid_origin_falls_back() {
        let _ = build_cors_layer(&["http://valid.example".to_string()]);
        let _ = build_cors_layer(&["\u{0}bad".to_string()]);
        let _ = build_cors_layer(&[]);
    }
}
