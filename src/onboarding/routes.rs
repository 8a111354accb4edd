//! REST endpoints consumed by the landing/dashboard UI.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::entitlements;
use crate::error::{Error, SequencerError};
use crate::onboarding::manager::OnboardingManager;
use crate::onboarding::model::AnswerValue;
use crate::tier::Tier;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

#[derive(Debug, serde::Deserialize)]
struct AnswerRequest {
    answer: AnswerValue,
}

#[derive(Debug, serde::Deserialize)]
struct LoginRequest {
    code: String,
}

#[derive(Debug, serde::Serialize)]
struct EntitlementsResponse {
    tier: Tier,
    label: &'static str,
    rank: u8,
    unlocked: Vec<entitlements::Feature>,
    locked: Vec<entitlements::Feature>,
}

/// Map engine errors onto HTTP statuses with a JSON error body.
fn error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        Error::Sequencer(SequencerError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Sequencer(_) => StatusCode::CONFLICT,
        Error::Credential(_) => StatusCode::BAD_REQUEST,
        Error::Gateway(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// GET /api/onboarding/question — the question at the current step.
async fn get_question(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.manager.current_question().await {
        Ok(question) => Json(question).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /api/onboarding/answer — submit an answer for the current step.
async fn post_answer(
    State(state): State<OnboardingRouteState>,
    Json(request): Json<AnswerRequest>,
) -> impl IntoResponse {
    match state.manager.submit_answer(request.answer).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /api/onboarding/back — step back one question.
async fn post_back(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.manager.go_back().await {
        Ok(question) => Json(question).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /api/onboarding/finalize — retry the durable handoff after a
/// gateway failure.
async fn post_finalize(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.manager.finalize().await {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /api/onboarding/restart — abandon the session and start over.
async fn post_restart(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    state.manager.restart().await;
    Json(state.manager.status().await)
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// GET /api/profile — the current-user profile, or 404 if none exists.
async fn get_profile(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.manager.profile().await {
        Some(profile) => Json(profile).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No profile exists yet" })),
        )
            .into_response(),
    }
}

/// POST /api/auth/login — validate an access code against the lead ledger.
async fn post_login(
    State(state): State<OnboardingRouteState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    match state.manager.login(&request.code).await {
        Ok(Some(lead)) => Json(lead).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Unknown access code" })),
        )
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// GET /api/entitlements/{tier} — unlocked and locked features for a tier.
async fn get_entitlements(Path(tier_code): Path<String>) -> impl IntoResponse {
    let tier: Tier = match tier_code.parse() {
        Ok(tier) => tier,
        Err(err) => return error_response(Error::Credential(err)).into_response(),
    };
    Json(EntitlementsResponse {
        tier,
        label: tier.label(),
        rank: tier.rank(),
        unlocked: entitlements::unlocked_features(tier).to_vec(),
        locked: entitlements::locked_features(tier).to_vec(),
    })
    .into_response()
}

/// GET /api/leads — the lead ledger, newest first.
async fn get_leads(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.manager.leads().await {
        Ok(leads) => Json(leads).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// Build the engine's REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/question", get(get_question))
        .route("/api/onboarding/answer", post(post_answer))
        .route("/api/onboarding/back", post(post_back))
        .route("/api/onboarding/finalize", post(post_finalize))
        .route("/api/onboarding/restart", post(post_restart))
        .route("/api/onboarding/status", get(get_status))
        .route("/api/profile", get(get_profile))
        .route("/api/auth/login", post(post_login))
        .route("/api/entitlements/{tier}", get(get_entitlements))
        .route("/api/leads", get(get_leads))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
