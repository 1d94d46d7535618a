//! api.rs — HTTP surface over the pipeline. Thin by design: every handler
//! validates at the boundary and delegates to the pure core functions.

use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::catalog::OpportunityCatalog;
use crate::extract;
use crate::matcher::{self, MatchResult};
use crate::responder;
use crate::signal::{SkillProfile, SourceRecord, Tier};

/// Shared application state. The catalog is immutable after startup; a
/// reload would swap the whole `Arc`, never mutate in place.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<OpportunityCatalog>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/extract", post(extract_profile))
        .route("/match", post(match_opportunities))
        .route("/opportunities", get(list_opportunities))
        .route("/chat", post(chat))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

/// POST /extract — fuse a batch of source records into a profile.
/// Structurally invalid records (empty handle) are rejected here, before the
/// total core function runs.
async fn extract_profile(
    Json(records): Json<Vec<SourceRecord>>,
) -> Result<Json<SkillProfile>, ApiError> {
    for record in &records {
        record.validate().map_err(|e| bad_request(e.to_string()))?;
    }
    Ok(Json(extract::extract(&records)))
}

#[derive(serde::Deserialize)]
struct MatchReq {
    /// Full profile from a previous /extract call...
    #[serde(default)]
    profile: Option<SkillProfile>,
    /// ...or a raw skill list plus an optional tier override.
    #[serde(default)]
    skills: Option<Vec<String>>,
    #[serde(default)]
    tier: Option<String>,
}

#[derive(serde::Serialize)]
struct MatchResp {
    opportunities: Vec<MatchResult>,
    count: usize,
}

/// POST /match — rank the catalog against a profile or a skill/tier pair.
/// An empty result is a valid empty state, not an error.
async fn match_opportunities(
    State(state): State<AppState>,
    Json(body): Json<MatchReq>,
) -> Result<Json<MatchResp>, ApiError> {
    let profile = match (body.profile, body.skills) {
        (Some(profile), _) => profile,
        (None, Some(skills)) if !skills.is_empty() => {
            SkillProfile::from_skills(&skills, body.tier.as_deref())
        }
        _ => return Err(bad_request("Skills array is required")),
    };

    let opportunities = matcher::match_opportunities(&profile, &state.catalog);
    let count = opportunities.len();
    Ok(Json(MatchResp {
        opportunities,
        count,
    }))
}

#[derive(serde::Deserialize)]
struct TierQuery {
    #[serde(default)]
    tier: Option<String>,
}

/// GET /opportunities?tier=beginner — the raw tier partition, unranked.
async fn list_opportunities(
    State(state): State<AppState>,
    Query(q): Query<TierQuery>,
) -> Json<serde_json::Value> {
    let tier = q
        .tier
        .as_deref()
        .map(Tier::parse_or_default)
        .unwrap_or(Tier::Intermediate);
    let entries = state.catalog.for_tier(tier);
    Json(serde_json::json!({
        "tier": tier.label(),
        "count": entries.len(),
        "opportunities": entries,
    }))
}

#[derive(serde::Deserialize)]
struct ChatReq {
    #[serde(default)]
    message: String,
}

#[derive(serde::Serialize)]
struct ChatResp {
    reply: String,
}

/// POST /chat — classify one utterance. A blank message is the caller's
/// mistake (400); everything else gets a reply, fallback included. Session
/// history stays on the caller's side; nothing is stored here.
async fn chat(Json(body): Json<ChatReq>) -> Result<Json<ChatResp>, ApiError> {
    let turn = responder::ChatTurn::user(body.message);
    match responder::respond_turn(&turn) {
        Ok(reply) => Ok(Json(ChatResp { reply: reply.text })),
        Err(responder::RespondError::EmptyInput) => Err(bad_request("Message is required")),
    }
}
