use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::cache::models::{CacheKind, CacheSizes};
use crate::cache::store::{DEFAULT_WARMUP_ORGANIZATIONS, DEFAULT_WARMUP_ROLES};
use crate::errors::AppError;
use crate::similarity::scorer::DimensionScores;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub hit_rate: String,
    pub total_hits: u64,
    pub total_misses: u64,
    pub average_hit_time: String,
    pub average_miss_time: String,
    pub cache_size: CacheSizes,
    pub total_cache_entries: usize,
}

#[derive(Deserialize)]
pub struct SimilarCachedQuery {
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct CachedDataResponse {
    pub found: bool,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub message: String,
}

#[derive(Deserialize)]
pub struct PutEntryRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    pub payload: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct SimilarityRequest {
    pub profile_id_1: Uuid,
    pub profile_id_2: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
}

#[derive(Serialize)]
pub struct SimilarityResponse {
    pub profile_id_1: Uuid,
    pub profile_id_2: Uuid,
    pub overall_score: f64,
    pub by_dimension: DimensionScores,
    pub is_highly_similar: bool,
    pub is_cacheable: bool,
    pub explanation: String,
    pub recommendation: String,
}

#[derive(Deserialize)]
pub struct WarmupRequest {
    pub profile_ids: Vec<Uuid>,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub target_organizations: Vec<String>,
}

#[derive(Serialize)]
pub struct WarmupResponse {
    pub profiles_processed: usize,
    pub entries_created: usize,
    pub message: String,
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub removed: usize,
}

/// GET /api/v1/cache/statistics
pub async fn handle_statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    let stats = state.cache.stats();
    let sizes = state.cache.sizes();
    Json(StatisticsResponse {
        hit_rate: format!("{:.2}%", stats.hit_rate() * 100.0),
        total_hits: stats.hits,
        total_misses: stats.misses,
        average_hit_time: format!("{:.2} ms", stats.avg_hit_latency().as_secs_f64() * 1000.0),
        average_miss_time: format!("{:.2} ms", stats.avg_miss_latency().as_secs_f64() * 1000.0),
        cache_size: sizes,
        total_cache_entries: sizes.total(),
    })
}

/// GET /api/v1/cache/profile/:id/similar-cached
pub async fn handle_find_similar(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(params): Query<SimilarCachedQuery>,
) -> Json<CachedDataResponse> {
    let raw_kind = params.kind.unwrap_or_else(|| "questions".to_string());
    let Some(kind) = CacheKind::parse(&raw_kind) else {
        return Json(CachedDataResponse {
            found: false,
            kind: raw_kind,
            data: None,
            confidence: None,
            similarity_score: None,
            metadata: None,
            message: "unsupported cache type".to_string(),
        });
    };

    let found = state
        .cache
        .find_similar(
            kind,
            profile_id,
            params.target_role.as_deref(),
            params.target_organization.as_deref(),
        )
        .await;

    Json(match found {
        Some(entry) => CachedDataResponse {
            found: true,
            kind: kind.as_str().to_string(),
            data: Some(entry.payload),
            confidence: Some(entry.confidence),
            similarity_score: Some(entry.similarity_score),
            metadata: Some(entry.metadata),
            message: format!("Found cached {} from a similar profile", kind.as_str()),
        },
        None => CachedDataResponse {
            found: false,
            kind: kind.as_str().to_string(),
            data: None,
            confidence: None,
            similarity_score: None,
            metadata: None,
            message: "No similar cached data found".to_string(),
        },
    })
}

/// POST /api/v1/cache/entries
pub async fn handle_put_entry(
    State(state): State<AppState>,
    Json(req): Json<PutEntryRequest>,
) -> Result<StatusCode, AppError> {
    let kind = CacheKind::parse(&req.kind)
        .ok_or_else(|| AppError::Validation(format!("unsupported cache type '{}'", req.kind)))?;
    if req.payload.trim().is_empty() {
        return Err(AppError::Validation("payload must not be empty".to_string()));
    }

    state.cache.put(
        kind,
        req.profile_id,
        req.target_role.as_deref(),
        req.target_organization.as_deref(),
        req.payload,
        req.metadata,
    );
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/cache/clear
pub async fn handle_clear(State(state): State<AppState>) -> Json<Value> {
    state.cache.clear_all();
    Json(serde_json::json!({ "message": "All caches cleared successfully" }))
}

/// POST /api/v1/cache/sweep
pub async fn handle_sweep(State(state): State<AppState>) -> Json<SweepResponse> {
    Json(SweepResponse {
        removed: state.cache.sweep_expired(),
    })
}

/// POST /api/v1/cache/similarity/calculate
pub async fn handle_similarity(
    State(state): State<AppState>,
    Json(req): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, AppError> {
    let score = state
        .cache
        .similarity_between(
            req.profile_id_1,
            req.profile_id_2,
            req.target_role.as_deref(),
            req.target_organization.as_deref(),
        )
        .await?;

    Ok(Json(SimilarityResponse {
        profile_id_1: req.profile_id_1,
        profile_id_2: req.profile_id_2,
        overall_score: score.overall,
        recommendation: score.recommendation().to_string(),
        is_highly_similar: score.is_highly_similar,
        is_cacheable: score.is_cacheable,
        by_dimension: score.by_dimension,
        explanation: score.explanation,
    }))
}

/// POST /api/v1/cache/warmup
pub async fn handle_warmup(
    State(state): State<AppState>,
    Json(req): Json<WarmupRequest>,
) -> Result<Json<WarmupResponse>, AppError> {
    if req.profile_ids.is_empty() {
        return Err(AppError::Validation(
            "profile_ids must list at least one profile".to_string(),
        ));
    }

    let roles: Vec<String> = if req.target_roles.is_empty() {
        DEFAULT_WARMUP_ROLES.iter().map(|r| r.to_string()).collect()
    } else {
        req.target_roles
    };
    let organizations: Vec<Option<String>> = if req.target_organizations.is_empty() {
        DEFAULT_WARMUP_ORGANIZATIONS
            .iter()
            .map(|o| o.map(str::to_string))
            .collect()
    } else {
        req.target_organizations.into_iter().map(Some).collect()
    };

    let report = state
        .cache
        .warmup(&req.profile_ids, &roles, &organizations)
        .await;

    Ok(Json(WarmupResponse {
        profiles_processed: report.profiles_processed,
        entries_created: report.entries_created,
        message: "Cache warmup completed successfully".to_string(),
    }))
}
