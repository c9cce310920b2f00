use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::agents::{AgentInfo, RequestContext};
use crate::errors::AppError;
use crate::orchestrator::service::{ComprehensiveInterview, OrchestrationResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OrchestrateRequest {
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    pub request_kind: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl OrchestrateRequest {
    fn into_context(self) -> Result<RequestContext, AppError> {
        if self.request_kind.trim().is_empty() {
            return Err(AppError::Validation("request_kind must not be empty".to_string()));
        }
        let mut context = RequestContext::new(self.profile_id, self.request_kind)
            .with_target(self.target_role, self.target_organization);
        context.parameters = self.parameters;
        Ok(context)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    #[default]
    Parallel,
    Sequential,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub mode: BatchMode,
    pub requests: Vec<OrchestrateRequest>,
}

#[derive(Deserialize)]
pub struct ComprehensiveInterviewRequest {
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_seniority")]
    pub seniority_level: String,
}

fn default_difficulty() -> String {
    "INTERMEDIATE".to_string()
}

fn default_seniority() -> String {
    "MID".to_string()
}

/// POST /api/v1/agents/orchestrate
pub async fn handle_orchestrate(
    State(state): State<AppState>,
    Json(req): Json<OrchestrateRequest>,
) -> Result<Json<OrchestrationResult>, AppError> {
    let context = req.into_context()?;
    Ok(Json(state.orchestrator.orchestrate(context).await))
}

/// POST /api/v1/agents/batch
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Vec<OrchestrationResult>>, AppError> {
    if req.requests.is_empty() {
        return Err(AppError::Validation("requests must not be empty".to_string()));
    }
    let contexts = req
        .requests
        .into_iter()
        .map(OrchestrateRequest::into_context)
        .collect::<Result<Vec<_>, _>>()?;

    let results = match req.mode {
        BatchMode::Parallel => state.orchestrator.execute_parallel(contexts).await,
        BatchMode::Sequential => state.orchestrator.execute_sequential(contexts).await,
    };
    Ok(Json(results))
}

/// POST /api/v1/agents/interview-questions
pub async fn handle_comprehensive_interview(
    State(state): State<AppState>,
    Json(req): Json<ComprehensiveInterviewRequest>,
) -> Json<ComprehensiveInterview> {
    Json(
        state
            .orchestrator
            .comprehensive_interview(
                req.profile_id,
                req.target_role,
                req.target_organization,
                &req.difficulty,
                &req.seniority_level,
            )
            .await,
    )
}

/// GET /api/v1/agents/available
pub async fn handle_available(State(state): State<AppState>) -> Json<Vec<AgentInfo>> {
    Json(state.orchestrator.available_agents())
}

/// DELETE /api/v1/agents/cache
pub async fn handle_clear_cache(State(state): State<AppState>) -> Json<Value> {
    state.orchestrator.clear_cache();
    Json(json!({ "message": "Cache cleared successfully" }))
}
