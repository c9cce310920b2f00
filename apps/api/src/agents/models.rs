use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::llm_client::Generation;

/// What is being asked, for whom. Immutable for the lifetime of one dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    pub request_kind: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub prior_responses: Vec<AgentResult>,
}

impl RequestContext {
    pub fn new(profile_id: Uuid, request_kind: impl Into<String>) -> Self {
        Self {
            profile_id,
            target_role: None,
            target_organization: None,
            request_kind: request_kind.into(),
            parameters: Map::new(),
            prior_responses: Vec::new(),
        }
    }

    pub fn with_target(mut self, role: Option<String>, organization: Option<String>) -> Self {
        self.target_role = role;
        self.target_organization = organization;
        self
    }

    pub fn with_parameter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

/// One agent's answer to one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_id: String,
    pub content: String,
    pub confidence: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<Generation>,
}

impl AgentResult {
    /// Result standing in for an agent that failed outright (panicked or timed out).
    pub fn degraded(agent_id: &str, error: impl std::fmt::Display) -> Self {
        let mut metadata = Map::new();
        metadata.insert("error".to_string(), Value::String(error.to_string()));
        Self {
            agent_id: agent_id.to_string(),
            content: "Agent processing failed".to_string(),
            confidence: 0.0,
            metadata,
            generation: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.metadata.get("fallback") == Some(&Value::Bool(true))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialization {
    Interview,
    Technical,
    Behavioral,
    CareerPath,
}

impl Specialization {
    pub fn as_str(self) -> &'static str {
        match self {
            Specialization::Interview => "INTERVIEW",
            Specialization::Technical => "TECHNICAL",
            Specialization::Behavioral => "BEHAVIORAL",
            Specialization::CareerPath => "CAREER_PATH",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub id: String,
    pub description: String,
    pub specialization: Specialization,
}
