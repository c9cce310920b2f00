use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agents::{Agent, AgentInfo, AgentResult, RequestContext};

/// (agent id, profile id, request kind). Identical dispatches share one computation.
type DedupKey = (String, Uuid, String);

#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationResult {
    pub context: RequestContext,
    pub results: Vec<AgentResult>,
    pub combined_text: String,
    pub succeeded: bool,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSection {
    pub agent_id: String,
    pub content: String,
    pub confidence: f64,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveInterview {
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
    pub sections: Vec<InterviewSection>,
    pub total_question_count: usize,
    pub average_confidence: f64,
}

/// Fans a request out to every applicable agent and merges their answers.
///
/// Completed work is memoized per `DedupKey` for the life of the process (until
/// `clear_cache`). Concurrent dispatches with the same key await a single computation.
pub struct Orchestrator {
    agents: Vec<Arc<dyn Agent>>,
    memo: DashMap<DedupKey, Arc<OnceCell<AgentResult>>>,
    agent_timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Self {
        Self {
            agents,
            memo: DashMap::new(),
            agent_timeout: None,
        }
    }

    /// Bounds each agent run. A run that times out leaves its memo slot empty.
    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub async fn orchestrate(&self, context: RequestContext) -> OrchestrationResult {
        info!(
            "Starting orchestration for profile {}, request kind: {}",
            context.profile_id, context.request_kind
        );

        let applicable: Vec<Arc<dyn Agent>> = self
            .agents
            .iter()
            .filter(|agent| agent.can_handle(&context))
            .cloned()
            .collect();

        if applicable.is_empty() {
            warn!("No agents can handle request kind '{}'", context.request_kind);
            return OrchestrationResult {
                context,
                results: Vec::new(),
                combined_text: "No suitable agents found for this request".to_string(),
                succeeded: false,
                metadata: Map::new(),
            };
        }

        let context = Arc::new(context);
        let handles: Vec<_> = applicable
            .iter()
            .map(|agent| {
                let key = (
                    agent.id().to_string(),
                    context.profile_id,
                    context.request_kind.clone(),
                );
                let cell = self
                    .memo
                    .entry(key)
                    .or_insert_with(|| Arc::new(OnceCell::new()))
                    .clone();
                tokio::spawn(run_memoized(
                    cell,
                    agent.clone(),
                    context.clone(),
                    self.agent_timeout,
                ))
            })
            .collect();

        let results: Vec<AgentResult> = join_all(handles)
            .await
            .into_iter()
            .zip(&applicable)
            .map(|(joined, agent)| {
                joined.unwrap_or_else(|e| {
                    error!("Error in agent {}: {e}", agent.id());
                    AgentResult::degraded(agent.id(), e)
                })
            })
            .collect();

        let combined_text = combine(&results);
        let average_confidence =
            results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;

        let mut metadata = Map::new();
        metadata.insert(
            "agents_used".to_string(),
            Value::Array(
                results
                    .iter()
                    .map(|r| Value::String(r.agent_id.clone()))
                    .collect(),
            ),
        );
        metadata.insert("average_confidence".to_string(), average_confidence.into());

        info!(
            "Orchestration finished: {} agents ({} fallbacks), average confidence {:.2}",
            results.len(),
            results.iter().filter(|r| r.is_fallback()).count(),
            average_confidence
        );

        OrchestrationResult {
            context: Arc::unwrap_or_clone(context),
            results,
            combined_text,
            succeeded: true,
            metadata,
        }
    }

    /// Runs every context concurrently. Output order matches input order.
    pub async fn execute_parallel(&self, contexts: Vec<RequestContext>) -> Vec<OrchestrationResult> {
        join_all(contexts.into_iter().map(|c| self.orchestrate(c))).await
    }

    /// Runs contexts one at a time, handing each one every memoized result so far.
    pub async fn execute_sequential(
        &self,
        contexts: Vec<RequestContext>,
    ) -> Vec<OrchestrationResult> {
        let mut out = Vec::with_capacity(contexts.len());
        for mut context in contexts {
            context.prior_responses = self.completed_results();
            out.push(self.orchestrate(context).await);
        }
        out
    }

    fn completed_results(&self) -> Vec<AgentResult> {
        self.memo
            .iter()
            .filter_map(|entry| entry.value().get().cloned())
            .collect()
    }

    pub fn clear_cache(&self) {
        self.memo.clear();
        info!("Agent response cache cleared");
    }

    pub fn available_agents(&self) -> Vec<AgentInfo> {
        self.agents.iter().map(|a| a.info()).collect()
    }

    /// Interview, technical and behavioral passes for one profile, run in parallel.
    pub async fn comprehensive_interview(
        &self,
        profile_id: Uuid,
        target_role: Option<String>,
        target_organization: Option<String>,
        difficulty: &str,
        seniority: &str,
    ) -> ComprehensiveInterview {
        let base = |kind: &str| {
            RequestContext::new(profile_id, kind)
                .with_target(target_role.clone(), target_organization.clone())
        };
        let contexts = vec![
            base("interview").with_parameter("focus", "general"),
            base("technical").with_parameter("difficulty", difficulty),
            base("behavioral").with_parameter("seniority", seniority),
        ];

        let outcomes = self.execute_parallel(contexts).await;

        let sections: Vec<InterviewSection> = outcomes
            .iter()
            .map(|o| {
                let lead = o.results.first();
                InterviewSection {
                    agent_id: lead
                        .map(|r| r.agent_id.clone())
                        .unwrap_or_else(|| "unknown".to_string()),
                    content: o.combined_text.clone(),
                    confidence: lead.map(|r| r.confidence).unwrap_or(0.0),
                    metadata: o.metadata.clone(),
                }
            })
            .collect();

        let confidences: Vec<f64> = outcomes
            .iter()
            .flat_map(|o| o.results.iter().map(|r| r.confidence))
            .collect();
        let average_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        ComprehensiveInterview {
            profile_id,
            target_role,
            target_organization,
            total_question_count: sections.len() * 5,
            sections,
            average_confidence,
        }
    }
}

async fn run_memoized(
    cell: Arc<OnceCell<AgentResult>>,
    agent: Arc<dyn Agent>,
    context: Arc<RequestContext>,
    timeout: Option<Duration>,
) -> AgentResult {
    let Some(limit) = timeout else {
        return cell.get_or_init(|| agent.process(&context)).await.clone();
    };

    let outcome = cell
        .get_or_try_init(|| async {
            tokio::time::timeout(limit, agent.process(&context)).await
        })
        .await;
    match outcome {
        Ok(result) => result.clone(),
        Err(_) => {
            warn!("Agent {} timed out after {:?}", agent.id(), limit);
            AgentResult::degraded(agent.id(), "timed out")
        }
    }
}

/// Markdown summary with one section per agent, highest confidence first.
fn combine(results: &[AgentResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut ranked: Vec<&AgentResult> = results.iter().collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut out = String::from("## Multi-Agent Analysis Results\n\n");
    for (i, result) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "### {}. {} (Confidence: {:.2}%)\n",
            i + 1,
            result.agent_id,
            result.confidence * 100.0
        );
        let _ = writeln!(out, "{}\n", result.content);

        if !result.metadata.is_empty() {
            out.push_str("**Metadata:**\n");
            for (key, value) in &result.metadata {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let _ = writeln!(out, "- {key}: {rendered}");
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::agents::base::testing::ScriptedBackend;
    use crate::agents::Specialization;
    use crate::models::profile::SkillLevel;
    use crate::profiles::memory::{sample_profile, sample_skill};
    use crate::profiles::InMemoryProfileStore;

    /// Test agent with a fixed confidence, an optional delay and an optional panic.
    struct StubAgent {
        id: &'static str,
        kinds: &'static [&'static str],
        confidence: f64,
        delay: Duration,
        panics: bool,
        calls: AtomicUsize,
        seen_prior: Mutex<Vec<usize>>,
    }

    impl StubAgent {
        fn new(id: &'static str, kinds: &'static [&'static str], confidence: f64) -> Self {
            Self {
                id,
                kinds,
                confidence,
                delay: Duration::ZERO,
                panics: false,
                calls: AtomicUsize::new(0),
                seen_prior: Mutex::new(Vec::new()),
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn panicking(mut self) -> Self {
            self.panics = true;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn id(&self) -> &'static str {
            self.id
        }

        fn description(&self) -> &'static str {
            "stub"
        }

        fn specialization(&self) -> Specialization {
            Specialization::Interview
        }

        fn can_handle(&self, context: &RequestContext) -> bool {
            self.kinds.contains(&context.request_kind.as_str())
        }

        async fn process(&self, context: &RequestContext) -> AgentResult {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.seen_prior
                .lock()
                .unwrap()
                .push(context.prior_responses.len());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.panics {
                panic!("stub agent exploded");
            }
            AgentResult {
                agent_id: self.id.to_string(),
                content: format!("{} answer #{call}", self.id),
                confidence: self.confidence,
                metadata: Map::new(),
                generation: None,
            }
        }
    }

    fn ctx(kind: &str) -> RequestContext {
        RequestContext::new(Uuid::nil(), kind)
    }

    #[tokio::test]
    async fn test_no_applicable_agent() {
        let orchestrator = Orchestrator::new(vec![Arc::new(StubAgent::new("a", &["x"], 0.9))]);

        let out = orchestrator.orchestrate(ctx("unknown")).await;

        assert!(!out.succeeded);
        assert!(out.results.is_empty());
        assert_eq!(out.combined_text, "No suitable agents found for this request");
    }

    #[tokio::test]
    async fn test_concurrent_identical_dispatch_runs_agent_once() {
        let agent = Arc::new(StubAgent::new("slow", &["interview"], 0.8).slow(Duration::from_millis(50)));
        let orchestrator = Orchestrator::new(vec![agent.clone()]);

        let (first, second) = tokio::join!(
            orchestrator.orchestrate(ctx("interview")),
            orchestrator.orchestrate(ctx("interview"))
        );

        assert_eq!(agent.calls(), 1);
        assert_eq!(first.results, second.results);
        assert_eq!(first.results[0].content, "slow answer #1");
    }

    #[tokio::test]
    async fn test_panicking_agent_does_not_drop_siblings() {
        let orchestrator = Orchestrator::new(vec![
            Arc::new(StubAgent::new("boom", &["interview"], 0.9).panicking()),
            Arc::new(StubAgent::new("steady", &["interview"], 0.7)),
        ]);

        let out = orchestrator.orchestrate(ctx("interview")).await;

        assert!(out.succeeded);
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.results[0].agent_id, "boom");
        assert_eq!(out.results[0].confidence, 0.0);
        assert!(out.results[0].metadata.contains_key("error"));
        assert_eq!(out.results[1].content, "steady answer #1");
        assert_eq!(out.metadata["agents_used"], serde_json::json!(["boom", "steady"]));
        assert!((out.metadata["average_confidence"].as_f64().unwrap() - 0.35).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_combined_text_ranks_by_confidence() {
        let orchestrator = Orchestrator::new(vec![
            Arc::new(StubAgent::new("low", &["k"], 0.5)),
            Arc::new(StubAgent::new("high", &["k"], 0.9)),
            Arc::new(StubAgent::new("mid", &["k"], 0.7)),
            Arc::new(StubAgent::new("mid_twin", &["k"], 0.7)),
        ]);

        let out = orchestrator.orchestrate(ctx("k")).await;
        let text = &out.combined_text;

        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("### 1. high (Confidence: 90.00%)") < pos("### 2. mid (Confidence: 70.00%)"));
        assert!(pos("### 2. mid ") < pos("### 3. mid_twin "));
        assert!(pos("### 3. mid_twin ") < pos("### 4. low (Confidence: 50.00%)"));

        let ids: Vec<&str> = out.results.iter().map(|r| r.agent_id.as_str()).collect();
        assert_eq!(ids, ["low", "high", "mid", "mid_twin"]);
    }

    #[tokio::test]
    async fn test_execute_parallel_preserves_input_order() {
        let orchestrator = Orchestrator::new(vec![
            Arc::new(StubAgent::new("a", &["first"], 0.9).slow(Duration::from_millis(30))),
            Arc::new(StubAgent::new("b", &["second"], 0.9)),
        ]);

        let out = orchestrator
            .execute_parallel(vec![ctx("first"), ctx("second"), ctx("none")])
            .await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].context.request_kind, "first");
        assert_eq!(out[1].context.request_kind, "second");
        assert!(!out[2].succeeded);
    }

    #[tokio::test]
    async fn test_execute_sequential_feeds_prior_results() {
        let a = Arc::new(StubAgent::new("a", &["first"], 0.9));
        let b = Arc::new(StubAgent::new("b", &["second"], 0.9));
        let orchestrator = Orchestrator::new(vec![a.clone(), b.clone()]);

        let out = orchestrator
            .execute_sequential(vec![ctx("first"), ctx("second")])
            .await;

        assert_eq!(out.len(), 2);
        assert_eq!(*a.seen_prior.lock().unwrap(), vec![0]);
        assert_eq!(*b.seen_prior.lock().unwrap(), vec![1]);
        assert_eq!(out[1].context.prior_responses[0].agent_id, "a");
    }

    #[tokio::test]
    async fn test_clear_cache_forces_recompute() {
        let agent = Arc::new(StubAgent::new("a", &["k"], 0.9));
        let orchestrator = Orchestrator::new(vec![agent.clone()]);

        orchestrator.orchestrate(ctx("k")).await;
        orchestrator.orchestrate(ctx("k")).await;
        assert_eq!(agent.calls(), 1);

        orchestrator.clear_cache();
        let out = orchestrator.orchestrate(ctx("k")).await;
        assert_eq!(agent.calls(), 2);
        assert_eq!(out.results[0].content, "a answer #2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_agent_is_degraded_and_retried() {
        let agent = Arc::new(StubAgent::new("slow", &["k"], 0.9).slow(Duration::from_secs(10)));
        let orchestrator = Orchestrator::new(vec![agent.clone()])
            .with_agent_timeout(Some(Duration::from_secs(1)));

        let out = orchestrator.orchestrate(ctx("k")).await;
        assert_eq!(out.results[0].confidence, 0.0);
        assert_eq!(out.results[0].metadata["error"], "timed out");

        orchestrator.orchestrate(ctx("k")).await;
        assert_eq!(agent.calls(), 2);
    }

    #[test]
    fn test_available_agents_lists_registration_order() {
        let orchestrator = Orchestrator::new(vec![
            Arc::new(StubAgent::new("a", &["k"], 0.9)),
            Arc::new(StubAgent::new("b", &["k"], 0.9)),
        ]);
        let ids: Vec<String> = orchestrator
            .available_agents()
            .into_iter()
            .map(|info| info.id)
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_comprehensive_interview_uses_three_agents() {
        let id = Uuid::new_v4();
        let store = Arc::new(InMemoryProfileStore::new());
        store.insert(
            sample_profile(id, 4, Some("Backend Developer"), &["Coupang"]),
            vec![sample_skill("Kotlin", SkillLevel::Advanced, 4)],
        );
        let backend = Arc::new(ScriptedBackend::replying("{\"questions\": []}"));
        let cache = Arc::new(crate::cache::SimilarityCache::new(
            store.clone(),
            chrono::Duration::hours(24),
        ));
        let orchestrator =
            Orchestrator::new(crate::agents::default_agents(store, backend.clone(), cache));

        let report = orchestrator
            .comprehensive_interview(id, Some("Backend Developer".into()), None, "INTERMEDIATE", "MID")
            .await;

        let ids: Vec<&str> = report.sections.iter().map(|s| s.agent_id.as_str()).collect();
        assert_eq!(ids, ["interview", "technical", "behavioral"]);
        assert_eq!(report.total_question_count, 15);
        assert_eq!(backend.call_count(), 3);
        // interview 0.8, technical 0.7, behavioral 0.75 for a short reply
        assert!((report.average_confidence - 0.75).abs() < 1e-9);
    }
}
