use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Which content map an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKind {
    Questions,
    LearningPath,
}

impl CacheKind {
    pub const ALL: [CacheKind; 2] = [CacheKind::Questions, CacheKind::LearningPath];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "questions" => Some(CacheKind::Questions),
            "learning-path" => Some(CacheKind::LearningPath),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::Questions => "questions",
            CacheKind::LearningPath => "learning-path",
        }
    }
}

/// Slot identity in a content map. Different roles or organizations are
/// distinct slots even for the same profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub profile_id: Uuid,
    pub target_role: Option<String>,
    pub target_organization: Option<String>,
}

impl CacheKey {
    pub fn new(
        profile_id: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
    ) -> Self {
        Self {
            profile_id,
            target_role: target_role.map(str::to_string),
            target_organization: target_organization.map(str::to_string),
        }
    }
}

/// Generated content plus its provenance. Stored with confidence 1.0; copies
/// handed out by lookups carry the similarity-adjusted confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry {
    pub payload: String,
    pub metadata: Map<String, Value>,
    pub cached_at: DateTime<Utc>,
    pub confidence: f64,
    pub similarity_score: f64,
}

/// Unordered profile pair, stored as `(min, max)` so `(a, b)` and `(b, a)` are one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfilePairKey(Uuid, Uuid);

impl ProfilePairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Process-lifetime hit/miss counters. Reset only by a full clear.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub total_hit_latency: Duration,
    pub total_miss_latency: Duration,
}

impl CacheStatistics {
    pub fn record_hit(&mut self, latency: Duration) {
        self.hits += 1;
        self.total_hit_latency += latency;
    }

    pub fn record_miss(&mut self, latency: Duration) {
        self.misses += 1;
        self.total_miss_latency += latency;
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn avg_hit_latency(&self) -> Duration {
        average(self.total_hit_latency, self.hits)
    }

    pub fn avg_miss_latency(&self) -> Duration {
        average(self.total_miss_latency, self.misses)
    }
}

fn average(total: Duration, count: u64) -> Duration {
    match u32::try_from(count) {
        Ok(0) => Duration::ZERO,
        Ok(n) => total / n,
        Err(_) => Duration::from_secs_f64(total.as_secs_f64() / count as f64),
    }
}

/// Entry counts per map, as reported by the statistics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheSizes {
    pub questions: usize,
    pub learning_paths: usize,
    pub similarity_memo: usize,
}

impl CacheSizes {
    pub fn total(&self) -> usize {
        self.questions + self.learning_paths + self.similarity_memo
    }
}

/// Outcome of a warm-up run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmupReport {
    pub profiles_processed: usize,
    pub entries_created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(ProfilePairKey::new(a, b), ProfilePairKey::new(b, a));
        assert_eq!(ProfilePairKey::new(a, a), ProfilePairKey::new(a, a));
    }

    #[test]
    fn test_cache_kind_wire_names() {
        assert_eq!(CacheKind::parse("questions"), Some(CacheKind::Questions));
        assert_eq!(CacheKind::parse("learning-path"), Some(CacheKind::LearningPath));
        assert_eq!(CacheKind::parse("resume"), None);
        assert_eq!(
            serde_json::to_value(CacheKind::LearningPath).unwrap(),
            serde_json::json!("learning-path")
        );
    }

    #[test]
    fn test_statistics_derived_values() {
        let mut stats = CacheStatistics::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.avg_hit_latency(), Duration::ZERO);
        assert_eq!(stats.avg_miss_latency(), Duration::ZERO);

        stats.record_hit(Duration::from_millis(10));
        stats.record_hit(Duration::from_millis(30));
        stats.record_miss(Duration::from_millis(100));

        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.avg_hit_latency(), Duration::from_millis(20));
        assert_eq!(stats.avg_miss_latency(), Duration::from_millis(100));
    }
}
