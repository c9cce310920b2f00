use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::{
    CacheKey, CacheKind, CacheSizes, CacheStatistics, CachedEntry, ProfilePairKey, WarmupReport,
};
use super::CacheError;
use crate::models::profile::{Profile, Skill};
use crate::profiles::{load_snapshot, ProfileDirectory, ProfileStore};
use crate::similarity::vocabulary::{is_large_tech, is_startup, normalize_role};
use crate::similarity::{score, SimilarityScore};

pub const DEFAULT_WARMUP_ROLES: &[&str] = &[
    "백엔드 개발자",
    "프론트엔드 개발자",
    "풀스택 개발자",
    "데이터 엔지니어",
];

pub const DEFAULT_WARMUP_ORGANIZATIONS: &[Option<&str>] = &[
    Some("네이버"),
    Some("카카오"),
    Some("쿠팡"),
    Some("토스"),
    None,
];

/// In-memory content cache answering "have we generated something close enough already?".
///
/// Entries are keyed by (profile, target role, target organization). A lookup scans the
/// live entries of one kind, scores the requester against each entry's owner (memoized
/// per unordered profile pair) and returns the first cacheable, fuzzily-matching entry.
pub struct SimilarityCache {
    directory: Arc<dyn ProfileDirectory>,
    ttl: Duration,
    questions: DashMap<CacheKey, CachedEntry>,
    learning_paths: DashMap<CacheKey, CachedEntry>,
    similarity_memo: DashMap<ProfilePairKey, SimilarityScore>,
    stats: Mutex<CacheStatistics>,
}

impl SimilarityCache {
    pub fn new(directory: Arc<dyn ProfileDirectory>, ttl: Duration) -> Self {
        Self {
            directory,
            ttl,
            questions: DashMap::new(),
            learning_paths: DashMap::new(),
            similarity_memo: DashMap::new(),
            stats: Mutex::new(CacheStatistics::default()),
        }
    }

    fn entries(&self, kind: CacheKind) -> &DashMap<CacheKey, CachedEntry> {
        match kind {
            CacheKind::Questions => &self.questions,
            CacheKind::LearningPath => &self.learning_paths,
        }
    }

    fn is_live(&self, entry: &CachedEntry, now: DateTime<Utc>) -> bool {
        now - entry.cached_at < self.ttl
    }

    /// Finds a live entry of `kind` generated for a profile similar to `profile_id`.
    ///
    /// The returned copy carries `confidence = stored × similarity` and the similarity
    /// itself in `similarity_score`. Every call is recorded as a hit or a miss.
    pub async fn find_similar(
        &self,
        kind: CacheKind,
        profile_id: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
    ) -> Option<CachedEntry> {
        let started = Instant::now();
        let found = self
            .scan(kind, profile_id, target_role, target_organization)
            .await;

        let elapsed = started.elapsed();
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        match &found {
            Some(entry) => {
                stats.record_hit(elapsed);
                info!(
                    "{} cache hit for profile {profile_id} (similarity {:.2})",
                    kind.as_str(),
                    entry.similarity_score
                );
            }
            None => {
                stats.record_miss(elapsed);
                debug!("{} cache miss for profile {profile_id}", kind.as_str());
            }
        }
        found
    }

    async fn scan(
        &self,
        kind: CacheKind,
        profile_id: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
    ) -> Option<CachedEntry> {
        let (profile, skills) = load_snapshot(self.directory.as_ref(), profile_id).await?;

        // Snapshot so no shard lock is held while owner profiles are resolved.
        let now = Utc::now();
        let mut candidates: Vec<(CacheKey, CachedEntry)> = self
            .entries(kind)
            .iter()
            .filter(|e| self.is_live(e.value(), now))
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        candidates.sort_by(|a, b| b.1.cached_at.cmp(&a.1.cached_at));

        for (key, entry) in candidates {
            let Some(similarity) = self
                .similarity_for(&profile, &skills, key.profile_id, target_role, target_organization)
                .await
            else {
                continue;
            };
            if !similarity.is_cacheable {
                continue;
            }

            let role_ok = role_matches(target_role, key.target_role.as_deref());
            let organization_ok = kind == CacheKind::LearningPath
                || organization_matches(target_organization, key.target_organization.as_deref());
            if role_ok && organization_ok {
                return Some(CachedEntry {
                    confidence: entry.confidence * similarity.overall,
                    similarity_score: similarity.overall,
                    ..entry
                });
            }
        }
        None
    }

    /// Memoized per unordered pair; the first computation's target role sticks until
    /// the memo is swept.
    async fn similarity_for(
        &self,
        requester: &Profile,
        requester_skills: &[Skill],
        owner_id: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
    ) -> Option<SimilarityScore> {
        let pair = ProfilePairKey::new(requester.id, owner_id);
        let memoized = self.similarity_memo.get(&pair).map(|s| s.value().clone());
        if memoized.is_some() {
            return memoized;
        }

        let (owner, owner_skills) = load_snapshot(self.directory.as_ref(), owner_id).await?;
        let similarity = score(
            requester,
            requester_skills,
            &owner,
            &owner_skills,
            target_role,
            target_organization,
        );
        self.similarity_memo.insert(pair, similarity.clone());
        Some(similarity)
    }

    /// Stores `payload` for the given slot with confidence 1.0, replacing any previous entry.
    pub fn put(
        &self,
        kind: CacheKind,
        profile_id: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
        payload: String,
        metadata: Map<String, Value>,
    ) {
        self.put_at(
            kind,
            CacheKey::new(profile_id, target_role, target_organization),
            payload,
            metadata,
            Utc::now(),
        );
    }

    pub(crate) fn put_at(
        &self,
        kind: CacheKind,
        key: CacheKey,
        payload: String,
        metadata: Map<String, Value>,
        cached_at: DateTime<Utc>,
    ) {
        debug!("Caching {} for profile {}", kind.as_str(), key.profile_id);
        self.entries(kind).insert(
            key,
            CachedEntry {
                payload,
                metadata,
                cached_at,
                confidence: 1.0,
                similarity_score: 1.0,
            },
        );
    }

    /// Empties every map and resets the statistics.
    pub fn clear_all(&self) {
        self.questions.clear();
        self.learning_paths.clear();
        self.similarity_memo.clear();
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = CacheStatistics::default();
        info!("All caches cleared");
    }

    /// Drops expired content entries and the whole similarity memo.
    /// Returns the number of content entries removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        for kind in CacheKind::ALL {
            self.entries(kind).retain(|_, entry| {
                let keep = self.is_live(entry, now);
                if !keep {
                    removed += 1;
                }
                keep
            });
        }
        self.similarity_memo.clear();
        info!("Cache sweep completed: removed {removed} expired entries");
        removed
    }

    pub fn stats(&self) -> CacheStatistics {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sizes(&self) -> CacheSizes {
        CacheSizes {
            questions: self.questions.len(),
            learning_paths: self.learning_paths.len(),
            similarity_memo: self.similarity_memo.len(),
        }
    }

    /// Fresh, unmemoized score between two stored profiles.
    pub async fn similarity_between(
        &self,
        profile_a: Uuid,
        profile_b: Uuid,
        target_role: Option<&str>,
        target_organization: Option<&str>,
    ) -> Result<SimilarityScore, CacheError> {
        let (a, skills_a) = load_snapshot(self.directory.as_ref(), profile_a)
            .await
            .ok_or(CacheError::ProfileNotFound(profile_a))?;
        let (b, skills_b) = load_snapshot(self.directory.as_ref(), profile_b)
            .await
            .ok_or(CacheError::ProfileNotFound(profile_b))?;

        Ok(score(
            &a,
            &skills_a,
            &b,
            &skills_b,
            target_role,
            target_organization,
        ))
    }

    /// Seeds placeholder question entries for every (profile, role, organization)
    /// combination. Unknown profiles are skipped.
    pub async fn warmup(
        &self,
        profile_ids: &[Uuid],
        roles: &[String],
        organizations: &[Option<String>],
    ) -> WarmupReport {
        let mut report = WarmupReport::default();

        for &profile_id in profile_ids {
            let profile = match self.directory.get(profile_id).await {
                Ok(Some(profile)) => profile,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Warm-up skipped profile {profile_id}: {e}");
                    continue;
                }
            };
            report.profiles_processed += 1;

            for role in roles {
                for organization in organizations {
                    let payload = json!({
                        "questions": [{
                            "type": "warmup",
                            "question": format!(
                                "Cached for {} - {} at {}",
                                profile.name,
                                role,
                                organization.as_deref().unwrap_or("any organization")
                            ),
                        }]
                    });
                    let mut metadata = Map::new();
                    metadata.insert("warmup".to_string(), Value::Bool(true));

                    self.put(
                        CacheKind::Questions,
                        profile_id,
                        Some(role),
                        organization.as_deref(),
                        payload.to_string(),
                        metadata,
                    );
                    report.entries_created += 1;
                }
            }
        }

        info!(
            "Cache warm-up: {} profiles, {} entries",
            report.profiles_processed, report.entries_created
        );
        report
    }
}

/// Absent request value matches anything; otherwise exact, or equal/contained after
/// role normalization.
fn role_matches(requested: Option<&str>, stored: Option<&str>) -> bool {
    let Some(requested) = requested else {
        return true;
    };
    let Some(stored) = stored else {
        return false;
    };
    if requested == stored {
        return true;
    }

    let requested = normalize_role(requested);
    let stored = normalize_role(stored);
    requested == stored || requested.contains(&stored) || stored.contains(&requested)
}

fn organization_matches(requested: Option<&str>, stored: Option<&str>) -> bool {
    let Some(requested) = requested else {
        return true;
    };
    let Some(stored) = stored else {
        return false;
    };

    requested.to_lowercase() == stored.to_lowercase()
        || (is_startup(requested) && is_startup(stored))
        || (is_large_tech(requested) && is_large_tech(stored))
}
