//! signal.rs — Shared data model for the aggregation pipeline.
//!
//! A `SourceRecord` is the normalized hand-off shape every collector produces;
//! the extractor fuses a batch of them into a `SkillProfile`. Both are plain
//! serde records so the API layer can pass them through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Where a record came from. The enum order doubles as the fixed source
/// priority (CodeHost > ProfessionalNetwork > Microblog) used when breaking
/// strength ties — declared code wins over a bio which wins over a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    CodeHost,
    ProfessionalNetwork,
    Microblog,
}

impl SourceKind {
    /// Lower rank = higher priority in tie-breaks.
    pub fn priority_rank(self) -> u8 {
        match self {
            SourceKind::CodeHost => 0,
            SourceKind::ProfessionalNetwork => 1,
            SourceKind::Microblog => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::CodeHost => "code_host",
            SourceKind::ProfessionalNetwork => "professional_network",
            SourceKind::Microblog => "microblog",
        }
    }
}

/// One source's worth of raw evidence, already fetched and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub kind: SourceKind,
    /// Profile identifier at the source. Must be non-empty.
    pub handle: String,
    /// Source-specific counters (repo count, follower count, ...).
    #[serde(default)]
    pub metrics: BTreeMap<String, u64>,
    /// Free-text snippets scanned for skill keywords, in source order.
    #[serde(default)]
    pub text_signals: Vec<String>,
    /// Labels the source itself asserts (e.g. a repo's language). Scored
    /// higher than keyword hits.
    #[serde(default)]
    pub declared_tags: Vec<String>,
}

impl SourceRecord {
    pub fn new(kind: SourceKind, handle: impl Into<String>) -> Self {
        Self {
            kind,
            handle: handle.into(),
            metrics: BTreeMap::new(),
            text_signals: Vec::new(),
            declared_tags: Vec::new(),
        }
    }

    /// Boundary check: a record with a blank handle never reaches the
    /// extractor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.handle.trim().is_empty() {
            return Err(ValidationError::EmptyHandle { kind: self.kind });
        }
        Ok(())
    }
}

/// Structural violation of a required field, raised at the adapter boundary
/// so the pure pipeline functions stay total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} record has an empty handle", .kind.label())]
    EmptyHandle { kind: SourceKind },
}

/// Discrete experience bucket. Ordering matters: it gates which catalog
/// entries are visible (`Beginner < Intermediate < Advanced`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    /// Permissive parse for caller-supplied overrides. Unknown strings fall
    /// back to `Intermediate` rather than failing, mirroring the defaulting
    /// already baked into the matching policy.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Tier::Beginner,
            "intermediate" => Tier::Intermediate,
            "advanced" => Tier::Advanced,
            _ => Tier::Intermediate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
        }
    }
}

/// Fused output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProfile {
    /// Canonical skill name → proficiency score in 0..=100. Keys are unique;
    /// scores only ever grow as corroborating evidence is added.
    #[serde(default)]
    pub skills: BTreeMap<String, u32>,
    pub tier: Tier,
    /// Top skills by score; ties broken by first sighting in source-priority
    /// order, then by insertion order within a source.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// In-demand skills the profile is missing or weak on, in the reference
    /// set's order.
    #[serde(default)]
    pub growth_areas: Vec<String>,
}

impl SkillProfile {
    /// The defined default for "no evidence at all": empty skills, Beginner.
    pub fn empty() -> Self {
        Self {
            skills: BTreeMap::new(),
            tier: Tier::Beginner,
            strengths: Vec::new(),
            growth_areas: Vec::new(),
        }
    }

    /// Build a minimal profile from an explicit skill list plus an optional
    /// tier override string. Used by callers that skip aggregation and hand
    /// the matcher a raw skill/tier pair.
    pub fn from_skills(skills: &[String], tier_override: Option<&str>) -> Self {
        let mut map = BTreeMap::new();
        for s in skills {
            let name = s.trim();
            if !name.is_empty() {
                map.entry(name.to_string()).or_insert(60u32);
            }
        }
        Self {
            skills: map,
            tier: tier_override.map(Tier::parse_or_default).unwrap_or(Tier::Intermediate),
            strengths: Vec::new(),
            growth_areas: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_gates_correctly() {
        assert!(Tier::Beginner < Tier::Intermediate);
        assert!(Tier::Intermediate < Tier::Advanced);
    }

    #[test]
    fn tier_parse_is_case_insensitive_and_permissive() {
        assert_eq!(Tier::parse_or_default("Beginner"), Tier::Beginner);
        assert_eq!(Tier::parse_or_default("ADVANCED"), Tier::Advanced);
        assert_eq!(Tier::parse_or_default(" intermediate "), Tier::Intermediate);
        // unknown override falls back instead of failing
        assert_eq!(Tier::parse_or_default("wizard"), Tier::Intermediate);
    }

    #[test]
    fn blank_handle_is_rejected() {
        let rec = SourceRecord::new(SourceKind::CodeHost, "   ");
        assert!(matches!(
            rec.validate(),
            Err(ValidationError::EmptyHandle { .. })
        ));
        let ok = SourceRecord::new(SourceKind::CodeHost, "octocat");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn source_priority_order() {
        assert!(SourceKind::CodeHost.priority_rank() < SourceKind::ProfessionalNetwork.priority_rank());
        assert!(SourceKind::ProfessionalNetwork.priority_rank() < SourceKind::Microblog.priority_rank());
    }

    #[test]
    fn profile_serializes_with_camel_case_fields() {
        let p = SkillProfile::from_skills(&["React".into()], Some("beginner"));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["tier"], serde_json::json!("beginner"));
        assert!(v.get("growthAreas").is_some());
        assert_eq!(v["skills"]["React"], serde_json::json!(60));
    }
}
