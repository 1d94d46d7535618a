//! catalog.rs — The opportunity catalog: load-time validation and tier
//! partitioning.
//!
//! The catalog is loaded once at startup from TOML (path overridable via
//! `CATALOG_CONFIG_PATH`, with an embedded default as fallback) and is
//! immutable afterwards. A reload means building a fresh catalog and swapping
//! the `Arc` — entries are never mutated in place, so unlimited concurrent
//! readers are safe.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::signal::Tier;

pub const DEFAULT_CATALOG_CONFIG_PATH: &str = "config/opportunities.toml";
pub const ENV_CATALOG_CONFIG_PATH: &str = "CATALOG_CONFIG_PATH";

/// Marker skill meaning "accepts any profile regardless of declared skills".
pub const ANY_SKILL: &str = "Any";

/// Opportunity kinds, declared in ranking priority order: a job beats a
/// bounty beats a hackathon beats a course when match counts tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityType {
    Job,
    Bounty,
    Hackathon,
    Course,
}

impl OpportunityType {
    /// Lower rank sorts first among equal match counts.
    pub fn priority_rank(self) -> u8 {
        match self {
            OpportunityType::Job => 0,
            OpportunityType::Bounty => 1,
            OpportunityType::Hackathon => 2,
            OpportunityType::Course => 3,
        }
    }

    /// Which identifying field this kind requires.
    fn identity_field(self) -> &'static str {
        match self {
            OpportunityType::Job => "company",
            OpportunityType::Bounty | OpportunityType::Course => "platform",
            OpportunityType::Hackathon => "organizer",
        }
    }
}

/// One catalog entry. The identifying field (`company`, `platform` or
/// `organizer`) depends on `type`; validation enforces the right one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub ty: OpportunityType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Never empty; may contain the sentinel `"Any"`.
    #[serde(rename = "skills")]
    pub required_skills: Vec<String>,
    pub min_tier: Tier,
}

impl Opportunity {
    fn identity_value(&self) -> Option<&String> {
        match self.ty {
            OpportunityType::Job => self.company.as_ref(),
            OpportunityType::Bounty | OpportunityType::Course => self.platform.as_ref(),
            OpportunityType::Hackathon => self.organizer.as_ref(),
        }
    }
}

/// A catalog entry failing its invariants at load time. Fatal at startup:
/// the catalog never partially loads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("opportunity `{title}` lists no required skills")]
    EmptyRequiredSkills { title: String },
    #[error("opportunity `{title}` ({ty:?}) is missing its `{field}` field")]
    MissingIdentity {
        title: String,
        ty: OpportunityType,
        field: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    opportunities: Vec<Opportunity>,
}

/// Read-only, tier-partitioned set of opportunities. Entry order is
/// preserved: it is the matcher's stable tertiary sort key.
#[derive(Debug, Clone)]
pub struct OpportunityCatalog {
    entries: Vec<Opportunity>,
}

impl OpportunityCatalog {
    /// Validate and adopt `entries`. All-or-nothing: the first invalid entry
    /// fails the whole load, naming the offending title.
    pub fn load(entries: Vec<Opportunity>) -> Result<Self, CatalogError> {
        for entry in &entries {
            let has_skill = entry
                .required_skills
                .iter()
                .any(|s| !s.trim().is_empty());
            if !has_skill {
                return Err(CatalogError::EmptyRequiredSkills {
                    title: entry.title.clone(),
                });
            }
            let identity_ok = entry
                .identity_value()
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            if !identity_ok {
                return Err(CatalogError::MissingIdentity {
                    title: entry.title.clone(),
                    ty: entry.ty,
                    field: entry.ty.identity_field(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse and validate a TOML document with `[[opportunities]]` tables.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(toml_str)?;
        Ok(Self::load(file.opportunities)?)
    }

    /// Startup loader: `$CATALOG_CONFIG_PATH`, then the default path, then
    /// the embedded seed catalog. An explicitly configured path must load:
    /// a missing or unreadable file there is fatal, never a silent fallback
    /// to the seed. Validation failures are always fatal.
    pub fn from_env_or_default() -> anyhow::Result<Self> {
        if let Ok(raw) = std::env::var(ENV_CATALOG_CONFIG_PATH) {
            let path = PathBuf::from(raw);
            let content = fs::read_to_string(&path).with_context(|| {
                format!(
                    "failed to read catalog config at {} (from ${})",
                    path.display(),
                    ENV_CATALOG_CONFIG_PATH
                )
            })?;
            let catalog = Self::from_toml_str(&content)?;
            info!(path = %path.display(), entries = catalog.len(), "opportunity catalog loaded");
            return Ok(catalog);
        }

        let path = PathBuf::from(DEFAULT_CATALOG_CONFIG_PATH);
        if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| {
                format!("failed to read catalog config at {}", path.display())
            })?;
            let catalog = Self::from_toml_str(&content)?;
            info!(path = %path.display(), entries = catalog.len(), "opportunity catalog loaded");
            return Ok(catalog);
        }

        let catalog = Self::from_toml_str(DEFAULT_CATALOG_TOML)?;
        info!(entries = catalog.len(), "opportunity catalog loaded from embedded seed");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Opportunity] {
        &self.entries
    }

    /// All entries whose bucket is at or below `tier`, in insertion order.
    pub fn for_tier(&self, tier: Tier) -> Vec<&Opportunity> {
        self.entries
            .iter()
            .filter(|o| o.min_tier <= tier)
            .collect()
    }
}

/// Seed catalog compiled into the binary so a fresh deployment works without
/// any config files on disk.
const DEFAULT_CATALOG_TOML: &str = include_str!("../config/opportunities.toml");

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, company: Option<&str>, skills: &[&str], min_tier: Tier) -> Opportunity {
        Opportunity {
            ty: OpportunityType::Job,
            title: title.to_string(),
            company: company.map(str::to_string),
            platform: None,
            organizer: None,
            link: None,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            min_tier,
        }
    }

    #[test]
    fn embedded_seed_catalog_is_valid() {
        let c = OpportunityCatalog::from_toml_str(DEFAULT_CATALOG_TOML).expect("seed loads");
        assert!(!c.is_empty());
        // all three tiers are represented
        assert!(c.entries().iter().any(|o| o.min_tier == Tier::Beginner));
        assert!(c.entries().iter().any(|o| o.min_tier == Tier::Intermediate));
        assert!(c.entries().iter().any(|o| o.min_tier == Tier::Advanced));
    }

    #[test]
    fn load_rejects_empty_required_skills() {
        let err = OpportunityCatalog::load(vec![job(
            "Ghost Role",
            Some("Acme"),
            &[],
            Tier::Beginner,
        )])
        .unwrap_err();
        match err {
            CatalogError::EmptyRequiredSkills { title } => assert_eq!(title, "Ghost Role"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn whitespace_only_skills_count_as_empty() {
        let err = OpportunityCatalog::load(vec![job(
            "Blank Skills",
            Some("Acme"),
            &["  "],
            Tier::Beginner,
        )])
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyRequiredSkills { .. }));
    }

    #[test]
    fn load_rejects_missing_identity_field() {
        let err = OpportunityCatalog::load(vec![job(
            "Anonymous Job",
            None,
            &["Rust"],
            Tier::Beginner,
        )])
        .unwrap_err();
        match err {
            CatalogError::MissingIdentity { title, field, .. } => {
                assert_eq!(title, "Anonymous Job");
                assert_eq!(field, "company");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identity_field_depends_on_type() {
        let toml_str = r#"
[[opportunities]]
type = "hackathon"
title = "No Organizer"
company = "WrongField"
skills = ["Any"]
minTier = "beginner"
"#;
        let err = OpportunityCatalog::from_toml_str(toml_str).unwrap_err();
        assert!(err.to_string().contains("organizer"), "got: {err}");
    }

    #[test]
    fn for_tier_is_cumulative_and_order_preserving() {
        let entries = vec![
            job("A", Some("x"), &["Rust"], Tier::Beginner),
            job("B", Some("x"), &["Rust"], Tier::Advanced),
            job("C", Some("x"), &["Rust"], Tier::Intermediate),
            job("D", Some("x"), &["Rust"], Tier::Beginner),
        ];
        let c = OpportunityCatalog::load(entries).unwrap();

        let beginner: Vec<_> = c.for_tier(Tier::Beginner).iter().map(|o| o.title.as_str()).collect();
        assert_eq!(beginner, vec!["A", "D"]);

        let mid: Vec<_> = c.for_tier(Tier::Intermediate).iter().map(|o| o.title.as_str()).collect();
        assert_eq!(mid, vec!["A", "C", "D"]);

        let adv: Vec<_> = c.for_tier(Tier::Advanced).iter().map(|o| o.title.as_str()).collect();
        assert_eq!(adv, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn error_message_names_the_offending_entry() {
        let err = OpportunityCatalog::load(vec![job("Bad Apple", Some("Acme"), &[], Tier::Beginner)])
            .unwrap_err();
        assert!(err.to_string().contains("Bad Apple"));
    }
}
