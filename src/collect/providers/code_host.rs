//! Code-host adapter: turns a raw profile + repositories payload into one
//! `SourceRecord`. Repo languages become declared tags (the source asserts
//! them); descriptions and the bio become text signals.

use serde::Deserialize;

use crate::collect::normalize_text;
use crate::collect::types::{CollectError, SignalCollector};
use crate::signal::{SourceKind, SourceRecord};

#[derive(Debug, Deserialize)]
struct Payload {
    profile: Option<Profile>,
    #[serde(default)]
    repositories: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    public_repos: Option<u64>,
    #[serde(default)]
    followers: Option<u64>,
    #[serde(default)]
    following: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

/// Holds one already-fetched raw JSON payload. The HTTP fetch (auth,
/// pagination, retries) happens upstream.
pub struct CodeHostCollector {
    payload: String,
}

impl CodeHostCollector {
    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait::async_trait]
impl SignalCollector for CodeHostCollector {
    async fn collect(&self, handle: &str) -> Result<SourceRecord, CollectError> {
        parse_payload(handle, &self.payload)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::CodeHost
    }
}

pub fn parse_payload(handle: &str, payload: &str) -> Result<SourceRecord, CollectError> {
    if handle.trim().is_empty() {
        return Err(CollectError::Invalid("empty handle".into()));
    }
    let parsed: Payload =
        serde_json::from_str(payload).map_err(|e| CollectError::Invalid(e.to_string()))?;
    let profile = parsed.profile.ok_or(CollectError::NotFound)?;

    let mut record = SourceRecord::new(SourceKind::CodeHost, handle.trim());

    if let Some(n) = profile.public_repos {
        record.metrics.insert("public_repos".into(), n);
    }
    if let Some(n) = profile.followers {
        record.metrics.insert("followers".into(), n);
    }
    if let Some(n) = profile.following {
        record.metrics.insert("following".into(), n);
    }
    let stars: u64 = parsed.repositories.iter().map(|r| r.stargazers_count).sum();
    let forks: u64 = parsed.repositories.iter().map(|r| r.forks_count).sum();
    record.metrics.insert("stars_total".into(), stars);
    record.metrics.insert("forks_total".into(), forks);

    if let Some(bio) = profile.bio {
        push_text(&mut record, &bio);
    }
    for repo in &parsed.repositories {
        if let Some(desc) = &repo.description {
            push_text(&mut record, desc);
        }
    }

    // languages, deduped but in repo order
    for repo in &parsed.repositories {
        if let Some(lang) = &repo.language {
            let lang = lang.trim();
            if !lang.is_empty() && !record.declared_tags.iter().any(|t| t == lang) {
                record.declared_tags.push(lang.to_string());
            }
        }
    }

    Ok(record)
}

fn push_text(record: &mut SourceRecord, raw: &str) {
    let text = normalize_text(raw);
    if !text.is_empty() {
        record.text_signals.push(text);
    }
}
