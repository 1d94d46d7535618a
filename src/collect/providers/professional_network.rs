//! Professional-network adapter. Listed skills are declared tags; headline,
//! summary and position descriptions feed keyword inference.

use serde::Deserialize;

use crate::collect::normalize_text;
use crate::collect::types::{CollectError, SignalCollector};
use crate::signal::{SourceKind, SourceRecord};

#[derive(Debug, Deserialize)]
struct Payload {
    profile: Option<Profile>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    positions: Vec<Position>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    connections: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub struct ProfessionalNetworkCollector {
    payload: String,
}

impl ProfessionalNetworkCollector {
    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait::async_trait]
impl SignalCollector for ProfessionalNetworkCollector {
    async fn collect(&self, handle: &str) -> Result<SourceRecord, CollectError> {
        parse_payload(handle, &self.payload)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::ProfessionalNetwork
    }
}

pub fn parse_payload(handle: &str, payload: &str) -> Result<SourceRecord, CollectError> {
    if handle.trim().is_empty() {
        return Err(CollectError::Invalid("empty handle".into()));
    }
    let parsed: Payload =
        serde_json::from_str(payload).map_err(|e| CollectError::Invalid(e.to_string()))?;
    let profile = parsed.profile.ok_or(CollectError::NotFound)?;

    let mut record = SourceRecord::new(SourceKind::ProfessionalNetwork, handle.trim());

    if let Some(n) = profile.connections {
        record.metrics.insert("connections".into(), n);
    }
    record
        .metrics
        .insert("positions".into(), parsed.positions.len() as u64);

    if let Some(headline) = profile.headline {
        push_text(&mut record, &headline);
    }
    if let Some(summary) = profile.summary {
        push_text(&mut record, &summary);
    }
    for position in &parsed.positions {
        if let Some(title) = &position.title {
            push_text(&mut record, title);
        }
        if let Some(desc) = &position.description {
            push_text(&mut record, desc);
        }
    }

    for skill in parsed.skills {
        let tag = skill.trim().to_string();
        if !tag.is_empty() && !record.declared_tags.contains(&tag) {
            record.declared_tags.push(tag);
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
