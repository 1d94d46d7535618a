//! Microblog adapter. Post bodies and the bio are keyword material; the
//! upstream's pre-analyzed interest labels, when present, come through as
//! declared tags.

use serde::Deserialize;

use crate::collect::normalize_text;
use crate::collect::types::{CollectError, SignalCollector};
use crate::signal::{SourceKind, SourceRecord};

#[derive(Debug, Deserialize)]
struct Payload {
    profile: Option<Profile>,
    // upstream exports name this key `tweets`
    #[serde(default, alias = "tweets")]
    posts: Vec<Post>,
    #[serde(default)]
    interests: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    followers_count: Option<u64>,
    #[serde(default)]
    following_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Post {
    text: String,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

pub struct MicroblogCollector {
    payload: String,
}

impl MicroblogCollector {
    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait::async_trait]
impl SignalCollector for MicroblogCollector {
    async fn collect(&self, handle: &str) -> Result<SourceRecord, CollectError> {
        parse_payload(handle, &self.payload)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Microblog
    }
}

pub fn parse_payload(handle: &str, payload: &str) -> Result<SourceRecord, CollectError> {
    if handle.trim().is_empty() {
        return Err(CollectError::Invalid("empty handle".into()));
    }
    let parsed: Payload =
        serde_json::from_str(payload).map_err(|e| CollectError::Invalid(e.to_string()))?;
    let profile = parsed.profile.ok_or(CollectError::NotFound)?;

    let mut record = SourceRecord::new(SourceKind::Microblog, handle.trim());

    if let Some(n) = profile.followers_count {
        record.metrics.insert("followers".into(), n);
    }
    if let Some(n) = profile.following_count {
        record.metrics.insert("following".into(), n);
    }
    record
        .metrics
        .insert("posts".into(), parsed.posts.len() as u64);
    let engagement: u64 = parsed
        .posts
        .iter()
        .map(|p| p.like_count + p.retweet_count)
        .sum();
    record.metrics.insert("engagement_total".into(), engagement);

    if let Some(bio) = profile.bio {
        push_text(&mut record, &bio);
    }
    for post in &parsed.posts {
        push_text(&mut record, &post.text);
    }

    for interest in parsed.interests {
        let tag = interest.trim().to_string();
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
