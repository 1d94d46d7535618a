// src/collect/mod.rs
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::collect::types::{CollectError, SignalCollector};
use crate::signal::{SourceKind, SourceRecord};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collect_records_total",
            "Source records accepted into aggregation."
        );
        describe_counter!(
            "collect_rejected_total",
            "Source outcomes dropped (fetch rejects or validation failures)."
        );
    });
}

/// Maximum length of a single text signal after normalization.
const TEXT_SIGNAL_CAP: usize = 1000;

/// Normalize a raw text snippet into keyword material: decode HTML entities,
/// strip markup, collapse whitespace, cap the length. Keyword matching is
/// word-boundary based downstream, so punctuation is left alone.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    let stripped = re_tags.replace_all(&decoded, " ");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    let mut out = re_ws.replace_all(&stripped, " ").trim().to_string();

    if out.chars().count() > TEXT_SIGNAL_CAP {
        out = out.chars().take(TEXT_SIGNAL_CAP).collect();
    }

    out
}

/// Run one collector and pair the outcome with its source kind, so `gather`
/// can report per-source failures without aborting the batch.
pub async fn run<C>(collector: &C, handle: &str) -> (SourceKind, Result<SourceRecord, CollectError>)
where
    C: SignalCollector + ?Sized,
{
    (collector.kind(), collector.collect(handle).await)
}

/// Keep the records that survived fetching and boundary validation.
///
/// Rejects and invalid records are logged and counted, then dropped: the
/// aggregate degrades (fewer corroborating records) instead of failing.
pub fn gather(
    outcomes: Vec<(SourceKind, Result<SourceRecord, CollectError>)>,
) -> Vec<SourceRecord> {
    ensure_metrics_described();

    let mut kept = Vec::with_capacity(outcomes.len());
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(record) => match record.validate() {
                Ok(()) => {
                    counter!("collect_records_total", "kind" => kind.label()).increment(1);
                    kept.push(record);
                }
                Err(e) => {
                    warn!(source = kind.label(), error = %e, "record failed boundary validation");
                    counter!("collect_rejected_total", "kind" => kind.label()).increment(1);
                }
            },
            Err(e) => {
                warn!(source = kind.label(), error = %e, "source rejected");
                counter!("collect_rejected_total", "kind" => kind.label()).increment(1);
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SourceKind;

    #[test]
    fn normalize_strips_tags_entities_and_whitespace() {
        let raw = "  <p>Web developer &amp; JavaScript\n enthusiast</p> ";
        assert_eq!(normalize_text(raw), "Web developer & JavaScript enthusiast");
    }

    #[test]
    fn normalize_caps_length() {
        let raw = "x".repeat(5000);
        assert_eq!(normalize_text(&raw).chars().count(), TEXT_SIGNAL_CAP);
    }

    #[test]
    fn gather_drops_rejects_and_keeps_valid_records() {
        let good = SourceRecord::new(SourceKind::CodeHost, "octocat");
        let blank = SourceRecord::new(SourceKind::Microblog, "  ");
        let kept = gather(vec![
            (SourceKind::CodeHost, Ok(good.clone())),
            (SourceKind::Microblog, Ok(blank)),
            (SourceKind::ProfessionalNetwork, Err(CollectError::Unreachable)),
        ]);
        assert_eq!(kept, vec![good]);
    }
}
