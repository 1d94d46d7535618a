//! extract.rs — Fuses per-source records into a normalized `SkillProfile`.
//!
//! Scoring is a deterministic, auditable rule system, not a trained model:
//! a declared tag (source-asserted label) is worth a fixed high increment,
//! a keyword hit in free text a smaller one, and one record can contribute
//! at most `PER_RECORD_SKILL_CAP` points to a single skill. Scores across
//! records add up and only ever grow, clamped to 0..=100.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::signal::{SkillProfile, SourceRecord, Tier};

/// Points for a source-asserted label (repo language, listed skill, ...).
const DECLARED_TAG_SCORE: u32 = 30;
/// Points per keyword occurrence in a free-text snippet.
const KEYWORD_HIT_SCORE: u32 = 10;
/// A single record cannot push one skill above this on its own.
const PER_RECORD_SKILL_CAP: u32 = 60;
/// Hard ceiling after cross-record accumulation.
const SKILL_SCORE_MAX: u32 = 100;

/// Tier thresholds over (contributing records, total score mass).
const ADVANCED_MIN_TOTAL: u32 = 180;
const ADVANCED_MIN_RECORDS: usize = 2;
const INTERMEDIATE_MIN_TOTAL: u32 = 70;

/// How many strengths to surface.
const TOP_STRENGTHS: usize = 5;
/// Reference "in-demand" skills, in report order. A member scoring below
/// `GROWTH_MIN_SCORE` (or absent) is listed as a growth area.
const IN_DEMAND_SKILLS: &[&str] = &[
    "TypeScript",
    "React",
    "Rust",
    "Python",
    "DevOps",
    "Testing",
    "SQL",
];
const GROWTH_MIN_SCORE: u32 = 40;

// Alias → canonical skill name. BTreeMap so the compiled pattern order (and
// therefore first-seen tie-breaking) is stable across runs.
static VOCABULARY: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../skill_vocabulary.json");
    serde_json::from_str::<BTreeMap<String, String>>(raw).expect("valid skill vocabulary")
});

// One word-boundary regex per alias, compiled once.
static KEYWORD_PATTERNS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    VOCABULARY
        .iter()
        .map(|(alias, canonical)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(alias));
            let re = Regex::new(&pattern).expect("alias regex");
            (re, canonical.clone())
        })
        .collect()
});

/// Resolve a declared tag to its canonical skill name. Tags outside the
/// vocabulary are still trusted, but fold case-insensitively: the first
/// sighting's casing becomes the canonical key, so "Haskell" and "haskell"
/// from two sources reinforce one entry instead of splitting it.
fn canonicalize_tag(tag: &str, unknown_casing: &mut BTreeMap<String, String>) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    let folded = trimmed.to_ascii_lowercase();
    if let Some(canonical) = VOCABULARY.get(&folded) {
        return Some(canonical.clone());
    }
    Some(
        unknown_casing
            .entry(folded)
            .or_insert_with(|| trimmed.to_string())
            .clone(),
    )
}

/// Fuse `records` into a profile. Total: never fails.
///
/// Empty input yields the defined default (no skills, `Beginner`), and a
/// record with nothing to say simply contributes zero — neither is an error.
pub fn extract(records: &[SourceRecord]) -> SkillProfile {
    // Process in source-priority order so first-seen tie-breaks resolve
    // CodeHost > ProfessionalNetwork > Microblog. Stable sort keeps input
    // order within a priority class.
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| records[i].kind.priority_rank());

    let mut skills: BTreeMap<String, u32> = BTreeMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    // lowercase tag -> casing of its first sighting, for out-of-vocabulary
    // tags; priority-ordered processing means higher-priority sources win.
    let mut unknown_casing: BTreeMap<String, String> = BTreeMap::new();
    let mut seen_counter = 0usize;
    let mut contributing_records = 0usize;

    for &i in &order {
        let record = &records[i];

        // Encounter-ordered contributions for this record: declared tags
        // first, then keyword hits per text signal.
        let mut contribs: Vec<(String, u32)> = Vec::new();
        for tag in &record.declared_tags {
            if let Some(name) = canonicalize_tag(tag, &mut unknown_casing) {
                contribs.push((name, DECLARED_TAG_SCORE));
            }
        }
        for text in &record.text_signals {
            for (re, canonical) in KEYWORD_PATTERNS.iter() {
                let hits = re.find_iter(text).count() as u32;
                if hits > 0 {
                    contribs.push((canonical.clone(), hits * KEYWORD_HIT_SCORE));
                }
            }
        }

        // Register first sightings before folding, so insertion order within
        // the record is what breaks ties.
        for (name, _) in &contribs {
            if !first_seen.contains_key(name) {
                first_seen.insert(name.clone(), seen_counter);
                seen_counter += 1;
            }
        }

        // Per-record cap, then additive merge with the global clamp.
        let mut local: BTreeMap<String, u32> = BTreeMap::new();
        for (name, pts) in contribs {
            let entry = local.entry(name).or_insert(0);
            *entry = (*entry + pts).min(PER_RECORD_SKILL_CAP);
        }
        if !local.is_empty() {
            contributing_records += 1;
        }
        for (name, pts) in local {
            let entry = skills.entry(name).or_insert(0);
            *entry = (*entry + pts).min(SKILL_SCORE_MAX);
        }
    }

    let total: u32 = skills.values().sum();
    let tier = infer_tier(contributing_records, total);
    let strengths = top_strengths(&skills, &first_seen);
    let growth_areas = growth_areas(&skills);

    SkillProfile {
        skills,
        tier,
        strengths,
        growth_areas,
    }
}

/// Map aggregate evidence volume onto a tier. Pure and total: every input
/// resolves to exactly one bucket.
fn infer_tier(contributing_records: usize, total_score: u32) -> Tier {
    if total_score >= ADVANCED_MIN_TOTAL && contributing_records >= ADVANCED_MIN_RECORDS {
        Tier::Advanced
    } else if total_score >= INTERMEDIATE_MIN_TOTAL {
        Tier::Intermediate
    } else {
        Tier::Beginner
    }
}

fn top_strengths(skills: &BTreeMap<String, u32>, first_seen: &HashMap<String, usize>) -> Vec<String> {
    let mut ranked: Vec<(&String, u32, usize)> = skills
        .iter()
        .map(|(name, &score)| {
            let seen = first_seen.get(name).copied().unwrap_or(usize::MAX);
            (name, score, seen)
        })
        .collect();
    // Higher score first; exact ties resolve to the earlier sighting.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(TOP_STRENGTHS)
        .map(|(name, _, _)| name.clone())
        .collect()
}

fn growth_areas(skills: &BTreeMap<String, u32>) -> Vec<String> {
    IN_DEMAND_SKILLS
        .iter()
        .filter(|name| skills.get(**name).copied().unwrap_or(0) < GROWTH_MIN_SCORE)
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SourceKind;

    fn code_host(tags: &[&str], texts: &[&str]) -> SourceRecord {
        record(SourceKind::CodeHost, tags, texts)
    }

    fn record(kind: SourceKind, tags: &[&str], texts: &[&str]) -> SourceRecord {
        let mut r = SourceRecord::new(kind, "someone");
        r.declared_tags = tags.iter().map(|s| s.to_string()).collect();
        r.text_signals = texts.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn empty_input_yields_default_profile() {
        let p = extract(&[]);
        assert!(p.skills.is_empty());
        assert_eq!(p.tier, Tier::Beginner);
        assert!(p.strengths.is_empty());
        // everything in-demand is a growth area when nothing is known
        assert_eq!(p.growth_areas.len(), IN_DEMAND_SKILLS.len());
    }

    #[test]
    fn declared_tag_scores_higher_than_keyword_hit() {
        let p = extract(&[code_host(&["Rust"], &["dabbling in python lately"])]);
        assert_eq!(p.skills["Rust"], 30);
        assert_eq!(p.skills["Python"], 10);
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let p = extract(&[code_host(&["reactjs"], &["shipped a nodejs service"])]);
        assert!(p.skills.contains_key("React"));
        assert!(p.skills.contains_key("Node.js"));
        assert!(!p.skills.contains_key("reactjs"));
    }

    #[test]
    fn unknown_declared_tag_is_kept_verbatim() {
        let p = extract(&[code_host(&["Haskell"], &[])]);
        assert_eq!(p.skills["Haskell"], 30);
    }

    #[test]
    fn unknown_tags_fold_case_across_sources() {
        // same skill asserted with different casing: one reinforced entry,
        // keyed by the higher-priority source's casing
        let records = vec![
            record(SourceKind::ProfessionalNetwork, &["haskell"], &[]),
            code_host(&["Haskell"], &[]),
        ];
        let p = extract(&records);
        assert_eq!(p.skills.len(), 1);
        assert_eq!(p.skills["Haskell"], 60);
        assert!(!p.skills.contains_key("haskell"));
    }

    #[test]
    fn single_record_contribution_is_capped() {
        let spam = "react react react react react react react react react react";
        let p = extract(&[code_host(&["React"], &[spam])]);
        // 30 (tag) + 100 (hits) would be 130 raw; one record caps at 60
        assert_eq!(p.skills["React"], 60);
    }

    #[test]
    fn corroborating_records_accumulate_and_clamp() {
        let a = code_host(&["TypeScript"], &["typescript typescript typescript"]);
        let b = record(
            SourceKind::ProfessionalNetwork,
            &["TypeScript"],
            &["typescript everywhere: typescript typescript typescript"],
        );
        let single = extract(&[a.clone()]);
        let both = extract(&[a, b]);
        // monotone: more evidence never lowers a score
        assert!(both.skills["TypeScript"] >= single.skills["TypeScript"]);
        assert!(both.skills["TypeScript"] <= 100);
    }

    #[test]
    fn extract_is_deterministic() {
        let records = vec![
            code_host(&["JavaScript", "TypeScript"], &["react and redux on the frontend"]),
            record(SourceKind::Microblog, &[], &["learning rust, loving cargo"]),
        ];
        assert_eq!(extract(&records), extract(&records));
    }

    #[test]
    fn tie_breaks_prefer_higher_priority_source() {
        // Equal scores (one declared tag each); microblog listed first in the
        // input, but code-host evidence must win the tie.
        let records = vec![
            record(SourceKind::Microblog, &["GraphQL"], &[]),
            record(SourceKind::CodeHost, &["Solidity"], &[]),
        ];
        let p = extract(&records);
        assert_eq!(p.skills["GraphQL"], p.skills["Solidity"]);
        let gq = p.strengths.iter().position(|s| s == "GraphQL").unwrap();
        let so = p.strengths.iter().position(|s| s == "Solidity").unwrap();
        assert!(so < gq, "code-host skill should rank first on a tie");
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(infer_tier(0, 0), Tier::Beginner);
        assert_eq!(infer_tier(1, 69), Tier::Beginner);
        assert_eq!(infer_tier(1, 70), Tier::Intermediate);
        // high score mass from a single source is not enough for Advanced
        assert_eq!(infer_tier(1, 200), Tier::Intermediate);
        assert_eq!(infer_tier(2, 180), Tier::Advanced);
    }

    #[test]
    fn growth_areas_follow_reference_order() {
        let p = extract(&[code_host(&["TypeScript", "Rust"], &[])]);
        // scored 30 each — still below the 40 floor, so they stay listed
        assert_eq!(p.growth_areas.first().map(String::as_str), Some("TypeScript"));
        let strong = extract(&[
            code_host(&["TypeScript"], &[]),
            record(SourceKind::ProfessionalNetwork, &["TypeScript"], &[]),
        ]);
        assert!(!strong.growth_areas.contains(&"TypeScript".to_string()));
    }

    #[test]
    fn records_without_evidence_are_not_errors() {
        let p = extract(&[record(SourceKind::Microblog, &[], &[])]);
        assert!(p.skills.is_empty());
        assert_eq!(p.tier, Tier::Beginner);
    }
}
