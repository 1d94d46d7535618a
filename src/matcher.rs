//! matcher.rs — Filters and ranks the catalog against a skill profile.
//!
//! Inclusion is deliberately permissive: any overlap between the profile's
//! skills and an entry's required skills qualifies (no strict subset test),
//! and the sentinel skill `"Any"` matches every profile. Tightening this is
//! a policy decision, not a bug fix. The tier gate is checked first and is
//! absolute: entries above the profile's tier are invisible regardless of
//! overlap.

use serde::Serialize;

use crate::catalog::{Opportunity, OpportunityCatalog, ANY_SKILL};
use crate::signal::SkillProfile;

/// An included opportunity plus the skills that earned the inclusion.
/// Read-only projection; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    /// Intersection of profile and requirement skills, or the full
    /// requirement set when the sentinel is present.
    pub matched_skills: Vec<String>,
}

/// Rank candidates for `profile`. Always returns a sequence — empty means
/// "no current match", which is a valid state, not a failure.
///
/// Ordering: matched-skill count (desc), then type priority
/// (Job > Bounty > Hackathon > Course), then catalog insertion order. The
/// sort is stable, so equal keys keep catalog order and the result is fully
/// deterministic.
pub fn match_opportunities(
    profile: &SkillProfile,
    catalog: &OpportunityCatalog,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = catalog
        .for_tier(profile.tier)
        .into_iter()
        .filter_map(|opp| {
            matched_skills(profile, opp).map(|matched| MatchResult {
                opportunity: opp.clone(),
                matched_skills: matched,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.matched_skills
            .len()
            .cmp(&a.matched_skills.len())
            .then_with(|| {
                a.opportunity
                    .ty
                    .priority_rank()
                    .cmp(&b.opportunity.ty.priority_rank())
            })
    });

    results
}

/// `None` = excluded. `Some(skills)` = included, with the evidence.
fn matched_skills(profile: &SkillProfile, opp: &Opportunity) -> Option<Vec<String>> {
    let has_sentinel = opp
        .required_skills
        .iter()
        .any(|s| s.trim().eq_ignore_ascii_case(ANY_SKILL));
    if has_sentinel {
        // Sentinel entries match regardless of the profile's skill set and
        // report their full requirement list as the match.
        return Some(opp.required_skills.clone());
    }

    let overlap: Vec<String> = opp
        .required_skills
        .iter()
        .filter(|req| {
            profile
                .skills
                .keys()
                .any(|have| have.eq_ignore_ascii_case(req.trim()))
        })
        .cloned()
        .collect();

    if overlap.is_empty() {
        None
    } else {
        Some(overlap)
    }
}
