//! Per-column arbitration and global quality filters.
//!
//! Each FK column keeps at most its best-scoring candidate (plus any
//! materially different alternative inside the tie band), gated on evidence
//! quality. Afterwards three global filters kill the classic false-positive
//! shapes: self references, generic-id cross joins, and matches held
//! together by nothing but a shared `KEY`/`ID` suffix.

use std::collections::BTreeMap;

use tracing::debug;

use crate::discovery::candidates::{Candidate, CandidateStatus};
use crate::discovery::config::DiscoveryConfig;
use crate::discovery::evidence::{EvidenceKind, NameMatchTier};
use crate::discovery::prepare::AnalyzedTable;
use crate::discovery::Deadline;

/// Minimum name-similarity gap for a tie-band alternative to count as a
/// materially different match rather than a near-duplicate.
const TIE_BAND_NAME_GAP: f64 = 0.2;

/// Result of the arbitration stage.
#[derive(Debug)]
pub struct ArbitrationOutcome {
    /// Indices of accepted candidates, in enumeration order.
    pub accepted: Vec<usize>,
    /// Whether the deadline interrupted the stage.
    pub timed_out: bool,
}

/// Select winners per FK column and apply the global filters.
pub fn arbitrate(
    candidates: &mut [Candidate],
    tables: &[AnalyzedTable],
    config: &DiscoveryConfig,
    deadline: &Deadline,
) -> ArbitrationOutcome {
    let mut columns: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        if candidate.status == CandidateStatus::Proposed {
            columns
                .entry((candidate.fk_table, candidate.fk_column))
                .or_default()
                .push(idx);
        }
    }

    let mut timed_out = false;
    for (_, mut members) in columns {
        if deadline.exceeded() {
            timed_out = true;
            break;
        }

        members.sort_by(|&a, &b| {
            candidates[b]
                .raw_confidence
                .total_cmp(&candidates[a].raw_confidence)
                .then(candidates[a].index.cmp(&candidates[b].index))
        });

        let winner_idx = members[0];
        if !passes_quality_gate(&candidates[winner_idx], tables, config) {
            for idx in members {
                candidates[idx].status = CandidateStatus::Dropped;
            }
            continue;
        }
        candidates[winner_idx].status = CandidateStatus::Accepted;

        let winner_confidence = candidates[winner_idx].raw_confidence;
        let winner_pk_table = candidates[winner_idx].pk_table;
        let winner_name = candidates[winner_idx]
            .evidence
            .score_of(EvidenceKind::NameSimilarity);

        for &idx in &members[1..] {
            let candidate = &candidates[idx];
            let name = candidate.evidence.score_of(EvidenceKind::NameSimilarity);
            let in_band = winner_confidence - candidate.raw_confidence <= config.tie_band
                && candidate.pk_table != winner_pk_table
                && (name - winner_name).abs() > TIE_BAND_NAME_GAP
                && passes_quality_gate(candidate, tables, config);
            candidates[idx].status = if in_band {
                CandidateStatus::Accepted
            } else {
                CandidateStatus::Dropped
            };
        }
    }

    // Global filters run over the selected set, not per column.
    let mut accepted = Vec::new();
    for idx in 0..candidates.len() {
        if candidates[idx].status != CandidateStatus::Accepted {
            continue;
        }
        if let Some(reason) = suppression_reason(&candidates[idx], tables, config) {
            debug!(candidate = idx, reason, "suppressing accepted candidate");
            candidates[idx].status = CandidateStatus::Dropped;
            continue;
        }
        accepted.push(idx);
    }

    ArbitrationOutcome {
        accepted,
        timed_out,
    }
}

/// Evidence quality gate for acceptance.
fn passes_quality_gate(
    candidate: &Candidate,
    tables: &[AnalyzedTable],
    config: &DiscoveryConfig,
) -> bool {
    if candidate.raw_confidence < config.min_confidence {
        return false;
    }

    let name = candidate.evidence.score_of(EvidenceKind::NameSimilarity);
    let prior = candidate.evidence.score_of(EvidenceKind::DomainPrior);
    let type_compat = candidate.evidence.score_of(EvidenceKind::TypeCompatibility);
    let containment = candidate.evidence.score_of(EvidenceKind::ValueContainment);

    if config.strict_join_inference && samples_on_both_sides(candidate, tables) && containment < 0.5
    {
        return false;
    }

    if name >= 0.7 || prior >= 0.8 {
        return true;
    }

    let corroborations = usize::from(type_compat >= 0.9)
        + usize::from(containment >= 0.8)
        + usize::from(prior >= 0.6);
    corroborations >= 2
}

fn samples_on_both_sides(candidate: &Candidate, tables: &[AnalyzedTable]) -> bool {
    tables[candidate.fk_table].columns[candidate.fk_column]
        .profile
        .is_some()
        && tables[candidate.pk_table].columns[candidate.pk_column]
            .profile
            .is_some()
}

/// Why an accepted candidate must be suppressed, if at all.
fn suppression_reason(
    candidate: &Candidate,
    tables: &[AnalyzedTable],
    config: &DiscoveryConfig,
) -> Option<&'static str> {
    if candidate.fk_table == candidate.pk_table {
        return Some("self reference");
    }

    let fk_name = &tables[candidate.fk_table].columns[candidate.fk_column].name;
    let pk_name = &tables[candidate.pk_table].columns[candidate.pk_column].name;
    let pk_entity = &tables[candidate.pk_table].entity;

    if fk_name.is_generic_id {
        // A short table prefix counts as entity evidence: C_ID pointing at
        // CUSTOMERS is fine, the bare prefix resolves the entity.
        let prefix_evidence = fk_name
            .upper
            .split_once('_')
            .map(|(head, _)| {
                head.len() <= 2 && config.dictionary.are_variants(head, &pk_entity.core_entity)
            })
            .unwrap_or(false);
        let core_evidence = config
            .dictionary
            .are_variants(&fk_name.core_entity, &pk_entity.core_entity);
        if !prefix_evidence && !core_evidence {
            return Some("generic id without matching entity");
        }
    }

    if candidate.name_tier == NameMatchTier::Levenshtein
        && fk_name.suffix_removed
        && pk_name.suffix_removed
        && !config
            .dictionary
            .are_variants(&fk_name.core_entity, &pk_name.core_entity)
    {
        return Some("shared key suffix only");
    }

    None
}
