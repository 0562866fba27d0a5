//! Composite-key analysis.
//!
//! Candidates are grouped per (FK table, PK table) pair and compared
//! against the PK side's key groups. Coverage is always computed over the
//! target key group's own column set, never over whichever candidate
//! happened to come first, so iteration order cannot change the outcome.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::discovery::candidates::{Candidate, CandidateStatus};
use crate::discovery::prepare::AnalyzedTable;
use crate::discovery::Deadline;

/// Boost for a fully covered composite key group.
const FULL_COVERAGE_BOOST: f64 = 0.10;
/// Boost for a key group at least half covered.
const PARTIAL_COVERAGE_BOOST: f64 = 0.05;
/// Penalty for poking at a composite key without covering half of it.
const PARTIAL_JUNCTION_PENALTY: f64 = -0.05;

/// Adjust candidate confidences by composite-key coverage.
///
/// Returns whether the deadline interrupted the stage.
pub fn analyze_composites(
    candidates: &mut [Candidate],
    tables: &[AnalyzedTable],
    deadline: &Deadline,
) -> bool {
    let mut pairs: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        if candidate.status != CandidateStatus::Dropped {
            pairs
                .entry((candidate.fk_table, candidate.pk_table))
                .or_default()
                .push(idx);
        }
    }

    let mut cluster_id = 0;
    for ((_, pk_table_idx), members) in pairs {
        if deadline.exceeded() {
            return true;
        }
        let pk_table = &tables[pk_table_idx];

        let targeted: BTreeSet<usize> = members
            .iter()
            .map(|idx| candidates[*idx].pk_column)
            .collect();

        // Key group with the largest intersection; ties go to the earliest
        // (and therefore most trusted) group.
        let mut best: Option<(usize, usize)> = None;
        for (group_idx, group) in pk_table.key_groups.iter().enumerate() {
            let intersection = group
                .columns
                .iter()
                .filter(|column| targeted.contains(column))
                .count();
            if intersection > best.map_or(0, |(_, n)| n) {
                best = Some((group_idx, intersection));
            }
        }
        let Some((group_idx, intersection)) = best else {
            continue;
        };
        let group = &pk_table.key_groups[group_idx];
        let coverage = intersection as f64 / group.columns.len() as f64;

        let adjustment = if coverage >= 1.0 && group.is_composite() {
            FULL_COVERAGE_BOOST
        } else if (0.5..1.0).contains(&coverage) {
            PARTIAL_COVERAGE_BOOST
        } else if group.is_composite() && coverage < 0.5 {
            PARTIAL_JUNCTION_PENALTY
        } else {
            0.0
        };
        if adjustment == 0.0 {
            continue;
        }

        let is_cluster = coverage >= 1.0 && group.is_composite();
        for idx in members {
            let candidate = &mut candidates[idx];
            if group.position_of(candidate.pk_column).is_none() {
                continue;
            }
            candidate.raw_confidence =
                (candidate.raw_confidence + adjustment).clamp(0.0, 1.0);
            if is_cluster {
                candidate.composite_group = Some(cluster_id);
            }
        }
        if is_cluster {
            debug!(
                pk_table = %pk_table.def.name,
                coverage,
                "composite cluster detected"
            );
            cluster_id += 1;
        }
    }

    false
}
