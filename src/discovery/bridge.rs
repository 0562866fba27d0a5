//! Bridge derivation through junction tables.
//!
//! A junction table owns a composite key whose members each act as FK in an
//! accepted direct relationship. For every pair of distinct target tables
//! reachable that way, one many-to-many relationship is synthesized and
//! labeled as going "via" the junction. Derived relationships never seed
//! further bridges; derivation is single-hop.

use tracing::debug;

use crate::discovery::candidates::{Candidate, CandidateStatus};
use crate::discovery::prepare::AnalyzedTable;

/// A derived relationship between two tables through a junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeLink {
    /// Junction table index.
    pub junction: usize,
    /// Accepted candidate carrying the junction's FK to the left table.
    pub left_candidate: usize,
    /// Accepted candidate carrying the junction's FK to the right table.
    pub right_candidate: usize,
}

/// Scan for junction tables among the accepted direct relationships.
pub fn derive_bridges(candidates: &[Candidate], tables: &[AnalyzedTable]) -> Vec<BridgeLink> {
    let mut links = Vec::new();

    for (junction_idx, table) in tables.iter().enumerate() {
        let Some(group) = table.key_groups.iter().find(|g| g.is_composite()) else {
            continue;
        };

        // Every composite member must be the FK side of an accepted direct
        // relationship; the first accepted candidate per member wins.
        let mut member_rels = Vec::with_capacity(group.columns.len());
        let mut complete = true;
        for &member in &group.columns {
            let found = candidates.iter().position(|c| {
                c.status == CandidateStatus::Accepted
                    && c.fk_table == junction_idx
                    && c.fk_column == member
            });
            match found {
                Some(candidate_idx) => member_rels.push(candidate_idx),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            continue;
        }

        for i in 0..member_rels.len() {
            for j in (i + 1)..member_rels.len() {
                let left = member_rels[i];
                let right = member_rels[j];
                if candidates[left].pk_table == candidates[right].pk_table {
                    continue;
                }
                debug!(
                    junction = %table.def.name,
                    left = %tables[candidates[left].pk_table].def.name,
                    right = %tables[candidates[right].pk_table].def.name,
                    "derived bridge relationship"
                );
                links.push(BridgeLink {
                    junction: junction_idx,
                    left_candidate: left,
                    right_candidate: right,
                });
            }
        }
    }

    links
}
