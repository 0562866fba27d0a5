//! Candidate enumeration.
//!
//! Emits one candidate per plausible ordered (FK column, PK column) pair.
//! Enumeration order is lexicographic over
//! `(fk_table, fk_column position, pk_table, pk_column position)` with
//! tables already in canonical name order, so the running index is a
//! deterministic tie-breaker for every later stage.

use crate::discovery::config::DiscoveryConfig;
use crate::discovery::evidence::{EvidenceVector, NameMatchTier};
use crate::discovery::prepare::AnalyzedTable;
use crate::model::Cardinality;
use crate::naming::{EntityDictionary, NormalizedName};

/// Lifecycle state of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Proposed,
    Accepted,
    Dropped,
}

/// An FK→PK hypothesis awaiting scoring and arbitration.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Enumeration index; the final deterministic tie-breaker.
    pub index: usize,
    /// FK-side table (index into the analyzed table list).
    pub fk_table: usize,
    /// FK-side column position.
    pub fk_column: usize,
    /// PK-side table.
    pub pk_table: usize,
    /// PK-side column position.
    pub pk_column: usize,
    /// Index of the key group (on the PK table) the target belongs to.
    pub key_group: usize,
    /// Evidence vector, filled by the scorer.
    pub evidence: EvidenceVector,
    /// Weighted confidence plus composite adjustments.
    pub raw_confidence: f64,
    /// How the name score was established.
    pub name_tier: NameMatchTier,
    /// Cluster id assigned by the composite analyzer.
    pub composite_group: Option<usize>,
    /// Tagged cardinality.
    pub cardinality: Cardinality,
    pub status: CandidateStatus,
}

/// Whether a column reads as a foreign key: key suffix or a dictionary
/// entity embedded in the name. Columns that fail this never become FK
/// sources; generic measures and attributes would otherwise flood the
/// candidate set with prior-driven false positives.
pub fn is_fk_shaped(name: &NormalizedName, dictionary: &EntityDictionary) -> bool {
    if name.upper.ends_with("KEY") || name.upper.ends_with("ID") {
        return true;
    }
    dictionary
        .canonical_of(&name.core_entity)
        .is_some_and(|canonical| canonical.len() >= 4 && name.upper.contains(canonical))
}

/// Enumerate raw candidates over the analyzed tables.
///
/// A column is an FK source unless it is, by itself, a singleton key of its
/// own table (composite key members stay eligible; junction tables carry
/// their FKs inside the key). Targets are key-group columns on other tables
/// with a joinable type class.
pub fn enumerate(tables: &[AnalyzedTable], config: &DiscoveryConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut index = 0;

    for (fk_table_idx, fk_table) in tables.iter().enumerate() {
        for fk_column in &fk_table.columns {
            if fk_table.is_singleton_key(fk_column.position) {
                continue;
            }
            if !is_fk_shaped(&fk_column.name, &config.dictionary) {
                continue;
            }

            for (pk_table_idx, pk_table) in tables.iter().enumerate() {
                if pk_table_idx == fk_table_idx {
                    continue;
                }
                for pk_column in &pk_table.columns {
                    let (key_group, _) = match pk_table.key_group_of(pk_column.position) {
                        Some(found) => found,
                        None => continue,
                    };
                    if !fk_column.type_class.joinable_with(pk_column.type_class) {
                        continue;
                    }

                    candidates.push(Candidate {
                        index,
                        fk_table: fk_table_idx,
                        fk_column: fk_column.position,
                        pk_table: pk_table_idx,
                        pk_column: pk_column.position,
                        key_group,
                        evidence: EvidenceVector::default(),
                        raw_confidence: 0.0,
                        name_tier: NameMatchTier::Levenshtein,
                        composite_group: None,
                        cardinality: Cardinality::ManyToOne,
                        status: CandidateStatus::Proposed,
                    });
                    index += 1;
                }
            }
        }
    }

    candidates
}
