//! Result assembly.
//!
//! Turns accepted candidates and derived bridges into the emitted
//! [`Relationship`] list: merging composite clusters into multi-pair
//! relationships, applying the single documented total order, enforcing the
//! relationship cap and assigning collision-free stable names.

use std::collections::{BTreeMap, HashMap};

use crate::discovery::bridge::BridgeLink;
use crate::discovery::candidates::Candidate;
use crate::discovery::config::DiscoveryConfig;
use crate::discovery::prepare::AnalyzedTable;
use crate::model::{
    Cardinality, ColumnPair, EvidenceBreakdown, JoinType, Provenance, Relationship,
};

struct Pending {
    left_table: String,
    right_table: String,
    column_pairs: Vec<ColumnPair>,
    join_type: JoinType,
    cardinality: Cardinality,
    confidence: f64,
    provenance: Provenance,
    evidence: Vec<EvidenceBreakdown>,
    /// Enumeration-based tie-breaker; derived links sort after all direct
    /// candidates with equal keys.
    order_index: usize,
}

/// Build the final relationship list. Returns the relationships and whether
/// the relationship cap truncated them.
pub fn assemble(
    candidates: &[Candidate],
    accepted: &[usize],
    bridges: &[BridgeLink],
    tables: &[AnalyzedTable],
    config: &DiscoveryConfig,
) -> (Vec<Relationship>, bool) {
    let mut pending = Vec::new();

    // Candidates sharing a composite target key merge into one
    // relationship; everything else emits one relationship per candidate.
    let mut clusters: BTreeMap<(usize, usize, usize), Vec<usize>> = BTreeMap::new();
    for &idx in accepted {
        let c = &candidates[idx];
        clusters
            .entry((c.fk_table, c.pk_table, c.key_group))
            .or_default()
            .push(idx);
    }

    for ((fk_table_idx, pk_table_idx, key_group), members) in clusters {
        let fk_table = &tables[fk_table_idx];
        let pk_table = &tables[pk_table_idx];
        let group = &pk_table.key_groups[key_group];

        let distinct_targets = {
            let mut targets: Vec<usize> =
                members.iter().map(|&i| candidates[i].pk_column).collect();
            targets.sort_unstable();
            targets.dedup();
            targets.len() == members.len()
        };

        if group.is_composite() && members.len() > 1 && distinct_targets {
            pending.push(merge_cluster(&members, candidates, fk_table, pk_table, key_group));
        } else {
            for &idx in &members {
                pending.push(single_relationship(&candidates[idx], fk_table, pk_table));
            }
        }
    }

    for (seq, link) in bridges.iter().enumerate() {
        let left = &candidates[link.left_candidate];
        let right = &candidates[link.right_candidate];
        let left_table = &tables[left.pk_table];
        let right_table = &tables[right.pk_table];

        pending.push(Pending {
            left_table: left_table.def.name.clone(),
            right_table: right_table.def.name.clone(),
            column_pairs: vec![ColumnPair {
                left_column: left_table.def.columns[left.pk_column].name.clone(),
                right_column: right_table.def.columns[right.pk_column].name.clone(),
            }],
            join_type: JoinType::Inner,
            cardinality: Cardinality::ManyToMany,
            confidence: left.raw_confidence.min(right.raw_confidence),
            provenance: Provenance::Via {
                junction: tables[link.junction].def.name.clone(),
            },
            evidence: Vec::new(),
            order_index: candidates.len() + seq,
        });
    }

    // The one documented total order: confidence first, then names, then
    // the enumeration tie-breaker. Independent of input table order.
    pending.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.left_table.cmp(&b.left_table))
            .then_with(|| a.right_table.cmp(&b.right_table))
            .then_with(|| column_key(&a.column_pairs).cmp(&column_key(&b.column_pairs)))
            .then_with(|| a.order_index.cmp(&b.order_index))
    });

    let mut truncated = false;
    if let Some(cap) = config.max_relationships {
        if pending.len() > cap {
            pending.truncate(cap);
            truncated = true;
        }
    }

    let mut name_counts: HashMap<String, usize> = HashMap::new();
    let relationships = pending
        .into_iter()
        .map(|p| {
            let base = match &p.provenance {
                Provenance::Direct => format!("{}_TO_{}", p.left_table, p.right_table),
                Provenance::Via { junction } => {
                    format!("{}_TO_{}_VIA_{}", p.left_table, p.right_table, junction)
                }
            };
            let count = name_counts.entry(base.clone()).or_insert(0);
            *count += 1;
            let name = if *count == 1 {
                base
            } else {
                format!("{}_{}", base, count)
            };

            Relationship {
                name,
                left_table: p.left_table,
                right_table: p.right_table,
                column_pairs: p.column_pairs,
                join_type: p.join_type,
                cardinality: p.cardinality,
                confidence: p.confidence,
                provenance: p.provenance,
                evidence: p.evidence,
            }
        })
        .collect();

    (relationships, truncated)
}

fn column_key(pairs: &[ColumnPair]) -> Vec<(&str, &str)> {
    pairs
        .iter()
        .map(|p| (p.left_column.as_str(), p.right_column.as_str()))
        .collect()
}

fn fk_is_nullable(candidate: &Candidate, fk_table: &AnalyzedTable) -> bool {
    let def = fk_table.column_def(candidate.fk_column);
    if def.is_nullable {
        return true;
    }
    fk_table.columns[candidate.fk_column]
        .profile
        .as_ref()
        .is_some_and(|p| p.saw_null())
}

fn single_relationship(
    candidate: &Candidate,
    fk_table: &AnalyzedTable,
    pk_table: &AnalyzedTable,
) -> Pending {
    let join_type = if fk_is_nullable(candidate, fk_table) {
        JoinType::Left
    } else {
        JoinType::Inner
    };
    Pending {
        left_table: fk_table.def.name.clone(),
        right_table: pk_table.def.name.clone(),
        column_pairs: vec![ColumnPair {
            left_column: fk_table.def.columns[candidate.fk_column].name.clone(),
            right_column: pk_table.def.columns[candidate.pk_column].name.clone(),
        }],
        join_type,
        cardinality: candidate.cardinality,
        confidence: candidate.raw_confidence,
        provenance: Provenance::Direct,
        evidence: candidate.evidence.to_breakdown(),
        order_index: candidate.index,
    }
}

/// Merge a composite cluster into one relationship, pairs ordered by PK
/// column position within the target key group.
fn merge_cluster(
    members: &[usize],
    candidates: &[Candidate],
    fk_table: &AnalyzedTable,
    pk_table: &AnalyzedTable,
    key_group: usize,
) -> Pending {
    let group = &pk_table.key_groups[key_group];

    let mut column_pairs = Vec::new();
    let mut nullable = false;
    for &pk_column in &group.columns {
        let Some(&member) = members
            .iter()
            .find(|&&i| candidates[i].pk_column == pk_column)
        else {
            continue;
        };
        let candidate = &candidates[member];
        nullable |= fk_is_nullable(candidate, fk_table);
        column_pairs.push(ColumnPair {
            left_column: fk_table.def.columns[candidate.fk_column].name.clone(),
            right_column: pk_table.def.columns[pk_column].name.clone(),
        });
    }

    let best = members
        .iter()
        .copied()
        .max_by(|&a, &b| {
            candidates[a]
                .raw_confidence
                .total_cmp(&candidates[b].raw_confidence)
                .then(candidates[b].index.cmp(&candidates[a].index))
        })
        .expect("cluster has members");

    Pending {
        left_table: fk_table.def.name.clone(),
        right_table: pk_table.def.name.clone(),
        column_pairs,
        join_type: if nullable { JoinType::Left } else { JoinType::Inner },
        cardinality: Cardinality::ManyToOne,
        confidence: candidates[best].raw_confidence,
        provenance: Provenance::Direct,
        evidence: candidates[best].evidence.to_breakdown(),
        order_index: members.iter().copied().min().unwrap_or(0),
    }
}
