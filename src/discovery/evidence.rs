//! Multi-evidence candidate scoring.
//!
//! Every candidate receives a fixed-width evidence vector, one entry per
//! dimension, and `raw_confidence` is the weighted average of the entries.
//! There is exactly one scoring function; every stage that needs a score
//! reads it from the vector instead of recomputing.

use crate::discovery::config::{DiscoveryConfig, EvidenceWeights};
use crate::discovery::prepare::{AnalyzedColumn, AnalyzedTable};
use crate::model::types::type_compatibility;
use crate::model::{Cardinality, EvidenceBreakdown, SampleProfile};
use crate::naming::{name_similarity, EntityDictionary, NormalizedName};

/// Evidence dimensions, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKind {
    NameSimilarity,
    TypeCompatibility,
    ValueContainment,
    SchemaPattern,
    DomainPrior,
    Statistical,
    CardinalityPlausibility,
}

impl EvidenceKind {
    /// Stable identifier used in breakdowns.
    pub fn label(self) -> &'static str {
        match self {
            Self::NameSimilarity => "name_similarity",
            Self::TypeCompatibility => "type_compatibility",
            Self::ValueContainment => "value_containment",
            Self::SchemaPattern => "schema_pattern",
            Self::DomainPrior => "domain_prior",
            Self::Statistical => "statistical",
            Self::CardinalityPlausibility => "cardinality_plausibility",
        }
    }
}

/// One scored evidence dimension.
#[derive(Debug, Clone)]
pub struct Evidence {
    pub kind: EvidenceKind,
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Weight after any per-candidate adjustment (absent samples halve the
    /// containment weight).
    pub weight: f64,
    /// Short explanation of the award.
    pub note: String,
}

/// Fixed-width evidence vector for one candidate.
#[derive(Debug, Clone, Default)]
pub struct EvidenceVector {
    entries: Vec<Evidence>,
}

impl EvidenceVector {
    pub fn push(&mut self, kind: EvidenceKind, score: f64, weight: f64, note: impl Into<String>) {
        self.entries.push(Evidence {
            kind,
            score: score.clamp(0.0, 1.0),
            weight,
            note: note.into(),
        });
    }

    /// Weighted average of all entries, clamped to `[0, 1]`.
    ///
    /// Dividing by the live weight sum re-normalizes whenever a dimension's
    /// weight was reduced, and keeps confidence monotone in every score.
    pub fn weighted_confidence(&self) -> f64 {
        let total_weight: f64 = self.entries.iter().map(|e| e.weight).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let weighted_sum: f64 = self.entries.iter().map(|e| e.score * e.weight).sum();
        (weighted_sum / total_weight).clamp(0.0, 1.0)
    }

    /// Score of one dimension (0.0 if missing).
    pub fn score_of(&self, kind: EvidenceKind) -> f64 {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.score)
            .unwrap_or(0.0)
    }

    /// All entries, in vector order.
    pub fn entries(&self) -> &[Evidence] {
        &self.entries
    }

    /// Convert to the public breakdown representation.
    pub fn to_breakdown(&self) -> Vec<EvidenceBreakdown> {
        self.entries
            .iter()
            .map(|e| EvidenceBreakdown {
                kind: e.kind.label().to_string(),
                score: e.score,
                weight: e.weight,
                note: e.note.clone(),
            })
            .collect()
    }

    /// Replace one dimension's score, keeping its weight. Test support for
    /// monotonicity checks; not used by the pipeline.
    pub fn set_score(&mut self, kind: EvidenceKind, score: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.score = score.clamp(0.0, 1.0);
        }
    }
}

/// How the name-similarity score was established, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NameMatchTier {
    /// Exact upper-cased equality.
    Exact,
    /// Core entities are equal.
    CoreMatch,
    /// Core entities are dictionary variants.
    Variant,
    /// One core entity contains the other (shorter side ≥ 4 chars).
    Containment,
    /// Levenshtein fallback.
    Levenshtein,
}

/// Output of scoring one candidate pair.
#[derive(Debug, Clone)]
pub struct ScoredEvidence {
    pub vector: EvidenceVector,
    pub name_tier: NameMatchTier,
    pub cardinality: Cardinality,
}

/// Name similarity with tiered precedence: exact 1.0, core match 0.95,
/// variant 0.90, core containment 0.80, then Levenshtein.
pub fn score_name(
    fk: &NormalizedName,
    pk: &NormalizedName,
    dictionary: &EntityDictionary,
) -> (f64, NameMatchTier, String) {
    if fk.upper == pk.upper {
        return (1.0, NameMatchTier::Exact, "exact column name match".to_string());
    }
    if !fk.core_entity.is_empty() && fk.core_entity == pk.core_entity {
        return (
            0.95,
            NameMatchTier::CoreMatch,
            format!("core entity match: {}", fk.core_entity),
        );
    }
    if dictionary.are_variants(&fk.core_entity, &pk.core_entity) {
        return (
            0.90,
            NameMatchTier::Variant,
            format!("entity variants: {} ~ {}", fk.core_entity, pk.core_entity),
        );
    }
    let shorter = fk.core_entity.len().min(pk.core_entity.len());
    if shorter >= 4
        && (fk.core_entity.contains(&pk.core_entity) || pk.core_entity.contains(&fk.core_entity))
    {
        return (
            0.80,
            NameMatchTier::Containment,
            format!(
                "one entity contains the other: {} / {}",
                fk.core_entity, pk.core_entity
            ),
        );
    }
    let similarity = name_similarity(&fk.upper, &pk.upper);
    (
        similarity,
        NameMatchTier::Levenshtein,
        format!("string similarity {similarity:.2}"),
    )
}

/// Piecewise mapping from containment ratio to score.
///
/// Continuous at every breakpoint so the map stays monotone: the low branch
/// must reach exactly 0.2 at ratio 0.30, where the next branch picks up.
fn containment_score(ratio: f64) -> f64 {
    if ratio >= 0.95 {
        1.0
    } else if ratio >= 0.80 {
        0.8 + (ratio - 0.80) / 0.15 * 0.2
    } else if ratio >= 0.60 {
        0.5 + (ratio - 0.60) / 0.20 * 0.3
    } else if ratio >= 0.30 {
        0.2 + (ratio - 0.30) / 0.30 * 0.3
    } else {
        ratio * (0.2 / 0.30)
    }
}

/// Schema-pattern contributions, capped at 1.0.
fn score_schema_pattern(
    fk: &NormalizedName,
    pk: &NormalizedName,
    pk_table: &NormalizedName,
    dictionary: &EntityDictionary,
) -> (f64, String) {
    let mut score: f64 = 0.0;
    let mut reasons: Vec<&str> = Vec::new();

    let pk_self_named = dictionary.are_variants(&pk.core_entity, &pk_table.core_entity);

    if fk.is_prefixed_key()
        && pk.is_prefixed_key()
        && dictionary.are_variants(&fk.core_entity, &pk.core_entity)
        && pk_self_named
    {
        score += 0.6;
        reasons.push("prefix-entity-suffix convention");
    }

    let composed = format!("{}_{}", pk_table.upper, pk.upper);
    if (pk.upper.len() >= 4 && fk.upper.contains(&pk.upper)) || fk.upper == composed {
        score += 0.3;
        reasons.push("embeds target column name");
    }

    if pk_self_named {
        score += 0.1;
        reasons.push("target key names its own table");
    }

    let note = if reasons.is_empty() {
        "no schema pattern".to_string()
    } else {
        reasons.join("; ")
    };
    (score.min(1.0), note)
}

/// Statistical plausibility from sample profiles; neutral 0.5 when absent.
fn score_statistical(
    fk: Option<&SampleProfile>,
    pk: Option<&SampleProfile>,
) -> (f64, String) {
    let (fk, pk) = match (fk, pk) {
        (Some(fk), Some(pk)) => (fk, pk),
        _ => return (0.5, "no samples; neutral".to_string()),
    };

    let pk_ratio = pk.distinct_ratio();
    let pk_uniqueness = if pk_ratio >= 0.8 { 1.0 } else { pk_ratio / 0.8 };

    let fk_ratio = fk.distinct_ratio();
    let fk_spread = if fk_ratio <= pk_ratio {
        1.0
    } else {
        (1.0 - (fk_ratio - pk_ratio)).max(0.0)
    };

    let volume = if pk.total == 0 || fk.total >= pk.total {
        1.0
    } else {
        fk.total as f64 / pk.total as f64
    };

    let null_fraction = fk.null_fraction();
    let null_tolerance = if null_fraction <= 0.5 {
        1.0
    } else {
        ((1.0 - null_fraction) / 0.5).max(0.0)
    };

    let score = (pk_uniqueness + fk_spread + volume + null_tolerance) / 4.0;
    (
        score,
        format!(
            "pk distinct {pk_ratio:.2}, fk distinct {fk_ratio:.2}, fk nulls {null_fraction:.2}"
        ),
    )
}

/// Cardinality plausibility, also tagging the candidate's cardinality.
fn score_cardinality(
    fk: Option<&SampleProfile>,
    pk: Option<&SampleProfile>,
) -> (f64, Cardinality, String) {
    let fk = match fk {
        Some(fk) => fk,
        None => {
            return (
                0.5,
                Cardinality::ManyToOne,
                "no FK samples; assuming N:1".to_string(),
            )
        }
    };
    let pk_unique = pk.map(|p| p.distinct_ratio() >= 0.95).unwrap_or(true);
    let ratio = fk.distinct_ratio();
    if ratio >= 0.95 {
        let cardinality = Cardinality::from_uniqueness(true, pk_unique);
        (0.6, cardinality, "near-unique FK values".to_string())
    } else if ratio <= 0.5 {
        (
            0.9,
            Cardinality::ManyToOne,
            "heavily repeated FK values".to_string(),
        )
    } else {
        (
            0.75,
            Cardinality::ManyToOne,
            "moderately repeated FK values".to_string(),
        )
    }
}

/// Score one candidate pair across all evidence dimensions.
pub fn score_pair(
    fk_table: &AnalyzedTable,
    fk_column: &AnalyzedColumn,
    pk_table: &AnalyzedTable,
    pk_column: &AnalyzedColumn,
    config: &DiscoveryConfig,
) -> ScoredEvidence {
    let weights: &EvidenceWeights = &config.weights;
    let dictionary = &config.dictionary;
    let mut vector = EvidenceVector::default();

    let (name_score, name_tier, name_note) =
        score_name(&fk_column.name, &pk_column.name, dictionary);
    vector.push(
        EvidenceKind::NameSimilarity,
        name_score,
        weights.name_similarity,
        name_note,
    );

    let type_score = type_compatibility(
        fk_table.declared_type(fk_column.position),
        pk_table.declared_type(pk_column.position),
    );
    vector.push(
        EvidenceKind::TypeCompatibility,
        type_score,
        weights.type_compatibility,
        format!(
            "{} vs {}",
            fk_table.declared_type(fk_column.position),
            pk_table.declared_type(pk_column.position)
        ),
    );

    // Absent samples on either side: neutral score at half weight, which
    // re-normalizes the remaining dimensions through the weighted average.
    match (fk_column.profile.as_ref(), pk_column.profile.as_ref()) {
        (Some(fk_profile), Some(pk_profile)) => {
            let ratio = fk_profile.containment_in(pk_profile);
            vector.push(
                EvidenceKind::ValueContainment,
                containment_score(ratio),
                weights.value_containment,
                format!("{:.0}% of FK values found in target", ratio * 100.0),
            );
        }
        _ => {
            vector.push(
                EvidenceKind::ValueContainment,
                0.5,
                weights.value_containment / 2.0,
                "samples missing on one side; neutral at half weight",
            );
        }
    }

    let (pattern_score, pattern_note) = score_schema_pattern(
        &fk_column.name,
        &pk_column.name,
        &pk_table.entity,
        dictionary,
    );
    vector.push(
        EvidenceKind::SchemaPattern,
        pattern_score,
        weights.schema_pattern,
        pattern_note,
    );

    let prior = config.priors.score(
        &pk_table.entity.core_entity,
        &fk_table.entity.core_entity,
        dictionary,
    );
    vector.push(
        EvidenceKind::DomainPrior,
        prior,
        weights.domain_prior,
        format!(
            "prior for {} -> {}",
            fk_table.entity.upper, pk_table.entity.upper
        ),
    );

    let (stat_score, stat_note) = score_statistical(
        fk_column.profile.as_ref(),
        pk_column.profile.as_ref(),
    );
    vector.push(
        EvidenceKind::Statistical,
        stat_score,
        weights.statistical,
        stat_note,
    );

    let (cardinality_score, cardinality, cardinality_note) = score_cardinality(
        fk_column.profile.as_ref(),
        pk_column.profile.as_ref(),
    );
    vector.push(
        EvidenceKind::CardinalityPlausibility,
        cardinality_score,
        weights.cardinality,
        cardinality_note,
    );

    ScoredEvidence {
        vector,
        name_tier,
        cardinality,
    }
}

/// Score every proposed candidate, dropping the ones the deadline leaves
/// unscored. Returns whether the deadline interrupted the stage.
pub fn score_candidates(
    candidates: &mut [crate::discovery::candidates::Candidate],
    tables: &[AnalyzedTable],
    config: &DiscoveryConfig,
    deadline: &crate::discovery::Deadline,
) -> bool {
    use crate::discovery::candidates::CandidateStatus;

    let mut timed_out = false;
    for candidate in candidates.iter_mut() {
        if deadline.exceeded() {
            timed_out = true;
            candidate.status = CandidateStatus::Dropped;
            continue;
        }
        let fk_table = &tables[candidate.fk_table];
        let pk_table = &tables[candidate.pk_table];
        let scored = score_pair(
            fk_table,
            &fk_table.columns[candidate.fk_column],
            pk_table,
            &pk_table.columns[candidate.pk_column],
            config,
        );
        candidate.raw_confidence = scored.vector.weighted_confidence();
        candidate.evidence = scored.vector;
        candidate.name_tier = scored.name_tier;
        candidate.cardinality = scored.cardinality;
    }
    timed_out
}
