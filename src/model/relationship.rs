//! Emitted relationship and result types.

use serde::{Deserialize, Serialize};

use super::TableDef;

/// Cardinality of a relationship, FK side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    ManyToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    /// Classify from distinct-value ratios where known.
    ///
    /// A near-unique FK column against a unique PK column reads as 1:1;
    /// anything with repetition on the FK side reads as N:1.
    pub fn from_uniqueness(fk_near_unique: bool, pk_unique: bool) -> Self {
        match (fk_near_unique, pk_unique) {
            (true, true) => Self::OneToOne,
            (false, true) => Self::ManyToOne,
            (true, false) => Self::OneToMany,
            (false, false) => Self::ManyToMany,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneToOne => write!(f, "1:1"),
            Self::ManyToOne => write!(f, "N:1"),
            Self::OneToMany => write!(f, "1:N"),
            Self::ManyToMany => write!(f, "N:N"),
        }
    }
}

/// Join type recommended for a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// Default when the FK side is not known to be nullable.
    Inner,
    /// Used when NULLs were observed in FK samples or the column is declared nullable.
    Left,
}

/// How a relationship was established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Scored directly from an FK/PK column pair.
    Direct,
    /// Synthesized from two direct relationships through a junction table.
    Via {
        /// Upper-cased name of the junction table.
        junction: String,
    },
}

/// One matched column pair within a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    /// Column on the left (FK) table.
    pub left_column: String,
    /// Column on the right (PK) table.
    pub right_column: String,
}

/// A contribution of one evidence dimension to a relationship's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBreakdown {
    /// Evidence dimension identifier, e.g. `name_similarity`.
    pub kind: String,
    /// Raw score in `[0, 1]`.
    pub score: f64,
    /// Weight applied after re-normalization.
    pub weight: f64,
    /// Human-readable note on why the score was awarded.
    pub note: String,
}

/// An inferred relationship between two tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Stable name, `<LEFT>_TO_<RIGHT>` with `_VIA_<J>` for derived ones.
    pub name: String,
    /// FK-side table name.
    pub left_table: String,
    /// PK-side table name.
    pub right_table: String,
    /// Matched column pairs, ordered by PK column position in its key group.
    pub column_pairs: Vec<ColumnPair>,
    /// Recommended join type.
    pub join_type: JoinType,
    /// Cardinality, FK side first.
    pub cardinality: Cardinality,
    /// Calibrated confidence in `[0, 1]`.
    pub confidence: f64,
    /// Direct or derived-via-junction origin.
    pub provenance: Provenance,
    /// Per-dimension contributions that produced `confidence`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<EvidenceBreakdown>,
}

/// Counters describing a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub total_tables: usize,
    pub total_columns: usize,
    pub total_relationships: usize,
    pub processing_time_ms: u64,
    pub limited_by_timeout: bool,
    pub limited_by_max_relationships: bool,
    pub limited_by_table_cap: bool,
    /// Notes about skipped tables or applied caps, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The full output of a discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryOutcome {
    /// Accepted and derived relationships in deterministic order.
    pub relationships: Vec<Relationship>,
    /// The normalized table definitions that were analyzed.
    pub tables: Vec<TableDef>,
    /// Run counters, populated even when no relationships were found.
    pub summary: DiscoverySummary,
}
