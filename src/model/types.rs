//! Declared-type normalization.
//!
//! Warehouse metadata reports column types as free-form strings
//! (`NUMBER`, `DECIMAL(10,2)`, `varchar(255)`, ...). Scoring only needs a
//! coarse classification, so every declared type is folded into one of five
//! classes before any comparison happens.

use serde::{Deserialize, Serialize};

/// Coarse class of a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeClass {
    /// Integer, decimal and floating point types.
    Numeric,
    /// Character and text types.
    Text,
    /// Date, time and timestamp types.
    Temporal,
    /// Boolean types.
    Boolean,
    /// Anything not recognized (binary, json, vendor extensions).
    Other,
}

impl TypeClass {
    /// Classify a declared type string.
    ///
    /// Parameterized forms like `DECIMAL(10,2)` or `VARCHAR(255)` classify by
    /// their base token; the parameters are irrelevant for join scoring.
    pub fn of(declared: &str) -> Self {
        match base_token(declared).as_str() {
            "NUMBER" | "NUMERIC" | "DECIMAL" | "INT" | "INTEGER" | "BIGINT" | "SMALLINT"
            | "TINYINT" | "INT8" | "INT16" | "INT32" | "INT64" | "FLOAT" | "FLOAT32"
            | "FLOAT64" | "DOUBLE" | "REAL" => Self::Numeric,
            "STRING" | "VARCHAR" | "NVARCHAR" | "CHAR" | "NCHAR" | "TEXT" | "NTEXT" => Self::Text,
            "DATE" | "TIME" | "DATETIME" | "TIMESTAMP" | "TIMESTAMPTZ" | "TIMESTAMP_NTZ"
            | "TIMESTAMP_LTZ" | "TIMESTAMP_TZ" => Self::Temporal,
            "BOOL" | "BOOLEAN" => Self::Boolean,
            _ => Self::Other,
        }
    }

    /// Whether two classes may appear on the two sides of a join candidate.
    ///
    /// Equal classes are always joinable. `Other` stays in play because an
    /// unrecognized vendor type says nothing either way; cross-class pairs
    /// (numeric vs text, anything vs boolean/temporal) are excluded up front.
    pub fn joinable_with(self, other: TypeClass) -> bool {
        self == other || self == Self::Other || other == Self::Other
    }
}

/// Uppercased base token of a declared type: `decimal(10,2)` -> `DECIMAL`.
fn base_token(declared: &str) -> String {
    let trimmed = declared.trim();
    let end = trimmed
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    trimmed[..end].to_uppercase()
}

/// Type-compatibility score for a candidate pair.
///
/// Identical base tokens score 1.0, within-class variations (e.g. `VARCHAR`
/// vs `TEXT`) score 0.8, and everything else scores 0.1. Cross-class pairs
/// are never enumerated in the first place unless one side is unclassified,
/// so the low score acts as a penalty rather than a hard drop.
pub fn type_compatibility(fk_declared: &str, pk_declared: &str) -> f64 {
    if base_token(fk_declared) == base_token(pk_declared) {
        return 1.0;
    }
    let fk_class = TypeClass::of(fk_declared);
    let pk_class = TypeClass::of(pk_declared);
    if fk_class == pk_class && fk_class != TypeClass::Other {
        0.8
    } else {
        0.1
    }
}
