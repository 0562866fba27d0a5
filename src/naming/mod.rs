//! Identifier normalization for tables and columns.
//!
//! Column and table names across real schemas disagree on casing, table
//! prefixes (`C_CUSTKEY`), key suffixes (`_ID`, `KEY`) and pluralization.
//! Everything that compares names works on a [`NormalizedName`], which
//! canonicalizes all of that into a *core entity* token once, up front.

pub mod dictionary;
pub mod inflection;
pub mod similarity;

pub use dictionary::{BusinessPriors, EntityDictionary};
pub use similarity::name_similarity;

use serde::{Deserialize, Serialize};

/// Key suffixes stripped from names during normalization.
const KEY_SUFFIXES: [&str; 4] = ["KEY", "ID", "NUM", "NO"];

/// A canonicalized table or column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedName {
    /// The name exactly as supplied.
    pub original: String,
    /// Upper-cased form used for exact comparisons.
    pub upper: String,
    /// Entity token left after prefix and suffix stripping.
    ///
    /// Falls back to `upper` when stripping would leave nothing, so a name
    /// consisting entirely of a suffix keeps that suffix as its core.
    pub core_entity: String,
    /// Whether a trailing key suffix was stripped.
    pub suffix_removed: bool,
    /// Whether the name carries no entity information (`ID`, `X_ID`, ...).
    pub is_generic_id: bool,
}

impl NormalizedName {
    /// Normalize a raw table or column name.
    ///
    /// Rules, applied in order on the upper-cased name:
    /// 1. split on `_`; a leading token of length ≤ 2 is a table prefix and
    ///    is removed (names without `_` keep everything),
    /// 2. one trailing suffix in `{KEY, ID, NUM, NO}` is stripped from the
    ///    remainder,
    /// 3. an empty result falls back to the upper-cased original.
    pub fn of(name: &str) -> Self {
        let upper = name.to_uppercase();
        let after_prefix = strip_short_prefix(&upper);
        let (stripped, suffix_removed) = strip_one_suffix(after_prefix);

        let core_entity = if stripped.is_empty() {
            upper.clone()
        } else {
            stripped
        };

        // A name is generic when, prefix aside, it is nothing but a key
        // suffix (or too short to mean anything). The suffix is *not*
        // stripped first: `UID` carries entity information, `ID` does not.
        let is_generic_id =
            after_prefix.len() < 2 || KEY_SUFFIXES.contains(&after_prefix);

        Self {
            original: name.to_string(),
            upper,
            core_entity,
            suffix_removed,
            is_generic_id,
        }
    }

    /// Whether the name is underscore-structured and carried a key suffix,
    /// i.e. it follows an `<affix>_<entity><suffix>` shape.
    pub fn is_prefixed_key(&self) -> bool {
        self.suffix_removed && self.upper.contains('_')
    }
}

/// Remove a leading `_`-delimited token of length ≤ 2.
fn strip_short_prefix(upper: &str) -> &str {
    match upper.split_once('_') {
        Some((head, rest)) if head.len() <= 2 && !rest.is_empty() => rest,
        _ => upper,
    }
}

/// Strip exactly one trailing key suffix, plus any separator left behind.
fn strip_one_suffix(name: &str) -> (String, bool) {
    for suffix in KEY_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return (stripped.trim_end_matches('_').to_string(), true);
        }
    }
    (name.to_string(), false)
}
