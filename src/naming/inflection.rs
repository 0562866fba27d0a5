//! Singular/plural reconciliation for table and entity names.
//!
//! Wraps the `inflector` crate with a small overlay of irregular forms that
//! show up in real schemas and that the generic rules get wrong.

use inflector::Inflector;

/// Irregular singular/plural pairs seen in warehouse table names.
static IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("category", "categories"),
    ("company", "companies"),
    ("country", "countries"),
    ("address", "addresses"),
    ("status", "statuses"),
    ("analysis", "analyses"),
    ("index", "indices"),
    ("datum", "data"),
    ("medium", "media"),
];

/// Singular form of a word, lower-cased.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULARS {
        if lower == *plural || lower == *singular {
            return (*singular).to_string();
        }
    }
    lower.to_singular()
}

/// Whether two names denote the same word modulo pluralization.
///
/// Comparison is case-insensitive; `ORDERS` matches `order`, `CATEGORIES`
/// matches `category`. Short names (3 chars or fewer) are compared exactly
/// so that abbreviations like `PS` or `NO` are never "singularized".
pub fn same_word(a: &str, b: &str) -> bool {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    if a_lower == b_lower {
        return true;
    }
    if a_lower.len() <= 3 || b_lower.len() <= 3 {
        return false;
    }
    singularize(&a_lower) == singularize(&b_lower)
}
