//! Primary-key group inference.
//!
//! Every FK candidate must target a column inside a key group, so this
//! module decides, per table, which column sets count as primary keys.
//! Declared metadata wins outright; when it is missing, groups are inferred
//! from naming and from sample-value uniqueness, with composite junction
//! keys recognized last.

use serde::{Deserialize, Serialize};

use crate::model::SampleProfile;
use crate::naming::{EntityDictionary, NormalizedName};

/// Where a key group came from.
///
/// Ordering encodes trust: declared metadata beats sample evidence, and
/// sample evidence beats naming (sample groups are only ever created from
/// unanimous samples, i.e. every known sample unique and non-null).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyProvenance {
    Declared,
    InferredBySamples,
    InferredByName,
}

/// An ordered set of column indices forming a primary key, single or composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
    /// Column indices within the owning table, in column order.
    pub columns: Vec<usize>,
    /// Provenance tag for trust ordering.
    pub provenance: KeyProvenance,
}

impl KeyGroup {
    /// Whether the group spans more than one column.
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// Whether the group is exactly this one column.
    pub fn is_singleton_of(&self, column: usize) -> bool {
        self.columns.len() == 1 && self.columns[0] == column
    }

    /// Position of a column within the group, if it is a member.
    pub fn position_of(&self, column: usize) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

/// Per-column view consumed by key inference.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumn<'a> {
    /// Normalized column name.
    pub name: &'a NormalizedName,
    /// Declared primary-key flag from catalog metadata.
    pub is_declared_primary_key: bool,
    /// Sampled-value profile, if sampling happened.
    pub profile: Option<&'a SampleProfile>,
    /// Raw samples in fetch order, for joint-tuple uniqueness checks.
    pub raw_samples: Option<&'a [Option<String>]>,
}

/// Infer the key groups of one table.
///
/// 1. Columns declared primary form one group (singleton or composite) and
///    suppress all inference.
/// 2. Otherwise, columns whose core entity matches the table's entity and
///    whose name ends in `KEY`/`ID` (and is not generic) become singleton
///    name-inferred groups.
/// 3. Columns whose samples are fully distinct and non-null become
///    singleton sample-inferred groups.
/// 4. If nothing was found, two or more key-suffixed columns form a
///    composite group when their sample tuples are jointly unique, or when
///    the table name reads as a junction of their entities.
pub fn infer_key_groups(
    table_entity: &NormalizedName,
    columns: &[KeyColumn<'_>],
    dictionary: &EntityDictionary,
) -> Vec<KeyGroup> {
    let declared: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_declared_primary_key)
        .map(|(i, _)| i)
        .collect();
    if !declared.is_empty() {
        return vec![KeyGroup {
            columns: declared,
            provenance: KeyProvenance::Declared,
        }];
    }

    let mut groups = Vec::new();

    // Sample-backed singletons first: unanimous sample evidence outranks naming.
    for (idx, column) in columns.iter().enumerate() {
        if column
            .profile
            .is_some_and(|p| p.is_unique_non_null())
        {
            groups.push(KeyGroup {
                columns: vec![idx],
                provenance: KeyProvenance::InferredBySamples,
            });
        }
    }

    for (idx, column) in columns.iter().enumerate() {
        if groups.iter().any(|g| g.is_singleton_of(idx)) {
            continue;
        }
        if is_self_named_key(column.name, table_entity, dictionary) {
            groups.push(KeyGroup {
                columns: vec![idx],
                provenance: KeyProvenance::InferredByName,
            });
        }
    }

    if groups.is_empty() {
        if let Some(group) = infer_composite_group(table_entity, columns, dictionary) {
            groups.push(group);
        }
    }

    groups
}

/// Whether a column names the table's own entity with a key suffix,
/// e.g. `customer_id` on a `CUSTOMERS` table.
fn is_self_named_key(
    name: &NormalizedName,
    table_entity: &NormalizedName,
    dictionary: &EntityDictionary,
) -> bool {
    if name.is_generic_id || !has_key_suffix(name) {
        return false;
    }
    dictionary.are_variants(&name.core_entity, &table_entity.core_entity)
}

fn has_key_suffix(name: &NormalizedName) -> bool {
    name.upper.ends_with("KEY") || name.upper.ends_with("ID")
}

/// Recognize a composite junction key among key-suffixed columns.
fn infer_composite_group(
    table_entity: &NormalizedName,
    columns: &[KeyColumn<'_>],
    dictionary: &EntityDictionary,
) -> Option<KeyGroup> {
    let members: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| has_key_suffix(c.name) && !c.name.is_generic_id)
        .map(|(i, _)| i)
        .collect();
    if members.len() < 2 {
        return None;
    }

    if joint_samples_unique(columns, &members) {
        return Some(KeyGroup {
            columns: members,
            provenance: KeyProvenance::InferredBySamples,
        });
    }

    let all_named_in_table = members.iter().all(|idx| {
        table_mentions_entity(table_entity, &columns[*idx].name.core_entity, dictionary)
    });
    if all_named_in_table {
        return Some(KeyGroup {
            columns: members,
            provenance: KeyProvenance::InferredByName,
        });
    }

    None
}

/// Whether row-aligned sample tuples over the member columns are all
/// distinct and free of NULLs. Requires samples on every member.
fn joint_samples_unique(columns: &[KeyColumn<'_>], members: &[usize]) -> bool {
    let samples: Vec<&[Option<String>]> = match members
        .iter()
        .map(|idx| columns[*idx].raw_samples)
        .collect::<Option<Vec<_>>>()
    {
        Some(s) => s,
        None => return false,
    };
    let rows = samples.iter().map(|s| s.len()).min().unwrap_or(0);
    if rows == 0 {
        return false;
    }

    let mut seen = std::collections::HashSet::with_capacity(rows);
    for row in 0..rows {
        let mut tuple = Vec::with_capacity(members.len());
        for column_samples in &samples {
            match &column_samples[row] {
                Some(value) => tuple.push(value.clone()),
                None => return false,
            }
        }
        if !seen.insert(tuple) {
            return false;
        }
    }
    true
}

/// Whether the table name mentions an entity (or one of its variants),
/// the way `ORDER_ITEMS` mentions both `ORDER` and `ITEM`.
fn table_mentions_entity(
    table_entity: &NormalizedName,
    member_core: &str,
    dictionary: &EntityDictionary,
) -> bool {
    if member_core.len() < 3 {
        return false;
    }
    if table_entity.upper.contains(member_core) {
        return true;
    }
    if let Some(canonical) = dictionary.canonical_of(member_core) {
        if table_entity.upper.contains(canonical) {
            return true;
        }
        return dictionary
            .variants(canonical)
            .iter()
            .any(|v| v.len() >= 3 && table_entity.upper.contains(v));
    }
    false
}
