//! Input normalization and per-table analysis.
//!
//! Before any scoring happens the input tables are validated, truncated to
//! the table cap, sorted into a canonical order and annotated with
//! normalized names, type classes, sample profiles and key groups. All
//! later stages work exclusively on [`AnalyzedTable`]s, so output ordering
//! cannot depend on the caller's table order.

use tracing::{debug, warn};

use crate::discovery::config::DiscoveryConfig;
use crate::keys::{infer_key_groups, KeyColumn, KeyGroup};
use crate::model::types::TypeClass;
use crate::model::{SampleProfile, TableDef, TableIdentifier};
use crate::naming::NormalizedName;

/// A column annotated for scoring.
#[derive(Debug, Clone)]
pub struct AnalyzedColumn {
    /// Index into the owning table's column list.
    pub position: usize,
    /// Normalized name.
    pub name: NormalizedName,
    /// Coarse type class of the declared type.
    pub type_class: TypeClass,
    /// Sample profile, when samples were supplied.
    pub profile: Option<SampleProfile>,
}

/// A table annotated for scoring.
#[derive(Debug, Clone)]
pub struct AnalyzedTable {
    /// The normalized definition, authoritative for names and samples.
    pub def: TableDef,
    /// Normalized table name.
    pub entity: NormalizedName,
    /// Per-column annotations, in column order.
    pub columns: Vec<AnalyzedColumn>,
    /// Inferred or declared key groups.
    pub key_groups: Vec<KeyGroup>,
}

impl AnalyzedTable {
    /// Declared type of a column by position.
    pub fn declared_type(&self, position: usize) -> &str {
        &self.def.columns[position].declared_type
    }

    /// Raw column definition by position.
    pub fn column_def(&self, position: usize) -> &crate::model::ColumnDef {
        &self.def.columns[position]
    }

    /// Whether a column is the sole member of one of this table's key groups.
    pub fn is_singleton_key(&self, position: usize) -> bool {
        self.key_groups.iter().any(|g| g.is_singleton_of(position))
    }

    /// Whether a column belongs to a composite key group.
    pub fn in_composite_key(&self, position: usize) -> bool {
        self.key_groups
            .iter()
            .any(|g| g.is_composite() && g.position_of(position).is_some())
    }

    /// First key group containing a column, with its index.
    pub fn key_group_of(&self, position: usize) -> Option<(usize, &KeyGroup)> {
        self.key_groups
            .iter()
            .enumerate()
            .find(|(_, g)| g.position_of(position).is_some())
    }
}

/// Result of input preparation.
#[derive(Debug)]
pub struct PreparedInput {
    /// Analyzed tables in canonical `(workspace, schema, name)` order.
    pub tables: Vec<AnalyzedTable>,
    /// Notes about skipped tables and applied caps.
    pub notes: Vec<String>,
    /// Whether the table cap truncated the input.
    pub table_capped: bool,
}

/// Normalize loose table definitions: parse qualified identifiers out of
/// the name field and fill empty workspace/schema from the defaults.
///
/// Unparseable identifiers reject the single table with a note, never the run.
pub fn normalize_definitions(
    definitions: &[TableDef],
    config: &DiscoveryConfig,
    notes: &mut Vec<String>,
) -> Vec<TableDef> {
    let mut normalized = Vec::with_capacity(definitions.len());
    for def in definitions {
        let identifier = match TableIdentifier::parse(&def.name) {
            Ok(identifier) => identifier,
            Err(_) => {
                warn!(identifier = %def.name, "skipping table with unparseable identifier");
                notes.push(format!("Skipped table with unparseable identifier '{}'.", def.name));
                continue;
            }
        };

        let workspace = pick_part(&def.workspace, identifier.workspace, &config.default_workspace);
        let schema = pick_part(&def.schema, identifier.schema, &config.default_schema);

        let mut table = TableDef::new(workspace, schema, identifier.table, def.columns.clone());
        table.comment = def.comment.clone();
        normalized.push(table);
    }
    normalized
}

fn pick_part(explicit: &str, parsed: Option<String>, default: &str) -> String {
    if !explicit.trim().is_empty() {
        explicit.trim().to_string()
    } else if let Some(part) = parsed.filter(|p| !p.trim().is_empty()) {
        part
    } else {
        default.to_string()
    }
}

/// Validate, cap, sort and annotate the input tables.
pub fn prepare(tables: Vec<TableDef>, config: &DiscoveryConfig) -> PreparedInput {
    let mut notes = Vec::new();
    let mut tables = tables;
    let mut table_capped = false;

    if let Some(cap) = config.max_tables {
        if tables.len() > cap {
            notes.push(format!(
                "Input contained {} tables; analysis limited to first {}.",
                tables.len(),
                cap
            ));
            tables.truncate(cap);
            table_capped = true;
        }
    }

    let mut analyzed: Vec<AnalyzedTable> = tables
        .into_iter()
        .filter_map(|table| match validate_table(&table) {
            Ok(()) => Some(analyze_table(table, config)),
            Err(reason) => {
                warn!(table = %table.name, %reason, "skipping malformed table");
                notes.push(format!("Skipped table '{}': {}.", table.name, reason));
                None
            }
        })
        .collect();

    // Canonical order decouples every later stage from input order.
    analyzed.sort_by(|a, b| {
        (&a.def.workspace, &a.def.schema, &a.def.name)
            .cmp(&(&b.def.workspace, &b.def.schema, &b.def.name))
    });

    debug!(tables = analyzed.len(), "prepared input tables");
    PreparedInput {
        tables: analyzed,
        notes,
        table_capped,
    }
}

fn validate_table(table: &TableDef) -> Result<(), String> {
    if table.name.trim().is_empty() {
        return Err("missing table name".to_string());
    }
    if table.columns.is_empty() {
        return Err("no columns".to_string());
    }
    let mut seen = std::collections::HashSet::new();
    for column in &table.columns {
        if column.name.trim().is_empty() {
            return Err("column with empty name".to_string());
        }
        if column.declared_type.trim().is_empty() {
            return Err(format!("column '{}' has no declared type", column.name));
        }
        if !seen.insert(column.name.to_uppercase()) {
            return Err(format!("duplicate column name '{}'", column.name));
        }
    }
    Ok(())
}

fn analyze_table(def: TableDef, config: &DiscoveryConfig) -> AnalyzedTable {
    let entity = NormalizedName::of(&def.name);

    let columns: Vec<AnalyzedColumn> = def
        .columns
        .iter()
        .enumerate()
        .map(|(position, column)| AnalyzedColumn {
            position,
            name: NormalizedName::of(&column.name),
            type_class: TypeClass::of(&column.declared_type),
            profile: column
                .sample_values
                .as_deref()
                .and_then(SampleProfile::from_samples),
        })
        .collect();

    let key_columns: Vec<KeyColumn<'_>> = columns
        .iter()
        .map(|c| KeyColumn {
            name: &c.name,
            is_declared_primary_key: def.columns[c.position].is_primary_key,
            profile: c.profile.as_ref(),
            raw_samples: def.columns[c.position].sample_values.as_deref(),
        })
        .collect();
    let key_groups = infer_key_groups(&entity, &key_columns, &config.dictionary);

    AnalyzedTable {
        def,
        entity,
        columns,
        key_groups,
    }
}
