//! Metadata adapter interface and the schema-level entry point.
//!
//! The engine never talks to a warehouse itself. Callers hand it an adapter
//! that answers catalog queries synchronously; the engine treats every call
//! as a plain function call and manages no I/O concurrency of its own.
//!
//! Failure policy follows the error design: a failed column listing aborts
//! the run (there is nothing to analyze), while a failed sample fetch only
//! degrades that column to sample-less scoring.

use std::collections::HashMap;

use tracing::warn;

use crate::discovery::config::DEFAULT_SCHEMA_TABLE_CAP;
use crate::discovery::{discover_from_tables, DiscoveryConfig};
use crate::error::{AdapterError, Result};
use crate::model::{ColumnDef, DiscoveryOutcome, DiscoverySummary, TableDef, TableIdentifier};

/// One column row from a catalog listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRecord {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub declared_type: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub comment: Option<String>,
}

/// External collaborator supplying warehouse metadata.
///
/// All methods are synchronous from the engine's perspective; implementors
/// that wrap async clients must block internally.
pub trait MetadataAdapter {
    /// Table names within a schema.
    fn list_tables(&self, workspace: &str, schema: &str) -> std::result::Result<Vec<String>, AdapterError>;

    /// Column rows for the given tables, or for every table when
    /// `table_names` is `None`.
    fn list_columns(
        &self,
        workspace: &str,
        schema: &str,
        table_names: Option<&[String]>,
    ) -> std::result::Result<Vec<ColumnRecord>, AdapterError>;

    /// Up to `limit` sampled values for one column; `None` entries are NULLs.
    fn sample_values(
        &self,
        workspace: &str,
        schema: &str,
        table: &str,
        column: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Option<String>>, AdapterError>;
}

/// Discover relationships for the tables of one schema.
///
/// Table names may arrive in any accepted identifier form; wrappers are
/// stripped and the final segment upper-cased before matching. When the
/// caller sets no table cap, the schema entry point applies a default cap
/// of 60 tables.
pub fn discover_from_schema(
    adapter: &dyn MetadataAdapter,
    workspace: &str,
    schema: &str,
    table_names: Option<&[String]>,
    config: &DiscoveryConfig,
) -> Result<DiscoveryOutcome> {
    config.validate()?;

    let wanted: Vec<String> = match table_names {
        Some(names) => names
            .iter()
            .filter_map(|name| TableIdentifier::parse(name).ok())
            .map(|id| id.table)
            .collect(),
        None => adapter
            .list_tables(workspace, schema)?
            .into_iter()
            .map(|name| name.to_uppercase())
            .collect(),
    };

    if wanted.is_empty() {
        warn!(workspace, schema, "no tables to analyze");
        return Ok(empty_outcome());
    }

    let records = adapter.list_columns(workspace, schema, Some(&wanted))?;
    if records.is_empty() {
        warn!(workspace, schema, "no column metadata found");
        return Ok(empty_outcome());
    }

    // Group rows per table, preserving first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut by_table: HashMap<String, Vec<ColumnRecord>> = HashMap::new();
    for record in records {
        let table = record.table.to_uppercase();
        if !by_table.contains_key(&table) {
            order.push(table.clone());
        }
        by_table.entry(table).or_default().push(record);
    }

    let mut tables = Vec::with_capacity(order.len());
    for table_name in order {
        let rows = by_table.remove(&table_name).unwrap_or_default();
        let table_schema = rows
            .first()
            .map(|r| r.schema.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| schema.to_string());

        let columns = rows
            .into_iter()
            .map(|row| {
                let samples = fetch_samples(adapter, workspace, &table_schema, &table_name, &row, config);
                ColumnDef {
                    name: row.column,
                    declared_type: row.declared_type,
                    is_primary_key: row.is_primary_key,
                    is_nullable: row.is_nullable,
                    sample_values: samples,
                    comment: row.comment,
                }
            })
            .collect();

        tables.push(TableDef::new(workspace, table_schema, table_name, columns));
    }

    let mut run_config = config.clone();
    if run_config.max_tables.is_none() {
        run_config.max_tables = Some(DEFAULT_SCHEMA_TABLE_CAP);
    }
    discover_from_tables(tables, &run_config)
}

fn fetch_samples(
    adapter: &dyn MetadataAdapter,
    workspace: &str,
    schema: &str,
    table: &str,
    row: &ColumnRecord,
    config: &DiscoveryConfig,
) -> Option<Vec<Option<String>>> {
    if config.sample_values_per_column == 0 {
        return None;
    }
    match adapter.sample_values(
        workspace,
        schema,
        table,
        &row.column,
        config.sample_values_per_column,
    ) {
        Ok(values) if values.is_empty() => None,
        Ok(values) => Some(values),
        Err(error) => {
            warn!(
                table,
                column = %row.column,
                %error,
                "sample fetch failed; scoring without samples"
            );
            None
        }
    }
}

fn empty_outcome() -> DiscoveryOutcome {
    DiscoveryOutcome {
        relationships: Vec::new(),
        tables: Vec::new(),
        summary: DiscoverySummary::default(),
    }
}
