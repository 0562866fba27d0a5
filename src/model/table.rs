//! Input table and column definitions.
//!
//! These are the logical table shapes the engine analyzes. They typically
//! come from warehouse catalog queries (via a
//! [`MetadataAdapter`](crate::metadata::MetadataAdapter)) or from caller
//! payloads; either way the engine only sees these structs.

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

/// A logical table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Workspace (database) the table lives in, upper-cased.
    pub workspace: String,
    /// Schema the table lives in, upper-cased.
    pub schema: String,
    /// Table name, upper-cased for matching.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Optional table comment, passed through to the result untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TableDef {
    /// Create a table definition, upper-casing the identifying parts.
    pub fn new(
        workspace: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
    ) -> Self {
        Self {
            workspace: workspace.into().to_uppercase(),
            schema: schema.into().to_uppercase(),
            name: name.into().to_uppercase(),
            columns,
            comment: None,
        }
    }

    /// Builder: attach a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A column within a [`TableDef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name as declared.
    pub name: String,
    /// Declared type string, e.g. `NUMBER` or `VARCHAR(255)`.
    pub declared_type: String,
    /// Whether the catalog declares this column part of the primary key.
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether the column is declared nullable.
    #[serde(default)]
    pub is_nullable: bool,
    /// Sampled values in fetch order; `None` entries are observed NULLs.
    /// Absent entirely when no sampling was done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_values: Option<Vec<Option<String>>>,
    /// Optional column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ColumnDef {
    /// Create a column definition with no key metadata or samples.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            is_primary_key: false,
            is_nullable: false,
            sample_values: None,
            comment: None,
        }
    }

    /// Builder: mark as a declared primary key column.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Builder: mark as declared nullable.
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Builder: attach non-null sample values.
    pub fn with_samples<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_values = Some(values.into_iter().map(|v| Some(v.into())).collect());
        self
    }

    /// Builder: attach sample values that may contain NULLs.
    pub fn with_nullable_samples(mut self, values: Vec<Option<String>>) -> Self {
        self.sample_values = Some(values);
        self
    }
}

/// A parsed table identifier.
///
/// Accepted forms are `table`, `schema.table` and `workspace.schema.table`,
/// with segments optionally wrapped in backticks or double quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    pub workspace: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TableIdentifier {
    /// Parse an identifier string, stripping quote wrappers per segment.
    ///
    /// The final segment is the table name and is upper-cased for matching.
    pub fn parse(identifier: &str) -> Result<Self, DiscoveryError> {
        let parts: Vec<String> = identifier
            .split('.')
            .map(|part| part.trim().trim_matches('`').trim_matches('"').to_string())
            .filter(|part| !part.is_empty())
            .collect();

        match parts.as_slice() {
            [table] => Ok(Self {
                workspace: None,
                schema: None,
                table: table.to_uppercase(),
            }),
            [schema, table] => Ok(Self {
                workspace: None,
                schema: Some(schema.clone()),
                table: table.to_uppercase(),
            }),
            [workspace, schema, table] => Ok(Self {
                workspace: Some(workspace.clone()),
                schema: Some(schema.clone()),
                table: table.to_uppercase(),
            }),
            _ => Err(DiscoveryError::BadIdentifier {
                identifier: identifier.to_string(),
            }),
        }
    }
}
