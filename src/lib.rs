//! # Weaver
//!
//! A schema relationship discovery engine: given logical table definitions
//! (columns, declared or inferred keys, types, optional sampled values),
//! it infers FK→PK relationships and assigns each one a calibrated
//! confidence score and a cardinality classification.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        TableDefs (caller payloads / MetadataAdapter)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [naming + keys]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Normalized names, type classes, sample profiles,       │
//! │   primary-key groups (declared or inferred)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [discovery pipeline]
//! ┌─────────────────────────────────────────────────────────┐
//! │   enumerate → score → composite → arbitrate → bridge     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [assembler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   DiscoveryOutcome (ordered relationships + summary)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use weaver::{discover_from_tables, ColumnDef, DiscoveryConfig, TableDef};
//!
//! let customers = TableDef::new(
//!     "OFFLINE",
//!     "PUBLIC",
//!     "CUSTOMERS",
//!     vec![
//!         ColumnDef::new("customer_id", "NUMBER").primary_key(),
//!         ColumnDef::new("name", "STRING"),
//!     ],
//! );
//! let orders = TableDef::new(
//!     "OFFLINE",
//!     "PUBLIC",
//!     "ORDERS",
//!     vec![
//!         ColumnDef::new("order_id", "NUMBER").primary_key(),
//!         ColumnDef::new("customer_id", "NUMBER"),
//!     ],
//! );
//!
//! let outcome =
//!     discover_from_tables(vec![customers, orders], &DiscoveryConfig::default()).unwrap();
//! assert_eq!(outcome.relationships[0].right_table, "CUSTOMERS");
//! ```

pub mod discovery;
pub mod error;
pub mod keys;
pub mod metadata;
pub mod model;
pub mod naming;

pub use discovery::{
    discover_from_table_definitions, discover_from_tables, DiscoveryConfig, DiscoveryEngine,
    EvidenceWeights,
};
pub use error::{AdapterError, DiscoveryError};
pub use metadata::{discover_from_schema, ColumnRecord, MetadataAdapter};
pub use model::{
    Cardinality, ColumnDef, ColumnPair, DiscoveryOutcome, DiscoverySummary, EvidenceBreakdown,
    JoinType, Provenance, Relationship, TableDef,
};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::discovery::{
        discover_from_table_definitions, discover_from_tables, DiscoveryConfig, DiscoveryEngine,
        EvidenceWeights,
    };
    pub use crate::error::{AdapterError, DiscoveryError};
    pub use crate::metadata::{discover_from_schema, ColumnRecord, MetadataAdapter};
    pub use crate::model::{
        Cardinality, ColumnDef, ColumnPair, DiscoveryOutcome, DiscoverySummary, JoinType,
        Provenance, Relationship, TableDef,
    };
    pub use crate::naming::{BusinessPriors, EntityDictionary};
}
