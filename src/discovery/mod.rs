//! The relationship discovery engine.
//!
//! A single worker walks the pipeline stage by stage:
//!
//! ```text
//! TableDefs ──▶ prepare ──▶ enumerate ──▶ score ──▶ composite
//!                                                      │
//!     DiscoveryOutcome ◀── assemble ◀── bridge ◀── arbitrate
//! ```
//!
//! Given identical inputs the engine produces bit-identical output:
//! enumeration is ordered, sorts are stable, ties break on the enumeration
//! index, and no map iteration order ever drives a decision.

pub mod arbitration;
pub mod assembler;
pub mod bridge;
pub mod candidates;
pub mod composite;
pub mod config;
pub mod evidence;
pub mod prepare;

pub use config::{DiscoveryConfig, EvidenceWeights};

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::model::{DiscoveryOutcome, DiscoverySummary, TableDef};

/// Run deadline checked at stage boundaries and before each candidate's
/// score computation.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    state: DeadlineState,
}

#[derive(Debug, Clone, Copy)]
enum DeadlineState {
    Unbounded,
    At(Instant),
    Expired,
}

impl Deadline {
    /// Deadline `seconds` from now; `None` disables it.
    pub fn after_seconds(seconds: Option<f64>) -> Self {
        let state = match seconds {
            None => DeadlineState::Unbounded,
            Some(s) if s <= 0.0 => DeadlineState::Expired,
            Some(s) => DeadlineState::At(Instant::now() + Duration::from_secs_f64(s)),
        };
        Self { state }
    }

    /// No deadline.
    pub fn none() -> Self {
        Self {
            state: DeadlineState::Unbounded,
        }
    }

    /// A deadline that has already passed. Test support.
    pub fn already_exceeded() -> Self {
        Self {
            state: DeadlineState::Expired,
        }
    }

    /// Whether the deadline has passed.
    pub fn exceeded(&self) -> bool {
        match self.state {
            DeadlineState::Unbounded => false,
            DeadlineState::Expired => true,
            DeadlineState::At(at) => Instant::now() >= at,
        }
    }
}

/// The discovery engine: a validated configuration plus the pipeline.
///
/// The engine holds no per-run state; repeat calls re-enumerate from
/// scratch, and one engine may serve many runs.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
}

impl DiscoveryEngine {
    /// Create an engine, rejecting invalid configurations up front.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Analyze pre-normalized tables.
    pub fn discover(&self, tables: Vec<TableDef>) -> DiscoveryOutcome {
        self.discover_with_notes(tables, Vec::new())
    }

    fn discover_with_notes(
        &self,
        tables: Vec<TableDef>,
        mut notes: Vec<String>,
    ) -> DiscoveryOutcome {
        let started = Instant::now();
        let deadline = Deadline::after_seconds(self.config.timeout_seconds);

        let mut prepared = prepare::prepare(tables, &self.config);
        notes.append(&mut prepared.notes);

        let mut candidates = candidates::enumerate(&prepared.tables, &self.config);
        debug!(candidates = candidates.len(), "enumerated candidates");

        let mut limited_by_timeout = evidence::score_candidates(
            &mut candidates,
            &prepared.tables,
            &self.config,
            &deadline,
        );
        limited_by_timeout |=
            composite::analyze_composites(&mut candidates, &prepared.tables, &deadline);

        let outcome =
            arbitration::arbitrate(&mut candidates, &prepared.tables, &self.config, &deadline);
        limited_by_timeout |= outcome.timed_out;

        let bridges = bridge::derive_bridges(&candidates, &prepared.tables);

        let (relationships, limited_by_max_relationships) = assembler::assemble(
            &candidates,
            &outcome.accepted,
            &bridges,
            &prepared.tables,
            &self.config,
        );

        let total_columns = prepared.tables.iter().map(|t| t.columns.len()).sum();
        let summary = DiscoverySummary {
            total_tables: prepared.tables.len(),
            total_columns,
            total_relationships: relationships.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            limited_by_timeout,
            limited_by_max_relationships,
            limited_by_table_cap: prepared.table_capped,
            notes: if notes.is_empty() {
                None
            } else {
                Some(notes.join(" "))
            },
        };

        DiscoveryOutcome {
            relationships,
            tables: prepared.tables.into_iter().map(|t| t.def).collect(),
            summary,
        }
    }
}

/// Analyze pre-normalized tables with the given configuration.
pub fn discover_from_tables(
    tables: Vec<TableDef>,
    config: &DiscoveryConfig,
) -> Result<DiscoveryOutcome> {
    let engine = DiscoveryEngine::new(config.clone())?;
    Ok(engine.discover(tables))
}

/// Analyze loose table definitions.
///
/// Unlike [`discover_from_tables`], the `name` field of each definition may
/// be a qualified identifier (`workspace.schema.table`, quote-wrapped forms
/// included), and empty workspace/schema fields fall back to the configured
/// defaults.
pub fn discover_from_table_definitions(
    definitions: &[TableDef],
    config: &DiscoveryConfig,
) -> Result<DiscoveryOutcome> {
    let engine = DiscoveryEngine::new(config.clone())?;
    let mut notes = Vec::new();
    let normalized = prepare::normalize_definitions(definitions, config, &mut notes);
    Ok(engine.discover_with_notes(normalized, notes))
}
