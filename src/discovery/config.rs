//! Engine configuration.

use crate::error::DiscoveryError;
use crate::naming::{BusinessPriors, EntityDictionary};

/// Default minimum confidence for accepted relationships.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
/// Default confidence window for tie-band acceptance.
pub const DEFAULT_TIE_BAND: f64 = 0.10;
/// Default run deadline in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 30.0;
/// Table cap applied by the schema entry point when the caller sets none.
pub const DEFAULT_SCHEMA_TABLE_CAP: usize = 60;
/// Default sample fetch size per column for the schema entry point.
pub const DEFAULT_SAMPLE_VALUES_PER_COLUMN: usize = 10;

/// Fixed weights for the evidence dimensions, summing to 1.0 by default.
///
/// The selection algorithm depends on the relative order (name similarity
/// and value containment dominate), not the exact values.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceWeights {
    pub name_similarity: f64,
    pub type_compatibility: f64,
    pub value_containment: f64,
    pub schema_pattern: f64,
    pub domain_prior: f64,
    pub statistical: f64,
    pub cardinality: f64,
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        Self {
            name_similarity: 0.25,
            type_compatibility: 0.15,
            value_containment: 0.20,
            schema_pattern: 0.15,
            domain_prior: 0.15,
            statistical: 0.05,
            cardinality: 0.05,
        }
    }
}

impl EvidenceWeights {
    fn sum(&self) -> f64 {
        self.name_similarity
            + self.type_compatibility
            + self.value_containment
            + self.schema_pattern
            + self.domain_prior
            + self.statistical
            + self.cardinality
    }

    fn any_negative(&self) -> bool {
        [
            self.name_similarity,
            self.type_compatibility,
            self.value_containment,
            self.schema_pattern,
            self.domain_prior,
            self.statistical,
            self.cardinality,
        ]
        .iter()
        .any(|w| *w < 0.0)
    }
}

/// Tuning knobs for a discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Workspace assumed for tables that do not specify one.
    pub default_workspace: String,
    /// Schema assumed for tables that do not specify one.
    pub default_schema: String,
    /// When set, candidates whose two-sided sample containment is poor are
    /// dropped even if other evidence carries them.
    pub strict_join_inference: bool,
    /// Minimum confidence for an accepted relationship.
    pub min_confidence: f64,
    /// Keep only the top-K relationships by confidence.
    pub max_relationships: Option<usize>,
    /// Run deadline; `None` disables the timeout.
    pub timeout_seconds: Option<f64>,
    /// Analyze at most this many tables, truncating the input.
    pub max_tables: Option<usize>,
    /// Confidence window within which a materially different alternative
    /// match is accepted alongside the per-column winner.
    pub tie_band: f64,
    /// Samples fetched per column by the schema entry point.
    pub sample_values_per_column: usize,
    /// Evidence weights.
    pub weights: EvidenceWeights,
    /// Entity dictionary, built-ins plus caller overlay.
    pub dictionary: EntityDictionary,
    /// Business-relationship priors, built-ins plus caller overlay.
    pub priors: BusinessPriors,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_workspace: "OFFLINE".to_string(),
            default_schema: "PUBLIC".to_string(),
            strict_join_inference: false,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_relationships: None,
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            max_tables: None,
            tie_band: DEFAULT_TIE_BAND,
            sample_values_per_column: DEFAULT_SAMPLE_VALUES_PER_COLUMN,
            weights: EvidenceWeights::default(),
            dictionary: EntityDictionary::builtin(),
            priors: BusinessPriors::builtin(),
        }
    }
}

impl DiscoveryConfig {
    /// Builder: set the minimum confidence threshold.
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = threshold;
        self
    }

    /// Builder: cap the number of emitted relationships.
    pub fn with_max_relationships(mut self, cap: usize) -> Self {
        self.max_relationships = Some(cap);
        self
    }

    /// Builder: set or disable the run deadline.
    pub fn with_timeout_seconds(mut self, seconds: Option<f64>) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Builder: cap the number of analyzed tables.
    pub fn with_max_tables(mut self, cap: usize) -> Self {
        self.max_tables = Some(cap);
        self
    }

    /// Builder: set the tie-band width.
    pub fn with_tie_band(mut self, band: f64) -> Self {
        self.tie_band = band;
        self
    }

    /// Builder: enable strict join inference.
    pub fn with_strict_join_inference(mut self, strict: bool) -> Self {
        self.strict_join_inference = strict;
        self
    }

    /// Builder: replace the evidence weights.
    pub fn with_weights(mut self, weights: EvidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Builder: overlay extra dictionary entries on the built-ins.
    pub fn with_dictionary_overlay(mut self, overlay: &EntityDictionary) -> Self {
        self.dictionary.extend_from(overlay);
        self
    }

    /// Builder: overlay extra priors on the built-ins.
    pub fn with_priors_overlay(mut self, overlay: &BusinessPriors) -> Self {
        self.priors.extend_from(overlay);
        self
    }

    /// Reject configurations the engine refuses to start with.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.weights.any_negative() {
            return Err(DiscoveryError::InvalidConfig(
                "evidence weights must be non-negative".to_string(),
            ));
        }
        if self.weights.sum() <= 0.0 {
            return Err(DiscoveryError::InvalidConfig(
                "evidence weights must sum to a positive value".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(DiscoveryError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.tie_band) {
            return Err(DiscoveryError::InvalidConfig(format!(
                "tie_band must be within [0, 1], got {}",
                self.tie_band
            )));
        }
        if let Some(seconds) = self.timeout_seconds {
            if seconds < 0.0 || !seconds.is_finite() {
                return Err(DiscoveryError::InvalidConfig(format!(
                    "timeout_seconds must be a non-negative number, got {seconds}"
                )));
            }
        }
        Ok(())
    }
}
