//! Sampled-value profiles.
//!
//! A [`SampleProfile`] summarizes the sampled values of one column:
//! distinct counts, null counts and the distinct value set used for
//! containment checks. Samples are a scoring signal only, never ground
//! truth, so the profile keeps aggregate shape rather than row data.

use std::collections::HashSet;

/// Summary of a column's sampled values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleProfile {
    /// Sampled entries including NULLs.
    pub total: usize,
    /// Observed NULL entries.
    pub nulls: usize,
    /// Distinct non-null values.
    values: HashSet<String>,
}

impl SampleProfile {
    /// Build a profile from sampled values; `None` entries are NULLs.
    ///
    /// Returns `None` for an empty sample set: no samples and zero samples
    /// carry the same (absent) signal.
    pub fn from_samples(samples: &[Option<String>]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut values = HashSet::new();
        let mut nulls = 0;
        for sample in samples {
            match sample {
                Some(value) => {
                    values.insert(value.clone());
                }
                None => nulls += 1,
            }
        }
        Some(Self {
            total: samples.len(),
            nulls,
            values,
        })
    }

    /// Number of distinct non-null values.
    pub fn distinct(&self) -> usize {
        self.values.len()
    }

    /// Number of non-null entries.
    pub fn non_null(&self) -> usize {
        self.total - self.nulls
    }

    /// Ratio of distinct values to non-null entries (0.0 when no values).
    pub fn distinct_ratio(&self) -> f64 {
        if self.non_null() == 0 {
            return 0.0;
        }
        self.distinct() as f64 / self.non_null() as f64
    }

    /// Fraction of sampled entries that were NULL.
    pub fn null_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.nulls as f64 / self.total as f64
    }

    /// Whether every sampled entry is a unique non-null value.
    pub fn is_unique_non_null(&self) -> bool {
        self.nulls == 0 && self.distinct() == self.total && self.total > 0
    }

    /// Whether any NULL was observed.
    pub fn saw_null(&self) -> bool {
        self.nulls > 0
    }

    /// Whether a value occurs in this profile.
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Containment ratio: the fraction of this profile's distinct values
    /// that also occur in `other`.
    pub fn containment_in(&self, other: &SampleProfile) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let contained = self.values.iter().filter(|v| other.contains(v)).count();
        contained as f64 / self.values.len() as f64
    }
}
