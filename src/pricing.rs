//! Model-tier pricing for cost estimation
//!
//! Prices are USD per million tokens. The tier is picked by substring
//! match on the model id, with Sonnet rates as the fallback for unknown
//! models. The table is plain data so a hosting application can swap in
//! its own rates.

use serde::{Deserialize, Serialize};

use crate::types::UsageTotals;

/// Model used for pricing when a session never reported one
pub const DEFAULT_PRICING_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Per-million-token rates for one model tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRates {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
    pub cache_write_per_mtok: f64,
    pub cache_read_per_mtok: f64,
}

impl ModelRates {
    /// Estimate the cost of a usage snapshot under these rates
    ///
    /// Pure and side-effect-free: identical totals always produce an
    /// identical estimate.
    pub fn estimate(&self, totals: &UsageTotals) -> f64 {
        (totals.input_tokens as f64 * self.input_per_mtok
            + totals.output_tokens as f64 * self.output_per_mtok
            + totals.cache_creation_input_tokens as f64 * self.cache_write_per_mtok
            + totals.cache_read_input_tokens as f64 * self.cache_read_per_mtok)
            / 1_000_000.0
    }
}

/// Price table keyed by model tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub opus: ModelRates,
    pub sonnet: ModelRates,
    pub haiku: ModelRates,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            opus: ModelRates {
                input_per_mtok: 15.0,
                output_per_mtok: 75.0,
                cache_write_per_mtok: 18.75,
                cache_read_per_mtok: 1.5,
            },
            sonnet: ModelRates {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
                cache_write_per_mtok: 3.75,
                cache_read_per_mtok: 0.30,
            },
            haiku: ModelRates {
                input_per_mtok: 0.80,
                output_per_mtok: 4.0,
                cache_write_per_mtok: 1.0,
                cache_read_per_mtok: 0.08,
            },
        }
    }
}

impl PriceTable {
    /// Look up the rates for a model id, falling back to the Sonnet tier
    pub fn rates_for(&self, model: &str) -> ModelRates {
        if model.contains("opus") {
            self.opus
        } else if model.contains("haiku") {
            self.haiku
        } else {
            self.sonnet
        }
    }
}
