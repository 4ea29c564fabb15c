//! Usage ledger
//!
//! Latest usage snapshot per session. The transport accumulates; each
//! usage event replaces the stored totals wholesale. Cost estimation is a
//! pure read over the latest totals and the price table.

use dashmap::DashMap;

use crate::pricing::{PriceTable, DEFAULT_PRICING_MODEL};
use crate::types::{SessionCost, UsageTotals};

/// Per-session usage snapshots
#[derive(Debug, Default)]
pub struct UsageLedger {
    totals: DashMap<String, UsageTotals>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored totals for a session
    pub fn set(&self, session_id: &str, totals: UsageTotals) {
        self.totals.insert(session_id.to_string(), totals);
    }

    /// Latest totals for a session, empty if none recorded yet
    pub fn totals(&self, session_id: &str) -> UsageTotals {
        self.totals
            .get(session_id)
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Forget a session's totals (used on session removal)
    pub fn remove(&self, session_id: &str) {
        self.totals.remove(session_id);
    }

    /// Check whether any totals were recorded for a session
    pub fn contains(&self, session_id: &str) -> bool {
        self.totals.contains_key(session_id)
    }

    /// Estimate the monetary cost of a session's usage so far
    ///
    /// Zero-cost before the first usage event. Repeated calls with
    /// unchanged totals return identical results.
    pub fn estimate_cost(
        &self,
        session_id: &str,
        model: Option<&str>,
        prices: &PriceTable,
    ) -> SessionCost {
        let totals = self.totals(session_id);
        let rates = prices.rates_for(model.unwrap_or(DEFAULT_PRICING_MODEL));

        SessionCost {
            session_id: session_id.to_string(),
            model: model.map(String::from),
            input_tokens: totals.input_tokens,
            output_tokens: totals.output_tokens,
            cache_creation_input_tokens: totals.cache_creation_input_tokens,
            cache_read_input_tokens: totals.cache_read_input_tokens,
            estimated_cost_usd: rates.estimate(&totals),
        }
    }
}
