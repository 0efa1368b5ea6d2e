//! Economic model parameters: commission, subscription, review handling
//! costs, and the IT cost scaling law.
//!
//! RULE: every monetary constant lives here. Aggregation and scenario
//! code read rates from the config and never hardcode them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Share of item sales kept as commission revenue.
    pub commission_rate: f64,
    /// Monthly fee charged per seller for each month on the platform, in BRL.
    pub subscription_fee_per_month: f64,
    /// Handling cost per review row, keyed by star score.
    pub review_costs: HashMap<u8, f64>,
    /// IT cost per sqrt(seller count), in BRL.
    pub it_cost_per_sqrt_seller: f64,
    /// IT cost per sqrt(item count), in BRL.
    pub it_cost_per_sqrt_item: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            commission_rate:            0.1,
            subscription_fee_per_month: 80.0,
            review_costs: HashMap::from([
                (1, 100.0),
                (2, 50.0),
                (3, 40.0),
                (4, 0.0),
                (5, 0.0),
            ]),
            it_cost_per_sqrt_seller: 3157.27,
            it_cost_per_sqrt_item:   978.23,
        }
    }
}

impl EconomicsConfig {
    /// Load overrides from a JSON file. Fields absent from the file keep
    /// their default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Handling cost for a single review row. Scores outside the table
    /// cost nothing.
    pub fn review_cost(&self, score: u8) -> f64 {
        self.review_costs.get(&score).copied().unwrap_or(0.0)
    }

    /// Shared-infrastructure cost allocated to a portfolio of the given
    /// size: alpha * sqrt(sellers) + beta * sqrt(items).
    pub fn it_cost(&self, n_sellers: usize, n_items: u64) -> f64 {
        self.it_cost_per_sqrt_seller * (n_sellers as f64).sqrt()
            + self.it_cost_per_sqrt_item * (n_items as f64).sqrt()
    }
}
