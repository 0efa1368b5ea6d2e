//! Full-portfolio financial summary with the revenue split by source.

use crate::config::EconomicsConfig;
use crate::features::SellerProfile;
use serde::{Deserialize, Serialize};

/// Waterfall view of the whole portfolio before any removal scenario:
/// where revenue comes from and what the costs take back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub n_sellers:            usize,
    pub n_items:              u64,
    pub commission_revenue:   f64,
    pub subscription_revenue: f64,
    pub total_revenue:        f64,
    pub review_cost:          f64,
    pub gross_profit:         f64,
    pub it_cost:              f64,
    pub net_profit:           f64,
}

impl PortfolioSummary {
    /// Totals over every profile, attributing revenue to sales
    /// commission and monthly subscriptions separately.
    pub fn compute(profiles: &[SellerProfile], config: &EconomicsConfig) -> Self {
        let mut sales = 0.0;
        let mut months = 0.0;
        let mut total_revenue = 0.0;
        let mut review_cost = 0.0;
        let mut n_items = 0u64;
        for profile in profiles {
            sales += profile.sales;
            months += profile.months_on_olist;
            total_revenue += profile.revenues;
            review_cost += profile.cost_of_reviews;
            n_items += profile.quantity;
        }
        let gross_profit = total_revenue - review_cost;
        let it_cost = config.it_cost(profiles.len(), n_items);
        Self {
            n_sellers: profiles.len(),
            n_items,
            commission_revenue: config.commission_rate * sales,
            subscription_revenue: config.subscription_fee_per_month * months,
            total_revenue,
            review_cost,
            gross_profit,
            it_cost,
            net_profit: gross_profit - it_cost,
        }
    }
}
