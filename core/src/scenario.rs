//! What-if scenarios over the seller fact table.
//!
//! Sellers are ranked once, worst gross profit first. A scenario drops
//! the first `removed_count` sellers of that ranking and totals the
//! rest; the cumulative curve walks the same ranking from the other
//! end, best first, recomputing the IT cost allocation at every
//! portfolio size.

use crate::config::EconomicsConfig;
use crate::error::{InsightError, InsightResult};
use crate::features::SellerProfile;
use serde::{Deserialize, Serialize};

/// Aggregate financials of a kept portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTotals {
    pub n_sellers:    usize,
    pub n_items:      u64,
    pub revenue:      f64,
    pub review_cost:  f64,
    pub gross_profit: f64,
    pub it_cost:      f64,
    pub net_profit:   f64,
}

/// Result of one "remove the N worst sellers" evaluation. Rebuilt from
/// scratch on every request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioState {
    pub removed_count: usize,
    /// Survivors, still ordered worst first.
    pub kept_sellers: Vec<SellerProfile>,
    pub totals: ScenarioTotals,
}

/// One point of the best-first cumulative profit curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub n_sellers:    usize,
    pub gross_profit: f64,
    pub it_cost:      f64,
    pub net_profit:   f64,
}

/// Argmax of one cumulative sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffPoint {
    /// Portfolio size at the maximum, counting kept sellers.
    pub n_sellers: usize,
    /// The equivalent slider position: sellers removed from the full
    /// portfolio to reach this point.
    pub removed_count: usize,
    /// The maximized cumulative value.
    pub value: f64,
}

/// The two recommended cutoffs, with and without the IT allocation.
/// `None` only for an empty portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalCutoffs {
    pub best_net:   Option<CutoffPoint>,
    pub best_gross: Option<CutoffPoint>,
}

/// Ranks a fact table once and answers removal scenarios against it.
/// Read-only after construction.
pub struct ScenarioEngine {
    ranked: Vec<SellerProfile>,
    config: EconomicsConfig,
}

impl ScenarioEngine {
    /// Rank the portfolio by ascending gross profit. Ties break on
    /// seller id so equal-profit sellers rank deterministically.
    pub fn new(profiles: &[SellerProfile], config: &EconomicsConfig) -> Self {
        let mut ranked = profiles.to_vec();
        ranked.sort_by(|a, b| {
            a.gross_profit()
                .total_cmp(&b.gross_profit())
                .then_with(|| a.seller_id.cmp(&b.seller_id))
        });
        Self {
            ranked,
            config: config.clone(),
        }
    }

    pub fn total_sellers(&self) -> usize {
        self.ranked.len()
    }

    /// The full worst-first ranking.
    pub fn ranked(&self) -> &[SellerProfile] {
        &self.ranked
    }

    /// Evaluate "remove the `removed_count` worst sellers, keep the rest".
    pub fn scenario(&self, removed_count: usize) -> InsightResult<ScenarioState> {
        let kept = self.kept(removed_count)?;
        Ok(ScenarioState {
            removed_count,
            totals: self.totals_over(kept),
            kept_sellers: kept.to_vec(),
        })
    }

    /// Scenario totals without materializing the kept set.
    pub fn totals(&self, removed_count: usize) -> InsightResult<ScenarioTotals> {
        Ok(self.totals_over(self.kept(removed_count)?))
    }

    /// Cumulative totals walking the ranking best first, one point per
    /// portfolio size in `1..=total`.
    pub fn curve(&self) -> Vec<CurvePoint> {
        let mut points = Vec::with_capacity(self.ranked.len());
        let mut gross_profit = 0.0;
        let mut n_items = 0u64;
        for (i, profile) in self.ranked.iter().rev().enumerate() {
            gross_profit += profile.gross_profit();
            n_items += profile.quantity;
            let n_sellers = i + 1;
            let it_cost = self.config.it_cost(n_sellers, n_items);
            points.push(CurvePoint {
                n_sellers,
                gross_profit,
                it_cost,
                net_profit: gross_profit - it_cost,
            });
        }
        points
    }

    /// Locate the curve points maximizing cumulative net and gross
    /// profit. On ties the first maximum wins, favouring the smaller
    /// portfolio.
    pub fn optimal_cutoffs(&self) -> OptimalCutoffs {
        let curve = self.curve();
        OptimalCutoffs {
            best_net: argmax(&curve, |p| p.net_profit)
                .map(|p| self.cutoff_at(p, p.net_profit)),
            best_gross: argmax(&curve, |p| p.gross_profit)
                .map(|p| self.cutoff_at(p, p.gross_profit)),
        }
    }

    fn cutoff_at(&self, point: &CurvePoint, value: f64) -> CutoffPoint {
        CutoffPoint {
            n_sellers: point.n_sellers,
            removed_count: self.ranked.len() - point.n_sellers,
            value,
        }
    }

    fn kept(&self, removed_count: usize) -> InsightResult<&[SellerProfile]> {
        if removed_count > self.ranked.len() {
            return Err(InsightError::RemovedCountOutOfBounds {
                removed_count,
                total: self.ranked.len(),
            });
        }
        Ok(&self.ranked[removed_count..])
    }

    fn totals_over(&self, kept: &[SellerProfile]) -> ScenarioTotals {
        let n_sellers = kept.len();
        let mut n_items = 0u64;
        let mut revenue = 0.0;
        let mut review_cost = 0.0;
        for profile in kept {
            n_items += profile.quantity;
            revenue += profile.revenues;
            review_cost += profile.cost_of_reviews;
        }
        let gross_profit = revenue - review_cost;
        let it_cost = self.config.it_cost(n_sellers, n_items);
        ScenarioTotals {
            n_sellers,
            n_items,
            revenue,
            review_cost,
            gross_profit,
            it_cost,
            net_profit: gross_profit - it_cost,
        }
    }
}

fn argmax<'c>(
    curve: &'c [CurvePoint],
    key: impl Fn(&CurvePoint) -> f64,
) -> Option<&'c CurvePoint> {
    let mut best: Option<&CurvePoint> = None;
    for point in curve {
        match best {
            None => best = Some(point),
            Some(current) if key(point) > key(current) => best = Some(point),
            _ => {}
        }
    }
    best
}
