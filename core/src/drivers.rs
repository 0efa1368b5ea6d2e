//! Fitted satisfaction drivers from the review score models.
//!
//! Logit coefficients on standardized order features. A positive
//! one-star effect pushes an order toward a one-star review; a positive
//! five-star effect pushes it toward five stars.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SatisfactionDriver {
    pub feature: &'static str,
    pub one_star_effect: f64,
    pub five_star_effect: f64,
}

impl SatisfactionDriver {
    /// The larger of the two absolute effects, used for ranking.
    pub fn strength(&self) -> f64 {
        self.one_star_effect.abs().max(self.five_star_effect.abs())
    }
}

/// Coefficients of the fitted one-star and five-star review models.
pub const SATISFACTION_DRIVERS: [SatisfactionDriver; 6] = [
    SatisfactionDriver {
        feature: "wait_time",
        one_star_effect: 0.6907,
        five_star_effect: -0.5140,
    },
    SatisfactionDriver {
        feature: "delay_vs_expected",
        one_star_effect: 0.2626,
        five_star_effect: -0.4366,
    },
    SatisfactionDriver {
        feature: "number_of_sellers",
        one_star_effect: 0.2295,
        five_star_effect: -0.1716,
    },
    SatisfactionDriver {
        feature: "distance_seller_customer",
        one_star_effect: -0.2193,
        five_star_effect: 0.1075,
    },
    SatisfactionDriver {
        feature: "freight_value",
        one_star_effect: 0.1090,
        five_star_effect: -0.0624,
    },
    SatisfactionDriver {
        feature: "price",
        one_star_effect: 0.0407,
        five_star_effect: 0.0268,
    },
];

/// Drivers ordered strongest first.
pub fn drivers_by_strength() -> Vec<SatisfactionDriver> {
    let mut drivers = SATISFACTION_DRIVERS.to_vec();
    drivers.sort_by(|a, b| b.strength().total_cmp(&a.strength()));
    drivers
}
