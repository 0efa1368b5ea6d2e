//! Per-seller feature aggregation over the four extracts.
//!
//! Six independent sub-computations feed one assembly step.
//! RULE: a seller reaches the fact table only if every sub-computation
//! produced a value for it. The inner joins are a survivorship filter,
//! not an error path.
//! RULE: monetary sums are accumulated in extract row order, so a
//! rebuild from the same inputs reproduces every float bit for bit.

use crate::config::EconomicsConfig;
use crate::dataset::Dataset;
use crate::records::OrderRecord;
use crate::types::SellerId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MONTH: f64 = 30.0 * SECONDS_PER_DAY;

/// One row of the per-seller fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub seller_id: SellerId,
    pub city: String,
    pub state: String,
    /// Mean days from shipping limit to carrier hand-over, clipped at zero.
    pub delay_to_carrier: f64,
    /// Mean days from purchase to customer delivery. May be negative on
    /// inconsistent source data.
    pub wait_time: f64,
    pub date_first_sale: NaiveDateTime,
    pub date_last_sale: NaiveDateTime,
    pub months_on_olist: f64,
    pub n_orders: u64,
    pub quantity: u64,
    pub quantity_per_order: f64,
    pub sales: f64,
    pub share_of_one_stars: f64,
    pub share_of_five_stars: f64,
    pub review_score: f64,
    pub cost_of_reviews: f64,
    pub revenues: f64,
    pub profits: f64,
}

impl SellerProfile {
    /// Seller profitability before the shared IT cost allocation.
    pub fn gross_profit(&self) -> f64 {
        self.revenues - self.cost_of_reviews
    }
}

/// Distinct seller with its declared location.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerIdentity {
    pub seller_id: SellerId,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayWait {
    pub delay_to_carrier: f64,
    pub wait_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDates {
    pub date_first_sale: NaiveDateTime,
    pub date_last_sale: NaiveDateTime,
    pub months_on_olist: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCounts {
    pub n_orders: u64,
    pub quantity: u64,
    pub quantity_per_order: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewStats {
    pub share_of_one_stars: f64,
    pub share_of_five_stars: f64,
    pub review_score: f64,
    pub cost_of_reviews: f64,
}

/// Joins the four extracts into [`SellerProfile`] rows. Borrows its
/// inputs and never mutates them.
pub struct FeatureAggregator<'a> {
    dataset: &'a Dataset,
    config: &'a EconomicsConfig,
}

impl<'a> FeatureAggregator<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a EconomicsConfig) -> Self {
        Self { dataset, config }
    }

    /// Distinct sellers in extract order. The first occurrence of a
    /// duplicated id wins.
    pub fn identity(&self) -> Vec<SellerIdentity> {
        let mut seen = HashSet::new();
        let mut identities = Vec::new();
        for seller in &self.dataset.sellers {
            if seen.insert(seller.seller_id.as_str()) {
                identities.push(SellerIdentity {
                    seller_id: seller.seller_id.clone(),
                    city: seller.city.clone(),
                    state: seller.state.clone(),
                });
            }
        }
        identities
    }

    /// Mean dispatch delay and customer wait per seller over delivered
    /// orders. A seller qualifies only when at least one joined row
    /// carries purchase, shipping-limit, carrier, and customer
    /// timestamps; each mean then uses every row where its own two
    /// operands are present.
    pub fn delay_wait(&self) -> HashMap<SellerId, DelayWait> {
        let delivered: HashMap<&str, &OrderRecord> = self
            .dataset
            .orders
            .iter()
            .filter(|order| order.is_delivered())
            .map(|order| (order.order_id.as_str(), order))
            .collect();

        #[derive(Default)]
        struct Acc {
            delay_sum:     f64,
            delay_rows:    u64,
            wait_sum:      f64,
            wait_rows:     u64,
            complete_rows: u64,
        }
        let mut accs: HashMap<SellerId, Acc> = HashMap::new();

        for item in &self.dataset.order_items {
            let Some(order) = delivered.get(item.order_id.as_str()) else {
                continue;
            };
            let acc = accs.entry(item.seller_id.clone()).or_default();
            if let (Some(limit), Some(carrier)) =
                (item.shipping_limit_date, order.delivered_carrier_date)
            {
                acc.delay_sum += days_between(limit, carrier).max(0.0);
                acc.delay_rows += 1;
            }
            if let (Some(purchase), Some(customer)) =
                (order.purchase_timestamp, order.delivered_customer_date)
            {
                acc.wait_sum += days_between(purchase, customer);
                acc.wait_rows += 1;
            }
            if item.shipping_limit_date.is_some()
                && order.purchase_timestamp.is_some()
                && order.delivered_carrier_date.is_some()
                && order.delivered_customer_date.is_some()
            {
                acc.complete_rows += 1;
            }
        }

        accs.into_iter()
            .filter(|(_, acc)| acc.complete_rows > 0)
            .map(|(seller_id, acc)| {
                let delay_wait = DelayWait {
                    delay_to_carrier: acc.delay_sum / acc.delay_rows as f64,
                    wait_time:        acc.wait_sum / acc.wait_rows as f64,
                };
                (seller_id, delay_wait)
            })
            .collect()
    }

    /// First and last approved sale per seller, and the number of 30-day
    /// months between them, rounded. One approved order means zero months.
    pub fn active_dates(&self) -> HashMap<SellerId, ActiveDates> {
        let approved: HashMap<&str, NaiveDateTime> = self
            .dataset
            .orders
            .iter()
            .filter_map(|order| order.approved_at.map(|ts| (order.order_id.as_str(), ts)))
            .collect();

        let mut ranges: HashMap<SellerId, (NaiveDateTime, NaiveDateTime)> = HashMap::new();
        for item in &self.dataset.order_items {
            let Some(&ts) = approved.get(item.order_id.as_str()) else {
                continue;
            };
            ranges
                .entry(item.seller_id.clone())
                .and_modify(|(first, last)| {
                    if ts < *first {
                        *first = ts;
                    }
                    if ts > *last {
                        *last = ts;
                    }
                })
                .or_insert((ts, ts));
        }

        ranges
            .into_iter()
            .map(|(seller_id, (first, last))| {
                let months = ((last - first).num_seconds() as f64 / SECONDS_PER_MONTH).round();
                let dates = ActiveDates {
                    date_first_sale: first,
                    date_last_sale:  last,
                    months_on_olist: months,
                };
                (seller_id, dates)
            })
            .collect()
    }

    /// Distinct order count versus total item row count per seller.
    pub fn order_counts(&self) -> HashMap<SellerId, OrderCounts> {
        let mut accs: HashMap<SellerId, (HashSet<&str>, u64)> = HashMap::new();
        for item in &self.dataset.order_items {
            let (orders, items) = accs.entry(item.seller_id.clone()).or_default();
            orders.insert(item.order_id.as_str());
            *items += 1;
        }

        accs.into_iter()
            .map(|(seller_id, (orders, quantity))| {
                let n_orders = orders.len() as u64;
                let counts = OrderCounts {
                    n_orders,
                    quantity,
                    quantity_per_order: quantity as f64 / n_orders as f64,
                };
                (seller_id, counts)
            })
            .collect()
    }

    /// Total item sales value per seller. Freight is excluded.
    pub fn sales(&self) -> HashMap<SellerId, f64> {
        let mut sales: HashMap<SellerId, f64> = HashMap::new();
        for item in &self.dataset.order_items {
            *sales.entry(item.seller_id.clone()).or_insert(0.0) += item.price;
        }
        sales
    }

    /// Review shares, mean score, and handling cost per seller. Every
    /// scored review of an order is charged to every seller on that
    /// order, once per distinct (order, seller) pair.
    pub fn reviews(&self) -> HashMap<SellerId, ReviewStats> {
        let mut scores_by_order: HashMap<&str, Vec<u8>> = HashMap::new();
        for review in &self.dataset.reviews {
            if let Some(score) = review.score {
                scores_by_order
                    .entry(review.order_id.as_str())
                    .or_default()
                    .push(score);
            }
        }

        #[derive(Default)]
        struct Acc {
            rows:       u64,
            one_stars:  u64,
            five_stars: u64,
            score_sum:  f64,
            cost:       f64,
        }
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut accs: HashMap<SellerId, Acc> = HashMap::new();

        for item in &self.dataset.order_items {
            if !seen.insert((item.order_id.as_str(), item.seller_id.as_str())) {
                continue;
            }
            let Some(scores) = scores_by_order.get(item.order_id.as_str()) else {
                continue;
            };
            let acc = accs.entry(item.seller_id.clone()).or_default();
            for &score in scores {
                acc.rows += 1;
                acc.one_stars += u64::from(score == 1);
                acc.five_stars += u64::from(score == 5);
                acc.score_sum += f64::from(score);
                acc.cost += self.config.review_cost(score);
            }
        }

        accs.into_iter()
            .map(|(seller_id, acc)| {
                let rows = acc.rows as f64;
                let stats = ReviewStats {
                    share_of_one_stars:  acc.one_stars as f64 / rows,
                    share_of_five_stars: acc.five_stars as f64 / rows,
                    review_score:        acc.score_sum / rows,
                    cost_of_reviews:     acc.cost,
                };
                (seller_id, stats)
            })
            .collect()
    }

    /// Assemble the fact table in sellers-extract order. Sellers missing
    /// from any sub-computation are dropped.
    pub fn build(&self) -> Vec<SellerProfile> {
        let delay_by_seller = self.delay_wait();
        let dates_by_seller = self.active_dates();
        let counts_by_seller = self.order_counts();
        let sales_by_seller = self.sales();
        let reviews_by_seller = self.reviews();

        let identities = self.identity();
        let distinct_sellers = identities.len();

        let mut profiles = Vec::new();
        for identity in identities {
            let Some(delay_wait) = delay_by_seller.get(&identity.seller_id) else {
                continue;
            };
            let Some(dates) = dates_by_seller.get(&identity.seller_id) else {
                continue;
            };
            let Some(counts) = counts_by_seller.get(&identity.seller_id) else {
                continue;
            };
            let Some(&sales) = sales_by_seller.get(&identity.seller_id) else {
                continue;
            };
            let Some(stats) = reviews_by_seller.get(&identity.seller_id) else {
                continue;
            };

            let revenues = self.config.commission_rate * sales
                + self.config.subscription_fee_per_month * dates.months_on_olist;
            let profits = revenues - stats.cost_of_reviews;

            profiles.push(SellerProfile {
                seller_id: identity.seller_id,
                city: identity.city,
                state: identity.state,
                delay_to_carrier: delay_wait.delay_to_carrier,
                wait_time: delay_wait.wait_time,
                date_first_sale: dates.date_first_sale,
                date_last_sale: dates.date_last_sale,
                months_on_olist: dates.months_on_olist,
                n_orders: counts.n_orders,
                quantity: counts.quantity,
                quantity_per_order: counts.quantity_per_order,
                sales,
                share_of_one_stars: stats.share_of_one_stars,
                share_of_five_stars: stats.share_of_five_stars,
                review_score: stats.review_score,
                cost_of_reviews: stats.cost_of_reviews,
                revenues,
                profits,
            });
        }

        if profiles.len() < distinct_sellers {
            log::warn!(
                "Survivorship filters dropped {} of {} sellers",
                distinct_sellers - profiles.len(),
                distinct_sellers
            );
        }
        log::info!(
            "Aggregated {} seller profiles from {} seller records",
            profiles.len(),
            self.dataset.sellers.len()
        );
        profiles
    }
}

fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}
