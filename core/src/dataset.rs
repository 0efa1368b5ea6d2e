//! Loading of the four marketplace extracts into typed in-memory tables.

use crate::error::{InsightError, InsightResult};
use crate::records::{OrderItemRecord, OrderRecord, ReviewRecord, SellerRecord};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const SELLERS_FILE: &str = "olist_sellers_dataset.csv";
pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";
pub const ORDER_ITEMS_FILE: &str = "olist_order_items_dataset.csv";
pub const REVIEWS_FILE: &str = "olist_order_reviews_dataset.csv";

/// Every extract the aggregation pipeline joins. Loading fails up front
/// if any of them is absent.
pub const REQUIRED_FILES: [&str; 4] =
    [SELLERS_FILE, ORDERS_FILE, ORDER_ITEMS_FILE, REVIEWS_FILE];

/// The four extracts of one dataset snapshot, row order preserved.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub sellers: Vec<SellerRecord>,
    pub orders: Vec<OrderRecord>,
    pub order_items: Vec<OrderItemRecord>,
    pub reviews: Vec<ReviewRecord>,
}

impl Dataset {
    /// Read all four extracts from `dir`. Absent files are reported in a
    /// single error before any row is parsed.
    pub fn load(dir: &Path) -> InsightResult<Self> {
        let missing: Vec<String> = REQUIRED_FILES
            .iter()
            .filter(|name| !dir.join(name).is_file())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(InsightError::MissingInputs {
                dir: dir.to_path_buf(),
                missing,
            });
        }

        let dataset = Self {
            sellers:     read_csv(&dir.join(SELLERS_FILE))?,
            orders:      read_csv(&dir.join(ORDERS_FILE))?,
            order_items: read_csv(&dir.join(ORDER_ITEMS_FILE))?,
            reviews:     read_csv(&dir.join(REVIEWS_FILE))?,
        };
        log::info!(
            "Loaded extracts from {}: {} sellers, {} orders, {} items, {} reviews",
            dir.display(),
            dataset.sellers.len(),
            dataset.orders.len(),
            dataset.order_items.len(),
            dataset.reviews.len()
        );
        Ok(dataset)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> InsightResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
