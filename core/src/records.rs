//! Typed row formats for the four marketplace extracts.
//!
//! Timestamps arrive as local wall-clock strings; undelivered orders
//! leave their delivery columns empty. Parsing is lenient for
//! timestamps and review scores (absent or junk becomes `None`) and
//! strict for monetary columns.

use crate::types::{OrderId, SellerId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Wall-clock format used by every timestamp column in the extracts.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Terminal order status for a completed delivery.
pub const DELIVERED_STATUS: &str = "delivered";

/// One row of the sellers extract.
#[derive(Debug, Clone, Deserialize)]
pub struct SellerRecord {
    pub seller_id: SellerId,
    #[serde(rename = "seller_zip_code_prefix")]
    pub zip_code_prefix: String,
    #[serde(rename = "seller_city")]
    pub city: String,
    #[serde(rename = "seller_state")]
    pub state: String,
}

/// One row of the orders extract. Delivery timestamps are only present
/// once the order has reached the matching fulfilment stage.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub customer_id: String,
    #[serde(rename = "order_status")]
    pub status: String,
    #[serde(rename = "order_purchase_timestamp", deserialize_with = "de_opt_timestamp")]
    pub purchase_timestamp: Option<NaiveDateTime>,
    #[serde(rename = "order_approved_at", deserialize_with = "de_opt_timestamp")]
    pub approved_at: Option<NaiveDateTime>,
    #[serde(rename = "order_delivered_carrier_date", deserialize_with = "de_opt_timestamp")]
    pub delivered_carrier_date: Option<NaiveDateTime>,
    #[serde(rename = "order_delivered_customer_date", deserialize_with = "de_opt_timestamp")]
    pub delivered_customer_date: Option<NaiveDateTime>,
    #[serde(rename = "order_estimated_delivery_date", deserialize_with = "de_opt_timestamp")]
    pub estimated_delivery_date: Option<NaiveDateTime>,
}

impl OrderRecord {
    pub fn is_delivered(&self) -> bool {
        self.status == DELIVERED_STATUS
    }
}

/// One row of the order-items extract. One physical item per row.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRecord {
    pub order_id: OrderId,
    pub order_item_id: u32,
    pub product_id: String,
    pub seller_id: SellerId,
    #[serde(deserialize_with = "de_opt_timestamp")]
    pub shipping_limit_date: Option<NaiveDateTime>,
    pub price: f64,
    pub freight_value: f64,
}

/// One row of the reviews extract. Free-text columns are not ingested.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRecord {
    pub review_id: String,
    pub order_id: OrderId,
    #[serde(rename = "review_score", deserialize_with = "de_opt_score")]
    pub score: Option<u8>,
}

/// Parse one extract timestamp. Empty or malformed input yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn de_opt_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
