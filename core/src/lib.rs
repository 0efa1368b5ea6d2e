//! Profitability analytics over the Olist marketplace extracts.
//!
//! The crate joins four raw CSV extracts into a per-seller fact table
//! ([`features::SellerProfile`]) and answers what-if questions about
//! removing the least profitable sellers ([`scenario::ScenarioEngine`]).
//! Everything is recomputed from the extracts at process start; no
//! derived state is persisted.

pub mod config;
pub mod dataset;
pub mod drivers;
pub mod error;
pub mod features;
pub mod records;
pub mod scenario;
pub mod summary;
pub mod types;
