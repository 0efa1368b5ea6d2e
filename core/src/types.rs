//! Shared primitive types used across the entire crate.

/// A stable marketplace seller identifier, as issued in the sellers extract.
pub type SellerId = String;

/// A marketplace order identifier.
pub type OrderId = String;
