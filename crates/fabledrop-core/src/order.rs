//! Order — an immutable record of one monthly book selection.
//!
//! Orders are append-only from the engine's perspective: once accepted they
//! are never updated or deleted. Fulfilment systems own the two status
//! fields; the engine only ever writes their initial values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::book::Book;

/// Coarse fulfilment state, set by external systems after placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
}

/// Finer-grained fulfilment state, also externally owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
  OrderPlaced,
  Preparing,
  InTransit,
  Delivered,
  Delayed,
}

/// Static delivery destination, captured at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub name:     String,
  pub street:   String,
  pub city:     String,
  pub state:    String,
  pub zip_code: String,
  pub country:  String,
}

impl Default for ShippingAddress {
  /// The fixed gift-recipient destination used when the caller supplies none.
  fn default() -> Self {
    Self {
      name:     "Gift Recipient".to_owned(),
      street:   "123 Main St".to_owned(),
      city:     "City".to_owned(),
      state:    "State".to_owned(),
      zip_code: "12345".to_owned(),
      country:  "USA".to_owned(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id:               Uuid,
  /// Owner key — the subscriber's email address.
  pub user_id:          String,
  pub subscription_id:  Uuid,
  /// Snapshot of the selected catalog item, copied at order time.
  pub book:             Book,
  pub order_date:       DateTime<Utc>,
  /// Billing-cycle index at placement; assigned once, never changed.
  pub month:            i32,
  pub status:           OrderStatus,
  pub delivery_status:  DeliveryStatus,
  pub shipping_address: ShippingAddress,
  pub personal_message: Option<String>,
}
