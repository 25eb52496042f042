//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (the book
//! snapshot, the shipping address, preferences) are stored as compact JSON.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use fabledrop_core::{
  order::{DeliveryStatus, Order, OrderStatus, ShippingAddress},
  subscription::{Preferences, Subscription, SubscriptionStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status enums ────────────────────────────────────────────────────────────

pub fn encode_subscription_status(s: SubscriptionStatus) -> &'static str {
  match s {
    SubscriptionStatus::Active => "active",
    SubscriptionStatus::Inactive => "inactive",
    SubscriptionStatus::Cancelled => "cancelled",
  }
}

pub fn decode_subscription_status(s: &str) -> Result<SubscriptionStatus> {
  match s {
    "active" => Ok(SubscriptionStatus::Active),
    "inactive" => Ok(SubscriptionStatus::Inactive),
    "cancelled" => Ok(SubscriptionStatus::Cancelled),
    other => Err(Error::Decode(format!("unknown subscription status: {other:?}"))),
  }
}

pub fn encode_order_status(s: OrderStatus) -> &'static str {
  match s {
    OrderStatus::Pending => "pending",
    OrderStatus::Processing => "processing",
    OrderStatus::Shipped => "shipped",
    OrderStatus::Delivered => "delivered",
  }
}

pub fn decode_order_status(s: &str) -> Result<OrderStatus> {
  match s {
    "pending" => Ok(OrderStatus::Pending),
    "processing" => Ok(OrderStatus::Processing),
    "shipped" => Ok(OrderStatus::Shipped),
    "delivered" => Ok(OrderStatus::Delivered),
    other => Err(Error::Decode(format!("unknown order status: {other:?}"))),
  }
}

pub fn encode_delivery_status(s: DeliveryStatus) -> &'static str {
  match s {
    DeliveryStatus::OrderPlaced => "order_placed",
    DeliveryStatus::Preparing => "preparing",
    DeliveryStatus::InTransit => "in_transit",
    DeliveryStatus::Delivered => "delivered",
    DeliveryStatus::Delayed => "delayed",
  }
}

pub fn decode_delivery_status(s: &str) -> Result<DeliveryStatus> {
  match s {
    "order_placed" => Ok(DeliveryStatus::OrderPlaced),
    "preparing" => Ok(DeliveryStatus::Preparing),
    "in_transit" => Ok(DeliveryStatus::InTransit),
    "delivered" => Ok(DeliveryStatus::Delivered),
    "delayed" => Ok(DeliveryStatus::Delayed),
    other => Err(Error::Decode(format!("unknown delivery status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub user_email:       String,
  pub subscription_id:  String,
  pub status:           String,
  pub start_date:       String,
  pub end_date:         String,
  pub months_remaining: i32,
  pub preferences:      String,
  pub gift_message:     Option<String>,
}

impl RawSubscription {
  pub fn into_subscription(self) -> Result<Subscription> {
    let preferences: Preferences = serde_json::from_str(&self.preferences)?;
    Ok(Subscription {
      id: decode_uuid(&self.subscription_id)?,
      user_id: self.user_email,
      status: decode_subscription_status(&self.status)?,
      start_date: decode_dt(&self.start_date)?,
      end_date: decode_dt(&self.end_date)?,
      months_remaining: self.months_remaining,
      preferences,
      gift_message: self.gift_message,
    })
  }
}

/// Raw strings read directly from an `orders` row.
pub struct RawOrder {
  pub order_id:         String,
  pub user_email:       String,
  pub subscription_id:  String,
  pub month:            i32,
  pub order_date:       String,
  pub status:           String,
  pub delivery_status:  String,
  pub book_json:        String,
  pub shipping_json:    String,
  pub personal_message: Option<String>,
}

impl RawOrder {
  pub fn into_order(self) -> Result<Order> {
    let book = serde_json::from_str(&self.book_json)?;
    let shipping_address: ShippingAddress =
      serde_json::from_str(&self.shipping_json)?;
    Ok(Order {
      id: decode_uuid(&self.order_id)?,
      user_id: self.user_email,
      subscription_id: decode_uuid(&self.subscription_id)?,
      book,
      order_date: decode_dt(&self.order_date)?,
      month: self.month,
      status: decode_order_status(&self.status)?,
      delivery_status: decode_delivery_status(&self.delivery_status)?,
      shipping_address,
      personal_message: self.personal_message,
    })
  }
}
