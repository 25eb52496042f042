//! [`SqliteStore`] — the SQLite implementation of [`SubscriptionStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use fabledrop_core::{
  order::Order,
  store::{CommitError, SubscriptionStore},
  subscription::Subscription,
};

use crate::{
  Error, Result,
  encode::{
    RawOrder, RawSubscription, encode_delivery_status, encode_dt,
    encode_order_status, encode_subscription_status, encode_uuid,
  },
  schema::SCHEMA,
};

const INSERT_ORDER_SQL: &str = "INSERT INTO orders (
   order_id, user_email, subscription_id, month, order_date,
   status, delivery_status, book_json, shipping_json, personal_message
 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const UPSERT_SUBSCRIPTION_SQL: &str = "INSERT INTO subscriptions (
   user_email, subscription_id, status, start_date, end_date,
   months_remaining, preferences, gift_message
 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
 ON CONFLICT(user_email) DO UPDATE SET
   subscription_id  = excluded.subscription_id,
   status           = excluded.status,
   start_date       = excluded.start_date,
   end_date         = excluded.end_date,
   months_remaining = excluded.months_remaining,
   preferences      = excluded.preferences,
   gift_message     = excluded.gift_message";

// ─── Encoded rows ────────────────────────────────────────────────────────────

/// Column values for one `orders` row, ready to bind.
struct OrderRow {
  order_id:         String,
  user_email:       String,
  subscription_id:  String,
  month:            i32,
  order_date:       String,
  status:           String,
  delivery_status:  String,
  book_json:        String,
  shipping_json:    String,
  personal_message: Option<String>,
}

fn encode_order(user_email: &str, order: &Order) -> Result<OrderRow> {
  Ok(OrderRow {
    order_id:         encode_uuid(order.id),
    user_email:       user_email.to_owned(),
    subscription_id:  encode_uuid(order.subscription_id),
    month:            order.month,
    order_date:       encode_dt(order.order_date),
    status:           encode_order_status(order.status).to_owned(),
    delivery_status:  encode_delivery_status(order.delivery_status).to_owned(),
    book_json:        serde_json::to_string(&order.book)?,
    shipping_json:    serde_json::to_string(&order.shipping_address)?,
    personal_message: order.personal_message.clone(),
  })
}

/// Column values for one `subscriptions` row, ready to bind.
struct SubscriptionRow {
  user_email:       String,
  subscription_id:  String,
  status:           String,
  start_date:       String,
  end_date:         String,
  months_remaining: i32,
  preferences:      String,
  gift_message:     Option<String>,
}

fn encode_subscription(
  user_email: &str,
  sub: &Subscription,
) -> Result<SubscriptionRow> {
  Ok(SubscriptionRow {
    user_email:       user_email.to_owned(),
    subscription_id:  encode_uuid(sub.id),
    status:           encode_subscription_status(sub.status).to_owned(),
    start_date:       encode_dt(sub.start_date),
    end_date:         encode_dt(sub.end_date),
    months_remaining: sub.months_remaining,
    preferences:      serde_json::to_string(&sub.preferences)?,
    gift_message:     sub.gift_message.clone(),
  })
}

/// `true` if `err` is SQLite reporting a constraint violation — here that
/// can only be the `(subscription_id, month)` uniqueness rule or the
/// `user_email` primary key.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FableDrop subscription store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SubscriptionStore impl ──────────────────────────────────────────────────

impl SubscriptionStore for SqliteStore {
  type Error = Error;

  async fn get_subscription(
    &self,
    user_email: &str,
  ) -> Result<Option<Subscription>> {
    let email = user_email.to_owned();

    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_email, subscription_id, status, start_date, end_date,
                    months_remaining, preferences, gift_message
             FROM subscriptions WHERE user_email = ?1",
            rusqlite::params![email],
            |row| {
              Ok(RawSubscription {
                user_email:       row.get(0)?,
                subscription_id:  row.get(1)?,
                status:           row.get(2)?,
                start_date:       row.get(3)?,
                end_date:         row.get(4)?,
                months_remaining: row.get(5)?,
                preferences:      row.get(6)?,
                gift_message:     row.get(7)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn put_subscription(
    &self,
    user_email: &str,
    subscription: Subscription,
  ) -> Result<()> {
    let row = encode_subscription(user_email, &subscription)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          UPSERT_SUBSCRIPTION_SQL,
          rusqlite::params![
            row.user_email,
            row.subscription_id,
            row.status,
            row.start_date,
            row.end_date,
            row.months_remaining,
            row.preferences,
            row.gift_message,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_orders(&self, user_email: &str) -> Result<Vec<Order>> {
    let email = user_email.to_owned();

    let raws: Vec<RawOrder> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT order_id, user_email, subscription_id, month, order_date,
                  status, delivery_status, book_json, shipping_json,
                  personal_message
           FROM orders WHERE user_email = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![email], |row| {
            Ok(RawOrder {
              order_id:         row.get(0)?,
              user_email:       row.get(1)?,
              subscription_id:  row.get(2)?,
              month:            row.get(3)?,
              order_date:       row.get(4)?,
              status:           row.get(5)?,
              delivery_status:  row.get(6)?,
              book_json:        row.get(7)?,
              shipping_json:    row.get(8)?,
              personal_message: row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // A row that no longer decodes is dropped from the result so one corrupt
    // record cannot block eligibility over the rest.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| raw.into_order().ok())
        .collect(),
    )
  }

  async fn append_order(&self, user_email: &str, order: Order) -> Result<()> {
    let subscription_id = order.subscription_id;
    let month = order.month;
    let row = encode_order(user_email, &order)?;

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          INSERT_ORDER_SQL,
          rusqlite::params![
            row.order_id,
            row.user_email,
            row.subscription_id,
            row.month,
            row.order_date,
            row.status,
            row.delivery_status,
            row.book_json,
            row.shipping_json,
            row.personal_message,
          ],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(()),
      Err(e) if is_unique_violation(&e) => {
        Err(Error::DuplicateCycleOrder(subscription_id, month))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn commit_order(
    &self,
    user_email: &str,
    order: Order,
    subscription: Subscription,
  ) -> Result<(), CommitError<Error>> {
    let order_row = encode_order(user_email, &order).map_err(CommitError::Store)?;
    let sub_row =
      encode_subscription(user_email, &subscription).map_err(CommitError::Store)?;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          INSERT_ORDER_SQL,
          rusqlite::params![
            order_row.order_id,
            order_row.user_email,
            order_row.subscription_id,
            order_row.month,
            order_row.order_date,
            order_row.status,
            order_row.delivery_status,
            order_row.book_json,
            order_row.shipping_json,
            order_row.personal_message,
          ],
        )?;
        tx.execute(
          UPSERT_SUBSCRIPTION_SQL,
          rusqlite::params![
            sub_row.user_email,
            sub_row.subscription_id,
            sub_row.status,
            sub_row.start_date,
            sub_row.end_date,
            sub_row.months_remaining,
            sub_row.preferences,
            sub_row.gift_message,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(()),
      Err(e) if is_unique_violation(&e) => Err(CommitError::Rejected(
        fabledrop_core::Error::AlreadyOrderedThisCycle,
      )),
      Err(e) => Err(CommitError::Store(Error::Database(e))),
    }
  }
}
