//! Router-level tests over an in-memory store and stub collaborators.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use fabledrop_core::{
  book::Book,
  catalog::BookCatalog,
  identity::{IdentityProvider, UserProfile},
};
use fabledrop_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, api_router};

const TOKEN: &str = "test-token";
const EMAIL: &str = "alice@example.com";

// ─── Stub collaborators ──────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("stub failure")]
struct StubError;

#[derive(Clone)]
struct StubIdentity;

impl IdentityProvider for StubIdentity {
  type Error = StubError;

  async fn profile_for_token(&self, token: &str) -> Result<UserProfile, StubError> {
    if token == TOKEN {
      Ok(UserProfile {
        id:      "user-1".into(),
        email:   EMAIL.into(),
        name:    "Alice".into(),
        picture: None,
      })
    } else {
      Err(StubError)
    }
  }
}

fn stub_book(id: &str, title: &str) -> Book {
  Book {
    id:             id.into(),
    title:          title.into(),
    author:         "Ursula K. Le Guin".into(),
    description:    "A wizard comes of age.".into(),
    genre:          "fantasy".into(),
    isbn:           "978-0547773742".into(),
    cover_image:    "https://example.com/cover.jpg".into(),
    published_date: "1968-11-01".into(),
    page_count:     183,
    rating:         4.5,
  }
}

#[derive(Clone)]
struct StubCatalog;

impl BookCatalog for StubCatalog {
  type Error = StubError;

  async fn search(&self, _query: &str, _max: usize) -> Result<Vec<Book>, StubError> {
    Ok(vec![stub_book("vol_search", "A Wizard of Earthsea")])
  }

  async fn curated(&self) -> Result<Vec<Book>, StubError> {
    Ok(vec![
      stub_book("vol_a", "A Wizard of Earthsea"),
      stub_book("vol_b", "The Tombs of Atuan"),
    ])
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

type TestState = AppState<SqliteStore, StubCatalog, StubIdentity>;

async fn make_state() -> TestState {
  AppState {
    store:    Arc::new(SqliteStore::open_in_memory().await.unwrap()),
    catalog:  Arc::new(StubCatalog),
    identity: Arc::new(StubIdentity),
  }
}

async fn send(
  state: &TestState,
  method: &str,
  uri: &str,
  auth: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = auth {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  if body.is_some() {
    builder = builder.header(header::CONTENT_TYPE, "application/json");
  }
  let request = builder
    .body(match body {
      Some(v) => Body::from(v.to_string()),
      None => Body::empty(),
    })
    .unwrap();

  let response = api_router(state.clone()).oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn order_body() -> Value {
  json!({
    "book": stub_book("vol_a", "A Wizard of Earthsea"),
    "personal_message": "for you"
  })
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_token_returns_401() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/subscription", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_token_returns_401() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/orders", Some("wrong"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Subscription ────────────────────────────────────────────────────────────

#[tokio::test]
async fn subscription_404_then_create_then_conflict() {
  let state = make_state().await;

  let (status, _) = send(&state, "GET", "/subscription", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let body = json!({
    "preferences": { "genres": ["fantasy"] },
    "gift_message": "happy birthday"
  });
  let (status, created) =
    send(&state, "POST", "/subscription", Some(TOKEN), Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["status"], "active");
  assert_eq!(created["user_id"], EMAIL);
  assert_eq!(created["months_remaining"], 6);
  assert_eq!(created["gift_message"], "happy birthday");

  let (status, fetched) = send(&state, "GET", "/subscription", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["id"], created["id"]);

  let (status, conflict) =
    send(&state, "POST", "/subscription", Some(TOKEN), Some(json!({}))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(conflict["reason"], "subscription_exists");
}

// ─── Eligibility + order flow ────────────────────────────────────────────────

#[tokio::test]
async fn eligibility_without_subscription_names_the_reason() {
  let state = make_state().await;

  let (status, view) = send(&state, "GET", "/eligibility", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(view["can_order"], false);
  assert_eq!(view["reason"], "no_active_subscription");
  assert!(view.get("cycle").is_none());
}

#[tokio::test]
async fn order_without_subscription_returns_404() {
  let state = make_state().await;

  let (status, body) =
    send(&state, "POST", "/orders", Some(TOKEN), Some(order_body())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["reason"], "no_active_subscription");
}

#[tokio::test]
async fn full_order_flow_enforces_one_per_cycle() {
  let state = make_state().await;
  send(&state, "POST", "/subscription", Some(TOKEN), Some(json!({}))).await;

  // Fresh subscription: eligible in cycle 1.
  let (status, view) = send(&state, "GET", "/eligibility", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(view["can_order"], true);
  assert_eq!(view["cycle"], 1);
  assert_eq!(view["orders_this_cycle"], 0);
  assert_eq!(view["months_remaining"], 6);

  // Place the first order.
  let (status, placed) =
    send(&state, "POST", "/orders", Some(TOKEN), Some(order_body())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(placed["order"]["month"], 1);
  assert_eq!(placed["order"]["status"], "pending");
  assert_eq!(placed["order"]["delivery_status"], "order_placed");
  assert_eq!(placed["subscription"]["months_remaining"], 5);

  // The view flips, with a rollover date into next month.
  let (_, view) = send(&state, "GET", "/eligibility", Some(TOKEN), None).await;
  assert_eq!(view["can_order"], false);
  assert_eq!(view["reason"], "already_ordered_this_cycle");
  assert_eq!(view["orders_this_cycle"], 1);
  assert!(view.get("next_eligible_date").is_some());

  // A second order this cycle is a typed conflict.
  let (status, rejected) =
    send(&state, "POST", "/orders", Some(TOKEN), Some(order_body())).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(rejected["reason"], "already_ordered_this_cycle");

  // Exactly one order on record.
  let (status, orders) = send(&state, "GET", "/orders", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(orders.as_array().unwrap().len(), 1);
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_search_and_curated() {
  let state = make_state().await;

  let (status, books) = send(
    &state,
    "GET",
    "/catalog/search?q=earthsea&max=5",
    Some(TOKEN),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(books.as_array().unwrap().len(), 1);
  assert_eq!(books[0]["title"], "A Wizard of Earthsea");

  let (status, curated) =
    send(&state, "GET", "/catalog/curated", Some(TOKEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(curated.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn genre_list_is_public_and_complete() {
  let state = make_state().await;

  let (status, genres) = send(&state, "GET", "/catalog/genres", None, None).await;
  assert_eq!(status, StatusCode::OK);
  let genres = genres.as_array().unwrap().clone();
  assert_eq!(genres.len(), 8);
  assert!(genres.iter().any(|g| g["id"] == "mystery"));
}
