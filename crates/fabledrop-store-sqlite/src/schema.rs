//! SQL schema for the FableDrop SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One subscription per subscriber, keyed by email.
CREATE TABLE IF NOT EXISTS subscriptions (
    user_email       TEXT PRIMARY KEY,
    subscription_id  TEXT NOT NULL,
    status           TEXT NOT NULL,    -- 'active' | 'inactive' | 'cancelled'
    start_date       TEXT NOT NULL,    -- RFC 3339 UTC
    end_date         TEXT NOT NULL,    -- RFC 3339 UTC; informational
    months_remaining INTEGER NOT NULL,
    preferences      TEXT NOT NULL DEFAULT '{}',  -- JSON selection hints
    gift_message     TEXT
);

-- Orders are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
-- UNIQUE (subscription_id, month) is the write-time guarantee that at most
-- one order per billing cycle can ever land, whatever the callers read.
CREATE TABLE IF NOT EXISTS orders (
    order_id         TEXT PRIMARY KEY,
    user_email       TEXT NOT NULL,
    subscription_id  TEXT NOT NULL,
    month            INTEGER NOT NULL, -- billing-cycle index at placement
    order_date       TEXT NOT NULL,    -- RFC 3339 UTC
    status           TEXT NOT NULL,
    delivery_status  TEXT NOT NULL,
    book_json        TEXT NOT NULL,    -- JSON snapshot of the selected book
    shipping_json    TEXT NOT NULL,    -- JSON shipping address
    personal_message TEXT,
    UNIQUE (subscription_id, month)
);

CREATE INDEX IF NOT EXISTS orders_email_idx ON orders(user_email);

PRAGMA user_version = 1;
";
