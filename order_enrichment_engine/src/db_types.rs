use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use oeg_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        NewOrder       -------------------------------------------------------
/// An order as submitted through the ingestion endpoint, before the primary store has assigned it a row id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// The order_id assigned at creation. Primary key of the order store and the idempotency key downstream.
    pub order_id: OrderId,
    /// Free-text customer identifier. The ingestion endpoint substitutes "anonymous" when absent.
    pub customer_id: String,
    /// The order amount. Exact decimal, never binary floating point.
    pub amount: Money,
    /// The time the order was created. Persisted as whole seconds since the epoch.
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, customer_id: String, amount: Money) -> Self {
        Self { order_id, customer_id, amount, created_at: Utc::now() }
    }
}

impl Display for NewOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Order {} for customer [{}], amount {}", self.order_id, self.customer_id, self.amount)
    }
}

//--------------------------------------         Order         -------------------------------------------------------
/// An order as stored in the primary store. Orders are immutable once created and are never deleted by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub customer_id: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    EnrichmentStatus   -------------------------------------------------------
/// Terminal state marker on enriched records. There is exactly one state; the type exists so that the column is
/// decoded and encoded explicitly rather than being a stringly-typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentStatus {
    Enriched,
}

impl Display for EnrichmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStatus::Enriched => write!(f, "ENRICHED"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid enrichment status: {0}")]
pub struct InvalidStatusError(String);

impl FromStr for EnrichmentStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENRICHED" => Ok(Self::Enriched),
            s => Err(InvalidStatusError(s.to_string())),
        }
    }
}

//--------------------------------------     EnrichedOrder     -------------------------------------------------------
/// The record written to the secondary store. For a given `order_id` at most one of these logically exists; repeated
/// enrichment overwrites in place, which is safe because the computation is deterministic and side-effect free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order_id: OrderId,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub status: EnrichmentStatus,
}

impl Display for EnrichedOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Enriched order {}: subtotal {}, tax {}, total {} [{}]",
            self.order_id, self.subtotal, self.tax, self.total, self.status
        )
    }
}
