use oeg_common::Money;
use order_enrichment_engine::{db_types::OrderId, stream_types::ChangeEvent, BatchReport, EventOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServerError;

//----------------------------------------------  Ingestion  ----------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl NewOrderRequest {
    /// The amount may arrive as a JSON string or a JSON number. Numbers are read back from their exact literal (the
    /// arbitrary-precision parser keeps it), so neither path goes through binary floating point. A missing amount
    /// is treated as zero.
    pub fn amount(&self) -> Result<Money, ServerError> {
        match &self.amount {
            None => Ok(Money::ZERO),
            Some(Value::String(s)) => s.parse().map_err(|e| ServerError::InvalidAmount(format!("{e}"))),
            Some(Value::Number(n)) => n.to_string().parse().map_err(|e| ServerError::InvalidAmount(format!("{e}"))),
            Some(other) => Err(ServerError::InvalidAmount(format!("amount must be a string or a number, not {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub ok: bool,
    pub order_id: OrderId,
}

impl OrderCreatedResponse {
    pub fn new(order_id: OrderId) -> Self {
        Self { ok: true, order_id }
    }
}

//----------------------------------------------   Stream   ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEventBatch {
    #[serde(default)]
    pub records: Vec<ChangeEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedEvent {
    /// Position of the failed event in the submitted batch.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub error: String,
}

/// The outcome of a stream trigger invocation. `ok` is true iff the failure list is empty; the batch is always
/// processed to completion regardless, so a redelivering caller should replay only the listed events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamBatchResult {
    pub ok: bool,
    pub received: usize,
    pub written: usize,
    pub skipped: usize,
    pub failures: Vec<FailedEvent>,
}

impl From<&BatchReport> for StreamBatchResult {
    fn from(report: &BatchReport) -> Self {
        let failures = report
            .failures()
            .into_iter()
            .filter_map(|(index, outcome)| match outcome {
                EventOutcome::Failed { order_id, error } => {
                    Some(FailedEvent { index, order_id: order_id.clone(), error: error.to_string() })
                },
                _ => None,
            })
            .collect();
        Self {
            ok: report.ok(),
            received: report.len(),
            written: report.written_count(),
            skipped: report.skipped_count(),
            failures,
        }
    }
}
