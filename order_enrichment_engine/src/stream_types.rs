//! The change-event model for the primary store's feed.
//!
//! The primary store notifies the pipeline of record-level mutations with [`ChangeEvent`]s. Events are delivered at
//! least once, so consumers must tolerate duplicates; ordering is only guaranteed per key. Field values travel as
//! typed attributes ([`AttrValue`]) so that decoding is explicit: a missing field or a wrongly-typed attribute is a
//! [`DecodeError`], never an untyped lookup failure, and numeric attributes carry their decimal numerals as text so
//! amounts reach [`Money`] without a binary floating point intermediate.
use std::{collections::HashMap, fmt::Display};

use oeg_common::{InvalidAmountError, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::Order;

//--------------------------------------    ChangeEventKind    -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeEventKind {
    Insert,
    Modify,
    Remove,
}

impl Display for ChangeEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeEventKind::Insert => write!(f, "INSERT"),
            ChangeEventKind::Modify => write!(f, "MODIFY"),
            ChangeEventKind::Remove => write!(f, "REMOVE"),
        }
    }
}

//--------------------------------------       AttrValue       -------------------------------------------------------
/// A typed attribute in a change-event snapshot. String fields and numeric fields are distinguished on the wire:
/// `{"S": "abc"}` vs `{"N": "100.00"}`. Numerics carry the decimal numeral as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    S(String),
    N(String),
}

impl AttrValue {
    fn type_tag(&self) -> &'static str {
        match self {
            AttrValue::S(_) => "string",
            AttrValue::N(_) => "numeric",
        }
    }
}

pub type AttributeMap = HashMap<String, AttrValue>;

//--------------------------------------      DecodeError      -------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("The change event has no `{0}` field in its new image")]
    MissingField(String),
    #[error("The `{0}` field is not a {1}-typed attribute")]
    WrongType(String, &'static str),
    #[error("The amount could not be parsed. {0}")]
    InvalidAmount(#[from] InvalidAmountError),
}

//--------------------------------------      ChangeEvent      -------------------------------------------------------
/// A single record-level mutation notification from the primary store.
///
/// Only `INSERT` events carry a snapshot of the new record; for the other kinds `new_image` is empty. The pipeline
/// acts on inserts exclusively, since orders are immutable by contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeEventKind,
    #[serde(default)]
    pub new_image: AttributeMap,
}

impl ChangeEvent {
    /// Builds the `INSERT` event for a freshly stored order, with a typed snapshot of all its fields.
    pub fn insert_snapshot(order: &Order) -> Self {
        let mut new_image = AttributeMap::new();
        new_image.insert("order_id".to_string(), AttrValue::S(order.order_id.as_str().to_string()));
        new_image.insert("customer".to_string(), AttrValue::S(order.customer_id.clone()));
        new_image.insert("amount".to_string(), AttrValue::N(order.amount.to_string()));
        new_image.insert("created_at".to_string(), AttrValue::N(order.created_at.timestamp().to_string()));
        Self { kind: ChangeEventKind::Insert, new_image }
    }

    /// Returns the string-typed attribute `field`, or a [`DecodeError`] if it is absent or not string-typed.
    pub fn as_string(&self, field: &str) -> Result<&str, DecodeError> {
        match self.new_image.get(field) {
            Some(AttrValue::S(s)) => Ok(s),
            Some(other) => Err(DecodeError::WrongType(field.to_string(), other.type_tag())),
            None => Err(DecodeError::MissingField(field.to_string())),
        }
    }

    /// Returns the numeric-typed attribute `field` parsed into an exact-decimal [`Money`].
    pub fn as_numeric(&self, field: &str) -> Result<Money, DecodeError> {
        match self.new_image.get(field) {
            Some(AttrValue::N(n)) => Ok(n.parse()?),
            Some(other) => Err(DecodeError::WrongType(field.to_string(), other.type_tag())),
            None => Err(DecodeError::MissingField(field.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::db_types::OrderId;

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_id: OrderId("ord-1".into()),
            customer_id: "alice".into(),
            amount: "100.00".parse().unwrap(),
            created_at: chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn insert_snapshot_carries_typed_fields() {
        let event = ChangeEvent::insert_snapshot(&sample_order());
        assert_eq!(event.kind, ChangeEventKind::Insert);
        assert_eq!(event.as_string("order_id").unwrap(), "ord-1");
        assert_eq!(event.as_string("customer").unwrap(), "alice");
        assert_eq!(event.as_numeric("amount").unwrap().to_string(), "100.00");
        assert_eq!(event.as_numeric("created_at").unwrap().to_string(), "1700000000");
    }

    #[test]
    fn wire_shape_is_externally_tagged() {
        let event = ChangeEvent {
            kind: ChangeEventKind::Insert,
            new_image: AttributeMap::from([
                ("order_id".to_string(), AttrValue::S("ord-1".into())),
                ("amount".to_string(), AttrValue::N("12.50".into())),
            ]),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "INSERT");
        assert_eq!(json["new_image"]["order_id"], serde_json::json!({"S": "ord-1"}));
        assert_eq!(json["new_image"]["amount"], serde_json::json!({"N": "12.50"}));
        let back: ChangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn accessors_report_typed_failures() {
        let event = ChangeEvent {
            kind: ChangeEventKind::Insert,
            new_image: AttributeMap::from([
                ("order_id".to_string(), AttrValue::S("ord-1".into())),
                ("amount".to_string(), AttrValue::S("100.00".into())),
            ]),
        };
        assert!(matches!(event.as_numeric("missing"), Err(DecodeError::MissingField(_))));
        assert!(matches!(event.as_numeric("amount"), Err(DecodeError::WrongType(_, "string"))));
        assert!(matches!(event.as_string("amount"), Ok("100.00")));
    }

    #[test]
    fn malformed_numerals_are_invalid_amounts() {
        let event = ChangeEvent {
            kind: ChangeEventKind::Insert,
            new_image: AttributeMap::from([("amount".to_string(), AttrValue::N("12,50".into()))]),
        };
        assert!(matches!(event.as_numeric("amount"), Err(DecodeError::InvalidAmount(_))));
    }

    #[test]
    fn non_insert_events_deserialize_without_image() {
        let event: ChangeEvent = serde_json::from_str(r#"{"kind": "REMOVE"}"#).unwrap();
        assert_eq!(event.kind, ChangeEventKind::Remove);
        assert!(event.new_image.is_empty());
    }
}
