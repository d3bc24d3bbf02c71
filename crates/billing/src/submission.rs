//! Bill submission: the request we send and the verdict on the reply.
//!
//! The server answers a commit with one JSON document. It either carries a
//! `bill_id` (accepted, possibly with a recomputed total) or an `errors` map
//! of products that ran out of stock. The validator turns that reply into a
//! [`ConfirmedBill`] or a [`SubmissionRejection`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use webpos_core::{OrderId, SubmissionId};

use crate::catalog::OrderLineItem;
use crate::config::BillingConfig;
use crate::money::{format_amount, parse_decimal};

/// Hint shown whenever the round trip itself went wrong.
pub const RETRY_HINT: &str = "Ritenta o chiama un tecnico";

/// Request body for a bill commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSubmission {
    pub submission_id: SubmissionId,
    pub order_id: OrderId,
    pub customer_name: String,
    pub items: Vec<OrderLineItem>,
    pub total: Decimal,
}

/// Server reply to a bill commit.
///
/// Parsed leniently: ids may arrive as strings or numbers, the total as a
/// string or a number, and anything unusable becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Absent, null, empty or zero means the bill was not stored.
    #[serde(default, deserialize_with = "present_bill_id")]
    pub bill_id: Option<String>,
    /// Product name -> quantity still in stock.
    #[serde(default, deserialize_with = "lenient_stock")]
    pub errors: BTreeMap<String, i64>,
    /// Server-computed total.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "opaque_string")]
    pub date: Option<String>,
}

impl SubmissionResponse {
    /// Parse a reply body; malformed JSON counts as no reply at all.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str(body) {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed submission response");
                None
            }
        }
    }
}

fn opaque_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn present_bill_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = opaque_string(deserializer)?;
    Ok(id.filter(|s| {
        let s = s.trim();
        !s.is_empty() && parse_decimal(s) != Some(Decimal::ZERO)
    }))
}

/// Stock counts may be numbers, floats or numeric strings; fractions are
/// truncated. A missing or non-object map is empty.
fn lenient_stock<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(product, remaining)| {
            let count = match &remaining {
                Value::Number(n) => parse_decimal(&n.to_string()),
                Value::String(s) => parse_decimal(s),
                _ => None,
            }
            .and_then(|d| d.trunc().to_i64());
            if count.is_none() {
                tracing::warn!(%product, %remaining, "ignoring unreadable stock count");
            }
            count.map(|count| (product, count))
        })
        .collect())
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_decimal(&s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

/// An accepted bill, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedBill {
    pub bill_id: String,
    pub customer_id: Option<String>,
    pub date: Option<String>,
    pub total: Decimal,
}

/// Product the server could not fully supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    pub product: String,
    pub remaining: i64,
}

/// Coarse classification of a rejected submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    CommunicationFailure,
    StockShortage,
    TotalMismatch,
}

/// Why a submission was not accepted.
///
/// Every variant is recoverable: the cashier acknowledges the alert and
/// submits again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionRejection {
    /// No reply, or a reply that could not be read.
    #[error("server did not answer correctly")]
    CommunicationFailure { detail: String },

    /// The server refused the bill because some products ran short.
    #[error("insufficient stock: {detail}")]
    StockShortage {
        shortages: Vec<Shortage>,
        detail: String,
    },

    /// The server stored a different total than the one on screen.
    #[error("total changed to {detail}")]
    TotalMismatch {
        server_total: Option<Decimal>,
        detail: String,
    },
}

impl SubmissionRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::CommunicationFailure { .. } => RejectionKind::CommunicationFailure,
            Self::StockShortage { .. } => RejectionKind::StockShortage,
            Self::TotalMismatch { .. } => RejectionKind::TotalMismatch,
        }
    }

    /// Human-readable detail, ready to drop into an alert.
    pub fn detail(&self) -> &str {
        match self {
            Self::CommunicationFailure { detail }
            | Self::StockShortage { detail, .. }
            | Self::TotalMismatch { detail, .. } => detail,
        }
    }
}

/// Decides whether a submission reply confirms the bill.
#[derive(Debug, Clone, Default)]
pub struct BillSubmissionValidator {
    config: BillingConfig,
}

impl BillSubmissionValidator {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// Check a reply against the total the cashier saw.
    ///
    /// First match wins:
    /// 1. no reply -> `CommunicationFailure`
    /// 2. no bill id -> `StockShortage`
    /// 3. totals differ numerically -> `TotalMismatch`
    /// 4. otherwise accepted
    pub fn validate(
        &self,
        response: Option<&SubmissionResponse>,
        expected_total: Decimal,
    ) -> Result<ConfirmedBill, SubmissionRejection> {
        let Some(response) = response else {
            return Err(SubmissionRejection::CommunicationFailure {
                detail: RETRY_HINT.to_string(),
            });
        };

        let Some(bill_id) = response.bill_id.as_ref() else {
            let shortages: Vec<Shortage> = response
                .errors
                .iter()
                .map(|(product, remaining)| Shortage {
                    product: product.clone(),
                    remaining: *remaining,
                })
                .collect();
            let detail = shortages
                .iter()
                .map(|s| format!("{} {}", s.remaining, s.product))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SubmissionRejection::StockShortage { shortages, detail });
        };

        match response.total {
            Some(total) if total == expected_total => Ok(ConfirmedBill {
                bill_id: bill_id.clone(),
                customer_id: response.customer_id.clone(),
                date: response.date.clone(),
                total,
            }),
            server_total => Err(SubmissionRejection::TotalMismatch {
                server_total,
                detail: format_amount(server_total, &self.config),
            }),
        }
    }
}
