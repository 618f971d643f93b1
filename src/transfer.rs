//! Transfer records and the raw page format they are extracted from

use crate::config::defaults::QUANT_DECIMALS;
use crate::error::{ApiError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// One normalized transfer, as written to the output file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferRecord {
    /// Transaction hash
    pub id: String,
    /// Address the transfer was collected for
    pub address: String,
    /// Block height
    pub block: u64,
    /// Block time, seconds since the epoch
    pub timestamp: u64,
    /// Sender
    pub from: String,
    /// Recipient
    pub to: String,
    /// Amount in whole tokens
    pub quant: Decimal,
}

impl TransferRecord {
    /// Normalize a raw entry collected for `address`
    ///
    /// Milliseconds are truncated to seconds and the integer amount is scaled
    /// down by 10^6. The result depends only on the inputs.
    pub fn from_raw(address: &str, raw: &RawTransfer) -> Result<Self> {
        let quant = i128::try_from(raw.quant)
            .ok()
            .and_then(|q| Decimal::try_from_i128_with_scale(q, QUANT_DECIMALS).ok())
            .ok_or_else(|| {
                ApiError::InvalidRecord(format!(
                    "{}: quant {} out of range",
                    raw.transaction_id, raw.quant
                ))
            })?;

        Ok(Self {
            id: raw.transaction_id.clone(),
            address: address.to_string(),
            block: raw.block,
            timestamp: raw.block_ts / 1000,
            from: raw.from_address.clone(),
            to: raw.to_address.clone(),
            quant: quant.normalize(),
        })
    }

    /// Cells in output column order
    pub fn to_row(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.address.clone(),
            self.block.to_string(),
            self.timestamp.to_string(),
            self.from.clone(),
            self.to.clone(),
            self.quant.to_string(),
        ]
    }
}

/// Typed view of one `token_transfers` entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransfer {
    pub transaction_id: String,
    #[serde(deserialize_with = "number_or_string")]
    pub block: u64,
    /// Milliseconds since the epoch
    #[serde(deserialize_with = "number_or_string")]
    pub block_ts: u64,
    pub from_address: String,
    pub to_address: String,
    /// Integer amount in 10^-6 units
    #[serde(deserialize_with = "number_or_string")]
    pub quant: u128,
    pub contract_address: String,
}

/// One page of search results
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Entries on this page, any token
    pub token_transfers: Vec<Value>,
    /// Rows matching the query server-side, across all pages
    pub total: u64,
}

impl PageResponse {
    /// Parse a response body
    ///
    /// A body without a `token_transfers` list is a schema error. A missing
    /// `total` counts as zero; a `null` one is rejected, and a float is
    /// truncated to a count.
    pub fn from_value(body: Value) -> Result<Self> {
        let total = match body.get("total") {
            None => 0,
            Some(v) => parse_total(v).ok_or_else(|| {
                ApiError::InvalidRecord(format!("total is not a count: {}", v))
            })?,
        };

        let token_transfers = match body {
            Value::Object(mut map) => match map.remove("token_transfers") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(missing_transfers(&Value::Object(map))),
            },
            other => return Err(missing_transfers(&other)),
        };

        Ok(Self {
            token_transfers,
            total,
        })
    }

    /// Records for entries of `contract`, in page order
    ///
    /// Entries of other tokens are skipped; a matching entry that cannot be
    /// parsed fails the whole page.
    pub fn matching_records(&self, contract: &str, address: &str) -> Result<Vec<TransferRecord>> {
        let mut records = Vec::new();

        for entry in &self.token_transfers {
            let entry_contract = entry
                .get("contract_address")
                .and_then(Value::as_str)
                .ok_or_else(|| ApiError::MissingField("contract_address".to_string()))?;

            if entry_contract != contract {
                continue;
            }

            let raw = RawTransfer::deserialize(entry)
                .map_err(|e| ApiError::InvalidRecord(e.to_string()))?;
            records.push(TransferRecord::from_raw(address, &raw)?);
        }

        Ok(records)
    }
}

fn missing_transfers(body: &Value) -> crate::error::Error {
    let mut shown = body.to_string();
    if shown.len() > 200 {
        let cut = (0..=200).rev().find(|&i| shown.is_char_boundary(i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push_str("...");
    }
    ApiError::MissingField(format!("token_transfers not found: {}", shown)).into()
}

fn parse_total(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number<T: FromStr>(value: &Value) -> Option<T> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts `123` as well as `"123"`; the explorer is not consistent
fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Value::deserialize(deserializer)?;
    parse_number(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", value)))
}
