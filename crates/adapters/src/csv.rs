//! CSV trade import.
//!
//! The import template is one header row plus one row per trade:
//!
//! ```text
//! id,ts,symbol,side,order_type,entry_price,exit_price,size,pnl_usd,fees_usd,fee_maker_usd,fee_taker_usd,fee_funding_usd,duration_secs,tags,notes
//! ```
//!
//! `ts` is RFC 3339; optional columns may be left empty; `tags` is a
//! `|`-separated list. Import is all-or-nothing: one malformed row rejects
//! the whole batch with its line number, rather than silently dropping rows.

use crate::error::AdapterError;
use chrono::{DateTime, Utc};
use core_types::{validate_batch, NormalizedTrade, OrderType, Side};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;

/// One raw row of the import template. Enum-ish columns stay strings here so
/// conversion can report precise, line-numbered errors.
#[derive(Debug, Deserialize)]
struct CsvTradeRow {
    id: String,
    ts: DateTime<Utc>,
    symbol: String,
    side: String,
    order_type: String,
    entry_price: Option<Decimal>,
    exit_price: Option<Decimal>,
    size: Option<Decimal>,
    pnl_usd: Decimal,
    fees_usd: Decimal,
    #[serde(default)]
    fee_maker_usd: Option<Decimal>,
    #[serde(default)]
    fee_taker_usd: Option<Decimal>,
    #[serde(default)]
    fee_funding_usd: Option<Decimal>,
    #[serde(default)]
    duration_secs: Option<i64>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Parses a CSV export into a validated batch. Any malformed row, a missing
/// required column, or a duplicate id fails the entire import.
pub fn parse_trades_csv(text: &str) -> Result<Vec<NormalizedTrade>, AdapterError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut trades = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(trades.len() + 2);
        let row: CsvTradeRow = record.deserialize(Some(&headers)).map_err(|e| {
            AdapterError::CsvRow {
                line,
                message: e.to_string(),
            }
        })?;
        trades.push(row_to_trade(row, line)?);
    }

    validate_batch(&trades)?;
    info!(trades = trades.len(), "csv import accepted");
    Ok(trades)
}

fn row_to_trade(row: CsvTradeRow, line: usize) -> Result<NormalizedTrade, AdapterError> {
    let side = Side::from_str(&row.side).map_err(|e| AdapterError::CsvRow {
        line,
        message: e.to_string(),
    })?;

    Ok(NormalizedTrade {
        id: row.id,
        ts: row.ts,
        symbol: row.symbol,
        side,
        order_type: OrderType::from_source(&row.order_type),
        entry_price: row.entry_price,
        exit_price: row.exit_price,
        size: row.size,
        pnl_usd: row.pnl_usd,
        fees_usd: row.fees_usd,
        fee_maker_usd: row.fee_maker_usd,
        fee_taker_usd: row.fee_taker_usd,
        fee_funding_usd: row.fee_funding_usd,
        duration_secs: row.duration_secs,
        tags: split_tags(row.tags.as_deref().unwrap_or("")),
        notes: row.notes.unwrap_or_default(),
    })
}

/// Splits the `|`-separated tag column, trimming and deduplicating while
/// preserving first-seen order.
fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split('|').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
