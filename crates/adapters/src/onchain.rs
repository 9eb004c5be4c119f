//! On-chain program-event decoding.
//!
//! Fetching logs from an RPC node (and everything wallet-related) happens
//! upstream; this adapter receives already-fetched event logs as JSON lines
//! and decodes them into normalized trades. Each log line is a tagged event
//! record; only `fill` events become trades, and unrecognized event kinds
//! are skipped rather than failing the batch, since program upgrades add
//! kinds faster than dashboards learn them.

use crate::error::AdapterError;
use chrono::TimeZone;
use chrono::Utc;
use core_types::{validate_batch, NormalizedTrade, OrderType, Side};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{info, warn};

/// Program environment for the on-chain source.
#[derive(Debug, Clone, Deserialize)]
pub struct OnChainEnv {
    pub rpc_url: String,
    pub program_id: String,
    pub version: u32,
}

/// The program layout this decoder understands.
pub const SUPPORTED_PROGRAM_VERSION: u32 = 6;

/// One decoded log message.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ProgramEvent {
    Fill(FillEvent),
    #[serde(other)]
    Unrecognized,
}

/// A position-closing fill. On-chain fills frequently lack price/size (the
/// program logs pnl and fees without ticker context), so those stay optional
/// and propagate as unknown.
#[derive(Debug, Deserialize)]
struct FillEvent {
    #[serde(default)]
    id: Option<String>,
    /// Unix seconds.
    ts: i64,
    market: String,
    side: String,
    #[serde(default)]
    order_type: Option<String>,
    #[serde(default)]
    entry_price: Option<Decimal>,
    #[serde(default)]
    exit_price: Option<Decimal>,
    #[serde(default)]
    size: Option<Decimal>,
    pnl_usd: Decimal,
    fees_usd: Decimal,
    #[serde(default)]
    fee_funding_usd: Option<Decimal>,
    #[serde(default)]
    duration_secs: Option<i64>,
}

/// Decodes a JSON-lines event log into a validated batch. Malformed lines
/// and out-of-range timestamps are structured errors; a version mismatch
/// rejects the whole log up front.
pub fn decode_onchain_trades(
    env: &OnChainEnv,
    raw_logs: &str,
) -> Result<Vec<NormalizedTrade>, AdapterError> {
    if env.version != SUPPORTED_PROGRAM_VERSION {
        return Err(AdapterError::UnsupportedVersion {
            found: env.version,
            supported: SUPPORTED_PROGRAM_VERSION,
        });
    }

    let mut trades = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in raw_logs.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: ProgramEvent =
            serde_json::from_str(line).map_err(|e| AdapterError::Decode {
                line: line_no,
                message: e.to_string(),
            })?;
        match event {
            ProgramEvent::Fill(fill) => {
                let index = trades.len();
                trades.push(fill_to_trade(fill, line_no, index)?);
            }
            ProgramEvent::Unrecognized => {
                skipped += 1;
                warn!(line = line_no, "skipping unrecognized program event");
            }
        }
    }

    validate_batch(&trades)?;
    info!(
        trades = trades.len(),
        skipped,
        program = %env.program_id,
        "on-chain decode complete"
    );
    Ok(trades)
}

fn fill_to_trade(
    fill: FillEvent,
    line: usize,
    index: usize,
) -> Result<NormalizedTrade, AdapterError> {
    let ts = Utc
        .timestamp_opt(fill.ts, 0)
        .single()
        .ok_or_else(|| AdapterError::Decode {
            line,
            message: format!("timestamp {} out of range", fill.ts),
        })?;
    let side = Side::from_str(&fill.side).map_err(|e| AdapterError::Decode {
        line,
        message: e.to_string(),
    })?;

    // Fills without an explicit id get a synthesized, batch-stable one.
    let id = fill
        .id
        .unwrap_or_else(|| format!("{}-{}-{}", fill.market, fill.ts, index));

    Ok(NormalizedTrade {
        id,
        ts,
        symbol: fill.market,
        side,
        order_type: fill
            .order_type
            .as_deref()
            .map(OrderType::from_source)
            .unwrap_or(OrderType::Unknown),
        entry_price: fill.entry_price,
        exit_price: fill.exit_price,
        size: fill.size,
        pnl_usd: fill.pnl_usd,
        fees_usd: fill.fees_usd,
        fee_maker_usd: None,
        fee_taker_usd: None,
        fee_funding_usd: fill.fee_funding_usd,
        duration_secs: fill.duration_secs,
        tags: Vec::new(),
        notes: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn env() -> OnChainEnv {
        OnChainEnv {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            program_id: "DrvsPrgrm1111111111111111111111111111111111".to_string(),
            version: SUPPORTED_PROGRAM_VERSION,
        }
    }

    #[test]
    fn decodes_fill_events() {
        let logs = concat!(
            r#"{"event":"fill","id":"f-1","ts":1767225600,"market":"SOL-PERP","side":"long","order_type":"limit","entry_price":"100","exit_price":"104","size":"2","pnl_usd":"8","fees_usd":"0.4"}"#,
            "\n",
            r#"{"event":"fill","ts":1767312000,"market":"ETH-PERP","side":"short","pnl_usd":"-3","fees_usd":"0.2","fee_funding_usd":"0.05"}"#,
            "\n",
        );
        let trades = decode_onchain_trades(&env(), logs).unwrap();
        assert_eq!(trades.len(), 2);

        assert_eq!(trades[0].id, "f-1");
        assert_eq!(trades[0].symbol, "SOL-PERP");
        assert_eq!(trades[0].side, Side::Long);
        assert_eq!(trades[0].order_type, OrderType::Limit);
        assert_eq!(trades[0].pnl_usd, dec!(8));

        // Sparse fill: synthesized id, unknown order type, no price/size.
        assert_eq!(trades[1].id, "ETH-PERP-1767312000-1");
        assert_eq!(trades[1].order_type, OrderType::Unknown);
        assert_eq!(trades[1].entry_price, None);
        assert_eq!(trades[1].size, None);
        assert_eq!(trades[1].fee_funding_usd, Some(dec!(0.05)));
    }

    #[test]
    fn unrecognized_events_are_skipped() {
        let logs = concat!(
            r#"{"event":"funding_settled","ts":1767225600,"market":"SOL-PERP","amount":"0.01"}"#,
            "\n",
            r#"{"event":"fill","id":"f-1","ts":1767225600,"market":"SOL-PERP","side":"long","pnl_usd":"1","fees_usd":"0.1"}"#,
            "\n",
        );
        let trades = decode_onchain_trades(&env(), logs).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, "f-1");
    }

    #[test]
    fn malformed_lines_fail_with_their_line_number() {
        let logs = concat!(
            r#"{"event":"fill","id":"f-1","ts":1767225600,"market":"SOL-PERP","side":"long","pnl_usd":"1","fees_usd":"0.1"}"#,
            "\n",
            "not-json\n",
        );
        match decode_onchain_trades(&env(), logs) {
            Err(AdapterError::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn version_mismatch_rejects_the_log() {
        let mut env = env();
        env.version = 5;
        assert!(matches!(
            decode_onchain_trades(&env, ""),
            Err(AdapterError::UnsupportedVersion { found: 5, .. })
        ));
    }

    #[test]
    fn bad_side_is_a_decode_error() {
        let logs = r#"{"event":"fill","id":"f-1","ts":1767225600,"market":"SOL-PERP","side":"up","pnl_usd":"1","fees_usd":"0.1"}"#;
        assert!(matches!(
            decode_onchain_trades(&env(), logs),
            Err(AdapterError::Decode { line: 1, .. })
        ));
    }

    #[test]
    fn empty_log_is_an_empty_batch() {
        assert!(decode_onchain_trades(&env(), "").unwrap().is_empty());
        assert!(decode_onchain_trades(&env(), "\n\n").unwrap().is_empty());
    }
}
