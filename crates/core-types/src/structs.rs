use crate::enums::{OrderType, Side, TradeOutcome};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The canonical, source-independent trade record every adapter must produce.
///
/// `pnl_usd` and `fees_usd` are always present; everything else may be
/// unknown depending on the source. Unknown price/size propagates as
/// "excluded from notional calculations", never as zero. Once a batch is
/// handed to an engine it is treated as immutable: engines borrow trades and
/// return freshly allocated reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrade {
    /// Source-stable identifier, unique within a batch.
    pub id: String,
    /// Execution (fill) time. The engines use this as the sole ordering key;
    /// batches do not have to arrive sorted.
    pub ts: DateTime<Utc>,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub entry_price: Option<Decimal>,
    pub exit_price: Option<Decimal>,
    pub size: Option<Decimal>,
    /// Realized profit/loss in display currency.
    pub pnl_usd: Decimal,
    /// Total fee paid for the round trip.
    pub fees_usd: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_maker_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_taker_usd: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_funding_usd: Option<Decimal>,
    /// Holding time in seconds. Unknown durations count as zero in averages.
    pub duration_secs: Option<i64>,
    /// Free-text labels; order-irrelevant, deduplicated by the adapter.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl NormalizedTrade {
    /// Win/loss classification; an exactly-zero pnl is breakeven.
    pub fn outcome(&self) -> TradeOutcome {
        if self.pnl_usd > Decimal::ZERO {
            TradeOutcome::Win
        } else if self.pnl_usd < Decimal::ZERO {
            TradeOutcome::Loss
        } else {
            TradeOutcome::Breakeven
        }
    }

    /// Contribution to the volume aggregates: notional value when the source
    /// knows both price and size, the bare size when only size is known.
    /// Known approximation carried over from the original data policy: the
    /// fallback mixes currency units with base-asset counts.
    pub fn notional(&self) -> Option<Decimal> {
        match (self.entry_price, self.size) {
            (Some(price), Some(size)) => Some(price * size),
            (None, Some(size)) => Some(size),
            _ => None,
        }
    }
}

/// Rejects batches with duplicate trade ids. Adapters run this before a
/// batch is allowed to reach the filter or the engines.
pub fn validate_batch(trades: &[NormalizedTrade]) -> Result<(), CoreError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(trades.len());
    for trade in trades {
        if !seen.insert(trade.id.as_str()) {
            return Err(CoreError::DuplicateTradeId(trade.id.clone()));
        }
    }
    Ok(())
}
