//! Symbol and date-range predicates applied to a trade batch before it
//! reaches the metrics engine.
//!
//! The filter is total and allocation-shy: with no active fields it returns
//! the borrowed input unchanged rather than an equivalent copy.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use core_types::NormalizedTrade;
use std::borrow::Cow;
use tracing::debug;

/// The active filter set. `from`/`to` are calendar days interpreted in
/// `utc_offset`; `to` is inclusive through the end of its day so that
/// selecting "through Friday" keeps all of Friday's trades.
#[derive(Debug, Clone)]
pub struct TradeFilters {
    pub symbol: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub utc_offset: FixedOffset,
}

impl Default for TradeFilters {
    fn default() -> Self {
        Self {
            symbol: None,
            from: None,
            to: None,
            utc_offset: Utc.fix(),
        }
    }
}

impl TradeFilters {
    /// The symbol predicate, if one is set. An empty string counts as unset.
    pub fn active_symbol(&self) -> Option<&str> {
        self.symbol.as_deref().filter(|s| !s.is_empty())
    }

    fn is_empty(&self) -> bool {
        self.active_symbol().is_none() && self.from.is_none() && self.to.is_none()
    }

    /// First instant included, in UTC.
    fn start_bound(&self) -> Option<DateTime<Utc>> {
        self.from
            .map(|day| (day.and_time(NaiveTime::MIN) - self.utc_offset).and_utc())
    }

    /// First instant *excluded*, in UTC: the start of the day after `to`.
    /// A `to` at the calendar's end has no following day and simply leaves
    /// the range unbounded.
    fn end_bound(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|day| day.succ_opt())
            .map(|next| (next.and_time(NaiveTime::MIN) - self.utc_offset).and_utc())
    }
}

/// Returns the subset of `trades` matching the filters. No active filter
/// fields means the input is handed back as-is.
pub fn filter_trades<'a>(
    trades: &'a [NormalizedTrade],
    filters: &TradeFilters,
) -> Cow<'a, [NormalizedTrade]> {
    if filters.is_empty() {
        return Cow::Borrowed(trades);
    }

    let symbol = filters.active_symbol();
    let start = filters.start_bound();
    let end = filters.end_bound();

    let kept: Vec<NormalizedTrade> = trades
        .iter()
        .filter(|trade| {
            if let Some(symbol) = symbol {
                if trade.symbol != symbol {
                    return false;
                }
            }
            if let Some(start) = start {
                if trade.ts < start {
                    return false;
                }
            }
            if let Some(end) = end {
                if trade.ts >= end {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    debug!(total = trades.len(), kept = kept.len(), "trades filtered");
    Cow::Owned(kept)
}
