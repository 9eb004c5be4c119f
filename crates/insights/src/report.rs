use analytics::HourBucket;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full behavioral report derived from a trade batch and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub streaks: Streaks,
    pub overtrading: Overtrading,
    pub fee_drag: FeeDrag,
    pub best_worst_hour: BestWorstHour,
}

/// Win/loss run lengths. `max_*` are all-time maxima over the batch;
/// `current_*` are the as-of-now trailing runs from the most recent trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub current_win: usize,
    pub current_loss: usize,
    pub max_win: usize,
    pub max_loss: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedDay {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub trades: usize,
}

/// Days whose trade count met the overtrading threshold, busiest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overtrading {
    pub flagged_days: Vec<FlaggedDay>,
    pub threshold: usize,
}

/// Share of gross winning profit consumed by fees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeDrag {
    /// Sum of strictly positive pnl only; the losing leg is excluded.
    pub gross_profit: Decimal,
    pub total_fees: Decimal,
    pub fee_to_gross_profit_pct: Decimal,
    pub warning: bool,
}

/// Extremes of the hour-of-day breakdown, restricted to hours with trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestWorstHour {
    pub best_hour: Option<HourBucket>,
    pub worst_hour: Option<HourBucket>,
}
