use chrono::{DateTime, Utc};
use core_types::OrderType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A comprehensive, standardized report of trading performance.
///
/// This struct is the final output of the `MetricsEngine` and serves as the
/// data transfer object for performance results throughout the system (and
/// as the input to the insights engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub kpis: Kpis,
    /// One point per trade, in time order.
    pub equity_curve: Vec<EquityPoint>,
    /// One point per calendar day with activity, ascending by day.
    pub daily: Vec<DailyPoint>,
    /// Per-symbol aggregates, sorted by pnl descending.
    pub symbols: Vec<SymbolPerf>,
    pub fee_composition: FeeComposition,
    /// Running fee total, one point per active day, chronological.
    pub cumulative_fees_by_day: Vec<CumulativeFeePoint>,
    pub order_type_performance: Vec<OrderTypePerf>,
    /// Always exactly 24 buckets, indexed by local hour.
    pub time_of_day: Vec<HourBucket>,
    pub session_performance: SessionPerformance,
    pub direction_bias: DirectionBias,
    pub max_drawdown_pct: Decimal,
}

impl MetricsReport {
    /// Creates the zeroed-out report: what an empty batch produces, and the
    /// starting point before calculations.
    pub fn new() -> Self {
        Self {
            kpis: Kpis::new(),
            equity_curve: Vec::new(),
            daily: Vec::new(),
            symbols: Vec::new(),
            fee_composition: FeeComposition::default(),
            cumulative_fees_by_day: Vec::new(),
            order_type_performance: Vec::new(),
            time_of_day: HourBucket::empty_day(),
            session_performance: SessionPerformance::default(),
            direction_bias: DirectionBias::default(),
            max_drawdown_pct: Decimal::ZERO,
        }
    }
}

impl Default for MetricsReport {
    fn default() -> Self {
        Self::new()
    }
}

/// The scalar KPI block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub trade_count: usize,
    pub total_pnl: Decimal,
    pub total_fees: Decimal,
    pub win_rate_pct: Decimal,
    pub avg_win: Decimal,
    /// Mean losing trade, reported as a positive magnitude.
    pub avg_loss: Decimal,
    pub largest_gain: Decimal,
    /// Largest losing trade, reported as a positive magnitude.
    pub largest_loss: Decimal,
    /// Raw long/short trade-count ratio. `None` encodes the unbounded case:
    /// the batch has longs but no shorts.
    pub long_short_ratio: Option<Decimal>,
    /// Display-safe ratio: equals the raw ratio when it is defined and falls
    /// back to the long count when it is unbounded.
    pub long_short_ratio_display: Decimal,
    /// Notional-value approximation, not a true volume metric: price*size
    /// when both are known, bare size when only size is known.
    pub total_volume: Decimal,
    /// Mean holding time; unknown durations count as zero.
    pub avg_trade_duration_hours: Decimal,
    /// |avg_win / avg_loss|; zero when there are no losses.
    pub risk_reward: Decimal,
    /// Net pnl as a percentage of starting equity, clamped to +/-10000.
    pub pnl_percent: Decimal,
}

impl Kpis {
    pub fn new() -> Self {
        Self {
            trade_count: 0,
            total_pnl: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            win_rate_pct: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            largest_gain: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            // A batch with no trades has a measurable (zero) ratio; `None` is
            // reserved for the unbounded no-shorts case.
            long_short_ratio: Some(Decimal::ZERO),
            long_short_ratio_display: Decimal::ZERO,
            total_volume: Decimal::ZERO,
            avg_trade_duration_hours: Decimal::ZERO,
            risk_reward: Decimal::ZERO,
            pnl_percent: Decimal::ZERO,
        }
    }
}

impl Default for Kpis {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of the running equity series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub ts: DateTime<Utc>,
    pub cum_pnl: Decimal,
    pub equity: Decimal,
    /// Drawdown from the running peak at this point, in percent.
    pub drawdown_pct: Decimal,
    /// Running maximum drawdown up to and including this point.
    pub max_drawdown_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub pnl: Decimal,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerf {
    pub symbol: String,
    pub trades: usize,
    pub pnl: Decimal,
    pub win_rate_pct: Decimal,
    /// Same notional approximation as `Kpis::total_volume`.
    pub volume: Decimal,
}

/// Best-effort fee attribution. Sources without a breakdown land entirely in
/// `other`; partial breakdowns that exceed the recorded total floor `other`
/// at zero instead of going negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeComposition {
    pub maker: Decimal,
    pub taker: Decimal,
    pub funding: Decimal,
    pub other: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeFeePoint {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub cum_fees: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTypePerf {
    pub order_type: OrderType,
    pub trades: usize,
    pub pnl: Decimal,
    pub win_rate_pct: Decimal,
    pub avg_duration_hours: Decimal,
    pub avg_fees: Decimal,
}

/// One local-hour bucket of the 24-entry time-of-day breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub pnl: Decimal,
    pub trades: usize,
    pub win_rate_pct: Decimal,
}

impl HourBucket {
    fn empty(hour: u32) -> Self {
        Self {
            hour,
            pnl: Decimal::ZERO,
            trades: 0,
            win_rate_pct: Decimal::ZERO,
        }
    }

    /// The 24 zeroed buckets every report starts from.
    pub fn empty_day() -> Vec<Self> {
        (0..24).map(Self::empty).collect()
    }
}

/// The four fixed local-hour windows used for session grouping. Together
/// they partition all 24 hours with no overlap and no gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    /// Hours 0..=5.
    Overnight,
    /// Hours 6..=11.
    Morning,
    /// Hours 12..=17.
    Afternoon,
    /// Hours 18..=23.
    Night,
}

impl Session {
    /// Session owning the given local hour. Hours are taken modulo nothing:
    /// callers pass 0..=23 as produced by the calendar helpers.
    pub fn of_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Session::Overnight,
            6..=11 => Session::Morning,
            12..=17 => Session::Afternoon,
            _ => Session::Night,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub pnl: Decimal,
    pub trades: usize,
    pub win_rate_pct: Decimal,
    pub avg_duration_hours: Decimal,
    pub total_fees: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPerformance {
    pub overnight: SessionStats,
    pub morning: SessionStats,
    pub afternoon: SessionStats,
    pub night: SessionStats,
}

impl SessionPerformance {
    pub fn stats(&self, session: Session) -> &SessionStats {
        match session {
            Session::Overnight => &self.overnight,
            Session::Morning => &self.morning,
            Session::Afternoon => &self.afternoon,
            Session::Night => &self.night,
        }
    }

    pub(crate) fn stats_mut(&mut self, session: Session) -> &mut SessionStats {
        match session {
            Session::Overnight => &mut self.overnight,
            Session::Morning => &mut self.morning,
            Session::Afternoon => &mut self.afternoon,
            Session::Night => &mut self.night,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideBias {
    pub trades: usize,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionBias {
    pub long: SideBias,
    pub short: SideBias,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_report_has_24_zeroed_hour_buckets() {
        let report = MetricsReport::new();
        assert_eq!(report.time_of_day.len(), 24);
        for (hour, bucket) in report.time_of_day.iter().enumerate() {
            assert_eq!(bucket.hour, hour as u32);
            assert_eq!(bucket.trades, 0);
            assert_eq!(bucket.pnl, Decimal::ZERO);
        }
        assert_eq!(report.kpis.trade_count, 0);
        assert_eq!(report.kpis.long_short_ratio, Some(Decimal::ZERO));
    }

    #[test]
    fn sessions_partition_the_day() {
        // Every hour belongs to exactly one session, with the documented cuts.
        for hour in 0..24 {
            let session = Session::of_hour(hour);
            let expected = match hour {
                0..=5 => Session::Overnight,
                6..=11 => Session::Morning,
                12..=17 => Session::Afternoon,
                _ => Session::Night,
            };
            assert_eq!(session, expected, "hour {hour}");
        }
        assert_eq!(Session::of_hour(5), Session::Overnight);
        assert_eq!(Session::of_hour(6), Session::Morning);
        assert_eq!(Session::of_hour(11), Session::Morning);
        assert_eq!(Session::of_hour(12), Session::Afternoon);
        assert_eq!(Session::of_hour(17), Session::Afternoon);
        assert_eq!(Session::of_hour(18), Session::Night);
        assert_eq!(Session::of_hour(23), Session::Night);
    }
}
