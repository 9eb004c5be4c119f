use crate::report::{
    CumulativeFeePoint, DailyPoint, EquityPoint, MetricsReport, OrderTypePerf, Session, SymbolPerf,
};
use crate::time::{day_key, local_hour};
use chrono::{FixedOffset, Offset, Utc};
use core_types::{NormalizedTrade, OrderType, Side};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

const SECS_PER_HOUR: i64 = 3600;
const PNL_PERCENT_CLAMP: i64 = 10_000;

/// Options for one metrics computation.
#[derive(Debug, Clone)]
pub struct MetricsOptions {
    /// Baseline used to express pnl as a percentage and to anchor the equity
    /// curve in absolute terms. Callers needing true account equity must
    /// supply their own; the default is an arbitrary 10,000.
    pub starting_equity: Decimal,
    /// Offset applied before any calendar bucketing (day keys, hours,
    /// sessions). UTC unless the caller wants venue-local sessions.
    pub utc_offset: FixedOffset,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            starting_equity: Decimal::from(10_000),
            utc_offset: Utc.fix(),
        }
    }
}

/// A stateless calculator for deriving performance metrics from a batch of
/// normalized trades.
///
/// The engine is total: any well-typed batch, including the empty one,
/// produces a report, and no input is ever mutated. Batches do not have to
/// arrive sorted; the engine sorts by `ts` once and every aggregate reuses
/// that shared ordering. All keyed accumulation goes through `BTreeMap`, so
/// repeated invocations on identical input yield identical reports.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    pub fn compute(&self, trades: &[NormalizedTrade], options: &MetricsOptions) -> MetricsReport {
        let mut report = MetricsReport::new();

        if trades.is_empty() {
            // With no trades every metric is zero; the fresh report already
            // is exactly that.
            return report;
        }

        let mut sorted: Vec<&NormalizedTrade> = trades.iter().collect();
        sorted.sort_by_key(|t| t.ts);

        self.compute_kpis(&sorted, options, &mut report);
        self.build_equity_curve(&sorted, options, &mut report);
        let fees_by_day = self.aggregate_daily(&sorted, options, &mut report);
        self.aggregate_symbols(&sorted, &mut report);
        self.compose_fees(&sorted, &mut report);
        self.accumulate_daily_fees(&fees_by_day, &mut report);
        self.aggregate_order_types(&sorted, &mut report);
        self.bucket_hours_and_sessions(&sorted, options, &mut report);
        self.measure_direction_bias(&sorted, &mut report);

        debug!(
            trades = report.kpis.trade_count,
            total_pnl = %report.kpis.total_pnl,
            max_drawdown_pct = %report.max_drawdown_pct,
            "metrics report computed"
        );

        report
    }

    /// Scalar KPIs: totals, win/loss partition statistics, ratio policies.
    fn compute_kpis(
        &self,
        sorted: &[&NormalizedTrade],
        options: &MetricsOptions,
        report: &mut MetricsReport,
    ) {
        let kpis = &mut report.kpis;
        kpis.trade_count = sorted.len();

        let mut win_sum = Decimal::ZERO;
        let mut loss_sum = Decimal::ZERO;
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut long_count = 0usize;
        let mut short_count = 0usize;
        let mut duration_secs = 0i64;

        for trade in sorted {
            kpis.total_pnl += trade.pnl_usd;
            kpis.total_fees += trade.fees_usd;

            if trade.pnl_usd > Decimal::ZERO {
                wins += 1;
                win_sum += trade.pnl_usd;
                kpis.largest_gain = kpis.largest_gain.max(trade.pnl_usd);
            } else if trade.pnl_usd < Decimal::ZERO {
                losses += 1;
                loss_sum += trade.pnl_usd;
                kpis.largest_loss = kpis.largest_loss.max(trade.pnl_usd.abs());
            }
            // An exactly-zero pnl is breakeven: neither a win nor a loss.

            match trade.side {
                Side::Long => long_count += 1,
                Side::Short => short_count += 1,
            }

            if let Some(notional) = trade.notional() {
                kpis.total_volume += notional;
            }
            duration_secs += trade.duration_secs.unwrap_or(0);
        }

        if kpis.trade_count > 0 {
            let count = Decimal::from(kpis.trade_count);
            kpis.win_rate_pct = Decimal::from(wins) / count * Decimal::from(100);
            kpis.avg_trade_duration_hours =
                Decimal::from(duration_secs) / Decimal::from(SECS_PER_HOUR) / count;
        }
        if wins > 0 {
            kpis.avg_win = win_sum / Decimal::from(wins);
        }
        if losses > 0 {
            kpis.avg_loss = (loss_sum / Decimal::from(losses)).abs();
        }
        if kpis.avg_loss > Decimal::ZERO {
            kpis.risk_reward = (kpis.avg_win / kpis.avg_loss).abs();
        }

        // Long/short ratio carries a double policy: the raw ratio is
        // unbounded when there are longs but no shorts (`None`), while the
        // display value falls back to the long count in that case.
        let (raw, display) = if short_count > 0 {
            let ratio = Decimal::from(long_count) / Decimal::from(short_count);
            (Some(ratio), ratio)
        } else if long_count > 0 {
            (None, Decimal::from(long_count))
        } else {
            (Some(Decimal::ZERO), Decimal::ZERO)
        };
        kpis.long_short_ratio = raw;
        kpis.long_short_ratio_display = display;

        if options.starting_equity > Decimal::ZERO {
            let pct = kpis.total_pnl / options.starting_equity * Decimal::from(100);
            kpis.pnl_percent = pct.clamp(
                Decimal::from(-PNL_PERCENT_CLAMP),
                Decimal::from(PNL_PERCENT_CLAMP),
            );
        }
    }

    /// Running equity, peak and drawdown per trade in time order. Each point
    /// is a snapshot of the running series, not a final total broadcast
    /// backward.
    fn build_equity_curve(
        &self,
        sorted: &[&NormalizedTrade],
        options: &MetricsOptions,
        report: &mut MetricsReport,
    ) {
        let mut cum_pnl = Decimal::ZERO;
        let mut peak_equity = options.starting_equity;
        let mut max_drawdown_pct = Decimal::ZERO;

        report.equity_curve = sorted
            .iter()
            .map(|trade| {
                cum_pnl += trade.pnl_usd;
                let equity = options.starting_equity + cum_pnl;
                peak_equity = peak_equity.max(equity);

                let drawdown_pct = if peak_equity > Decimal::ZERO {
                    (peak_equity - equity) / peak_equity * Decimal::from(100)
                } else {
                    Decimal::ZERO
                };
                max_drawdown_pct = max_drawdown_pct.max(drawdown_pct);

                EquityPoint {
                    ts: trade.ts,
                    cum_pnl,
                    equity,
                    drawdown_pct,
                    max_drawdown_pct,
                }
            })
            .collect();

        report.max_drawdown_pct = max_drawdown_pct;
    }

    /// Calendar-day aggregation. Returns the per-day fee sums so the
    /// cumulative fee series can reuse this pass.
    fn aggregate_daily(
        &self,
        sorted: &[&NormalizedTrade],
        options: &MetricsOptions,
        report: &mut MetricsReport,
    ) -> BTreeMap<String, Decimal> {
        #[derive(Default)]
        struct DayAcc {
            pnl: Decimal,
            trades: usize,
            fees: Decimal,
        }

        let mut days: BTreeMap<String, DayAcc> = BTreeMap::new();
        for trade in sorted {
            let acc = days.entry(day_key(trade.ts, options.utc_offset)).or_default();
            acc.pnl += trade.pnl_usd;
            acc.trades += 1;
            acc.fees += trade.fees_usd;
        }

        report.daily = days
            .iter()
            .map(|(day, acc)| DailyPoint {
                day: day.clone(),
                pnl: acc.pnl,
                trades: acc.trades,
            })
            .collect();

        days.into_iter().map(|(day, acc)| (day, acc.fees)).collect()
    }

    fn aggregate_symbols(&self, sorted: &[&NormalizedTrade], report: &mut MetricsReport) {
        #[derive(Default)]
        struct SymbolAcc {
            pnl: Decimal,
            trades: usize,
            wins: usize,
            volume: Decimal,
        }

        let mut symbols: BTreeMap<&str, SymbolAcc> = BTreeMap::new();
        for trade in sorted {
            let acc = symbols.entry(trade.symbol.as_str()).or_default();
            acc.pnl += trade.pnl_usd;
            acc.trades += 1;
            if trade.pnl_usd > Decimal::ZERO {
                acc.wins += 1;
            }
            if let Some(notional) = trade.notional() {
                acc.volume += notional;
            }
        }

        let mut perf: Vec<SymbolPerf> = symbols
            .into_iter()
            .map(|(symbol, acc)| SymbolPerf {
                symbol: symbol.to_string(),
                trades: acc.trades,
                pnl: acc.pnl,
                win_rate_pct: win_rate(acc.wins, acc.trades),
                volume: acc.volume,
            })
            .collect();
        // Stable sort on a BTreeMap-ordered vec: pnl descending, ties stay
        // alphabetical.
        perf.sort_by(|a, b| b.pnl.cmp(&a.pnl));
        report.symbols = perf;
    }

    /// Best-effort fee attribution from the optional breakdown fields.
    fn compose_fees(&self, sorted: &[&NormalizedTrade], report: &mut MetricsReport) {
        let composition = &mut report.fee_composition;
        for trade in sorted {
            composition.maker += trade.fee_maker_usd.unwrap_or(Decimal::ZERO);
            composition.taker += trade.fee_taker_usd.unwrap_or(Decimal::ZERO);
            composition.funding += trade.fee_funding_usd.unwrap_or(Decimal::ZERO);
        }
        composition.total = report.kpis.total_fees;

        // Inconsistent partial breakdowns can exceed the recorded total;
        // floor the remainder at zero instead of going negative.
        let attributed = composition.maker + composition.taker + composition.funding;
        composition.other = (composition.total - attributed).max(Decimal::ZERO);
    }

    fn accumulate_daily_fees(
        &self,
        fees_by_day: &BTreeMap<String, Decimal>,
        report: &mut MetricsReport,
    ) {
        let mut cum_fees = Decimal::ZERO;
        report.cumulative_fees_by_day = fees_by_day
            .iter()
            .map(|(day, fees)| {
                cum_fees += *fees;
                CumulativeFeePoint {
                    day: day.clone(),
                    cum_fees,
                }
            })
            .collect();
    }

    fn aggregate_order_types(&self, sorted: &[&NormalizedTrade], report: &mut MetricsReport) {
        #[derive(Default)]
        struct OrderTypeAcc {
            trades: usize,
            pnl: Decimal,
            wins: usize,
            duration_secs: i64,
            fees: Decimal,
        }

        let mut groups: BTreeMap<OrderType, OrderTypeAcc> = BTreeMap::new();
        for trade in sorted {
            let acc = groups.entry(trade.order_type).or_default();
            acc.trades += 1;
            acc.pnl += trade.pnl_usd;
            if trade.pnl_usd > Decimal::ZERO {
                acc.wins += 1;
            }
            acc.duration_secs += trade.duration_secs.unwrap_or(0);
            acc.fees += trade.fees_usd;
        }

        report.order_type_performance = groups
            .into_iter()
            .map(|(order_type, acc)| {
                let count = Decimal::from(acc.trades);
                let (avg_duration_hours, avg_fees) = if acc.trades > 0 {
                    (
                        Decimal::from(acc.duration_secs) / Decimal::from(SECS_PER_HOUR) / count,
                        acc.fees / count,
                    )
                } else {
                    (Decimal::ZERO, Decimal::ZERO)
                };
                OrderTypePerf {
                    order_type,
                    trades: acc.trades,
                    pnl: acc.pnl,
                    win_rate_pct: win_rate(acc.wins, acc.trades),
                    avg_duration_hours,
                    avg_fees,
                }
            })
            .collect();
    }

    /// Fills the 24 hour buckets and the four session buckets in one pass.
    fn bucket_hours_and_sessions(
        &self,
        sorted: &[&NormalizedTrade],
        options: &MetricsOptions,
        report: &mut MetricsReport,
    ) {
        let mut hour_wins = [0usize; 24];
        let mut session_wins = [0usize; 4];
        let mut session_duration_secs = [0i64; 4];

        for trade in sorted {
            let hour = local_hour(trade.ts, options.utc_offset) as usize;
            let is_win = trade.pnl_usd > Decimal::ZERO;

            let bucket = &mut report.time_of_day[hour];
            bucket.pnl += trade.pnl_usd;
            bucket.trades += 1;
            if is_win {
                hour_wins[hour] += 1;
            }

            let session = Session::of_hour(hour as u32);
            let stats = report.session_performance.stats_mut(session);
            stats.pnl += trade.pnl_usd;
            stats.trades += 1;
            stats.total_fees += trade.fees_usd;
            if is_win {
                session_wins[session as usize] += 1;
            }
            session_duration_secs[session as usize] += trade.duration_secs.unwrap_or(0);
        }

        for (hour, bucket) in report.time_of_day.iter_mut().enumerate() {
            bucket.win_rate_pct = win_rate(hour_wins[hour], bucket.trades);
        }

        for session in [
            Session::Overnight,
            Session::Morning,
            Session::Afternoon,
            Session::Night,
        ] {
            let stats = report.session_performance.stats_mut(session);
            stats.win_rate_pct = win_rate(session_wins[session as usize], stats.trades);
            if stats.trades > 0 {
                stats.avg_duration_hours = Decimal::from(session_duration_secs[session as usize])
                    / Decimal::from(SECS_PER_HOUR)
                    / Decimal::from(stats.trades);
            }
        }
    }

    fn measure_direction_bias(&self, sorted: &[&NormalizedTrade], report: &mut MetricsReport) {
        for trade in sorted {
            let bias = match trade.side {
                Side::Long => &mut report.direction_bias.long,
                Side::Short => &mut report.direction_bias.short,
            };
            bias.trades += 1;
            bias.pnl += trade.pnl_usd;
        }
    }
}

fn win_rate(wins: usize, trades: usize) -> Decimal {
    if trades == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(wins) / Decimal::from(trades) * Decimal::from(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use rust_decimal_macros::dec;

    fn trade(id: &str, ts: DateTime<Utc>, pnl: Decimal) -> NormalizedTrade {
        NormalizedTrade {
            id: id.to_string(),
            ts,
            symbol: "SOL/USDC".to_string(),
            side: Side::Long,
            order_type: OrderType::Limit,
            entry_price: Some(dec!(100)),
            exit_price: Some(dec!(101)),
            size: Some(dec!(1)),
            pnl_usd: pnl,
            fees_usd: dec!(0),
            fee_maker_usd: None,
            fee_taker_usd: None,
            fee_funding_usd: None,
            duration_secs: Some(3600),
            tags: vec![],
            notes: String::new(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn compute(trades: &[NormalizedTrade]) -> MetricsReport {
        MetricsEngine::new().compute(trades, &MetricsOptions::default())
    }

    #[test]
    fn empty_batch_yields_the_zeroed_report() {
        let report = compute(&[]);
        assert_eq!(report, MetricsReport::new());
        assert_eq!(report.kpis.trade_count, 0);
        assert_eq!(report.kpis.win_rate_pct, Decimal::ZERO);
        assert_eq!(report.kpis.total_pnl, Decimal::ZERO);
        assert_eq!(report.time_of_day.len(), 24);
        assert!(report.equity_curve.is_empty());
        assert!(report.daily.is_empty());
    }

    #[test]
    fn equity_curve_tracks_prefix_sums_and_drawdown() {
        let trades = vec![
            trade("1", at(1, 0), dec!(100)),
            trade("2", at(2, 0), dec!(-200)),
            trade("3", at(3, 0), dec!(50)),
        ];
        let report = compute(&trades);

        assert_eq!(report.equity_curve.len(), 3);
        assert_eq!(report.equity_curve[0].equity, dec!(10100));
        assert_eq!(report.equity_curve[1].equity, dec!(9900));
        assert_eq!(report.equity_curve[2].equity, dec!(9950));
        assert_eq!(report.equity_curve[2].cum_pnl, dec!(-50));

        // Drawdown at point 1: (10100 - 9900) / 10100 * 100 ~= 1.9802%.
        let dd = report.equity_curve[1].drawdown_pct;
        assert!(dd > dec!(1.9) && dd < dec!(2.1), "drawdown was {dd}");

        // The report's max drawdown is the maximum point drawdown.
        let max_of_points = report
            .equity_curve
            .iter()
            .map(|p| p.drawdown_pct)
            .max()
            .unwrap();
        assert_eq!(report.max_drawdown_pct, max_of_points);
        assert_eq!(
            report.equity_curve[2].max_drawdown_pct,
            report.max_drawdown_pct
        );
    }

    #[test]
    fn unsorted_input_is_ordered_by_timestamp() {
        let trades = vec![
            trade("late", at(3, 0), dec!(50)),
            trade("early", at(1, 0), dec!(100)),
            trade("mid", at(2, 0), dec!(-200)),
        ];
        let report = compute(&trades);
        assert_eq!(report.equity_curve[0].ts, at(1, 0));
        assert_eq!(report.equity_curve[0].equity, dec!(10100));
        assert_eq!(report.equity_curve[2].ts, at(3, 0));
        assert_eq!(report.equity_curve[2].equity, dec!(9950));
    }

    #[test]
    fn breakeven_trades_are_neither_wins_nor_losses() {
        let trades = vec![
            trade("w", at(1, 0), dec!(2)),
            trade("l", at(2, 0), dec!(-1)),
            trade("b", at(3, 0), dec!(0)),
        ];
        let report = compute(&trades);
        assert_eq!(report.kpis.trade_count, 3);
        assert_eq!(report.kpis.avg_win, dec!(2));
        assert_eq!(report.kpis.avg_loss, dec!(1));
        assert_eq!(report.kpis.largest_gain, dec!(2));
        assert_eq!(report.kpis.largest_loss, dec!(1));
        // One win out of three trades.
        assert!(report.kpis.win_rate_pct > dec!(33.33));
        assert!(report.kpis.win_rate_pct < dec!(33.34));
        assert_eq!(report.kpis.risk_reward, dec!(2));
    }

    #[test]
    fn long_short_ratio_keeps_raw_and_display_policies() {
        // Mixed batch: a defined ratio, both fields agree.
        let mut mixed = vec![
            trade("a", at(1, 0), dec!(1)),
            trade("b", at(2, 0), dec!(1)),
            trade("c", at(3, 0), dec!(1)),
        ];
        mixed[2].side = Side::Short;
        let report = compute(&mixed);
        assert_eq!(report.kpis.long_short_ratio, Some(dec!(2)));
        assert_eq!(report.kpis.long_short_ratio_display, dec!(2));

        // Longs only: the raw ratio is unbounded, display clamps to the count.
        let longs = vec![trade("a", at(1, 0), dec!(1)), trade("b", at(2, 0), dec!(1))];
        let report = compute(&longs);
        assert_eq!(report.kpis.long_short_ratio, None);
        assert_eq!(report.kpis.long_short_ratio_display, dec!(2));

        // Shorts only: zero over a positive count is simply zero.
        let mut shorts = vec![trade("a", at(1, 0), dec!(1))];
        shorts[0].side = Side::Short;
        let report = compute(&shorts);
        assert_eq!(report.kpis.long_short_ratio, Some(Decimal::ZERO));
        assert_eq!(report.kpis.long_short_ratio_display, Decimal::ZERO);
    }

    #[test]
    fn volume_uses_notional_with_size_fallback() {
        let mut trades = vec![
            trade("full", at(1, 0), dec!(1)),
            trade("size_only", at(2, 0), dec!(1)),
            trade("unknown", at(3, 0), dec!(1)),
        ];
        trades[0].entry_price = Some(dec!(10));
        trades[0].size = Some(dec!(2));
        trades[1].entry_price = None;
        trades[1].size = Some(dec!(3));
        trades[2].entry_price = None;
        trades[2].size = None;

        let report = compute(&trades);
        assert_eq!(report.kpis.total_volume, dec!(23));
    }

    #[test]
    fn unknown_durations_count_as_zero_in_the_average() {
        let mut trades = vec![trade("a", at(1, 0), dec!(1)), trade("b", at(2, 0), dec!(1))];
        trades[0].duration_secs = Some(7200);
        trades[1].duration_secs = None;
        let report = compute(&trades);
        // (2h + 0h) / 2 trades.
        assert_eq!(report.kpis.avg_trade_duration_hours, dec!(1));
    }

    #[test]
    fn pnl_percent_is_clamped_for_tiny_baselines() {
        let trades = vec![trade("a", at(1, 0), dec!(200))];
        let options = MetricsOptions {
            starting_equity: dec!(1),
            ..MetricsOptions::default()
        };
        let report = MetricsEngine::new().compute(&trades, &options);
        assert_eq!(report.kpis.pnl_percent, dec!(10000));

        let losses = vec![trade("a", at(1, 0), dec!(-200))];
        let report = MetricsEngine::new().compute(&losses, &options);
        assert_eq!(report.kpis.pnl_percent, dec!(-10000));
    }

    #[test]
    fn daily_aggregation_sums_and_sorts_ascending() {
        let trades = vec![
            trade("c", at(2, 3), dec!(5)),
            trade("a", at(1, 1), dec!(1)),
            trade("b", at(1, 2), dec!(2)),
        ];
        let report = compute(&trades);
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].day, "2026-01-01");
        assert_eq!(report.daily[0].pnl, dec!(3));
        assert_eq!(report.daily[0].trades, 2);
        assert_eq!(report.daily[1].day, "2026-01-02");
        assert_eq!(report.daily[1].pnl, dec!(5));
    }

    #[test]
    fn symbols_sort_by_pnl_descending() {
        let mut trades = vec![
            trade("a", at(1, 0), dec!(1)),
            trade("b", at(2, 0), dec!(9)),
            trade("c", at(3, 0), dec!(-2)),
        ];
        trades[1].symbol = "ETH/USDC".to_string();
        trades[2].symbol = "BTC/USDC".to_string();
        let report = compute(&trades);
        let order: Vec<&str> = report.symbols.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["ETH/USDC", "SOL/USDC", "BTC/USDC"]);
        assert_eq!(report.symbols[0].win_rate_pct, dec!(100));
        assert_eq!(report.symbols[2].win_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn fee_composition_attributes_unbroken_fees_to_other() {
        let mut trades = vec![
            trade("a", at(1, 1), dec!(1)),
            trade("b", at(1, 2), dec!(1)),
            trade("c", at(2, 2), dec!(1)),
        ];
        trades[0].fees_usd = dec!(0.1);
        trades[1].fees_usd = dec!(0.2);
        trades[2].fees_usd = dec!(0.3);
        let report = compute(&trades);

        assert_eq!(report.fee_composition.total, dec!(0.6));
        assert_eq!(report.fee_composition.other, dec!(0.6));
        assert_eq!(report.fee_composition.maker, Decimal::ZERO);
        assert_eq!(report.fee_composition.taker, Decimal::ZERO);
        assert_eq!(report.fee_composition.funding, Decimal::ZERO);

        assert_eq!(report.cumulative_fees_by_day.len(), 2);
        assert_eq!(report.cumulative_fees_by_day[0].cum_fees, dec!(0.3));
        assert_eq!(report.cumulative_fees_by_day[1].cum_fees, dec!(0.6));
    }

    #[test]
    fn fee_composition_sums_breakdowns_and_floors_other() {
        let mut trades = vec![trade("a", at(1, 0), dec!(1))];
        trades[0].fees_usd = dec!(0.5);
        trades[0].fee_maker_usd = Some(dec!(0.1));
        trades[0].fee_taker_usd = Some(dec!(0.2));
        let report = compute(&trades);
        assert_eq!(report.fee_composition.maker, dec!(0.1));
        assert_eq!(report.fee_composition.taker, dec!(0.2));
        assert_eq!(report.fee_composition.other, dec!(0.2));
        let c = &report.fee_composition;
        assert_eq!(c.maker + c.taker + c.funding + c.other, c.total);

        // A breakdown exceeding the recorded total floors `other` at zero.
        trades[0].fee_taker_usd = Some(dec!(0.7));
        let report = compute(&trades);
        assert_eq!(report.fee_composition.other, Decimal::ZERO);
    }

    #[test]
    fn order_type_groups_carry_averages() {
        let mut trades = vec![
            trade("1", at(1, 0), dec!(5)),
            trade("2", at(2, 0), dec!(-1)),
            trade("3", at(3, 0), dec!(1)),
        ];
        trades[0].fees_usd = dec!(1);
        trades[0].duration_secs = Some(3600);
        trades[1].order_type = OrderType::Market;
        trades[1].fees_usd = dec!(2);
        trades[1].duration_secs = Some(7200);
        trades[2].fees_usd = dec!(1);
        trades[2].duration_secs = Some(3600);

        let report = compute(&trades);
        let limit = report
            .order_type_performance
            .iter()
            .find(|p| p.order_type == OrderType::Limit)
            .unwrap();
        assert_eq!(limit.trades, 2);
        assert_eq!(limit.pnl, dec!(6));
        assert_eq!(limit.win_rate_pct, dec!(100));
        assert_eq!(limit.avg_duration_hours, dec!(1));
        assert_eq!(limit.avg_fees, dec!(1));

        let market = report
            .order_type_performance
            .iter()
            .find(|p| p.order_type == OrderType::Market)
            .unwrap();
        assert_eq!(market.trades, 1);
        assert_eq!(market.win_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn hour_buckets_and_sessions_partition_trades() {
        let mut trades = vec![
            trade("1", at(1, 2), dec!(10)),
            trade("2", at(1, 3), dec!(-5)),
            trade("3", at(1, 6), dec!(1)),
            trade("4", at(1, 12), dec!(-1)),
            trade("5", at(1, 18), dec!(2)),
        ];
        trades[0].fees_usd = dec!(1);
        trades[0].duration_secs = Some(7200);
        trades[1].fees_usd = dec!(1);
        trades[1].duration_secs = Some(3600);

        let report = compute(&trades);

        assert_eq!(report.time_of_day.len(), 24);
        let h2 = &report.time_of_day[2];
        assert_eq!(h2.trades, 1);
        assert_eq!(h2.win_rate_pct, dec!(100));

        let overnight = &report.session_performance.overnight;
        assert_eq!(overnight.trades, 2);
        assert_eq!(overnight.win_rate_pct, dec!(50));
        assert_eq!(overnight.total_fees, dec!(2));
        assert_eq!(overnight.avg_duration_hours, dec!(1.5));
        assert_eq!(report.session_performance.stats(Session::Morning).trades, 1);
        assert_eq!(report.session_performance.stats(Session::Afternoon).trades, 1);
        assert_eq!(report.session_performance.stats(Session::Night).trades, 1);

        // Every trade lands in exactly one session.
        let session_total = report.session_performance.overnight.trades
            + report.session_performance.morning.trades
            + report.session_performance.afternoon.trades
            + report.session_performance.night.trades;
        assert_eq!(session_total, report.kpis.trade_count);
    }

    #[test]
    fn bucketing_respects_the_configured_offset() {
        // 23:00 UTC is 01:00 at +2: overnight, hour bucket 1.
        let trades = vec![trade("1", at(1, 23), dec!(1))];
        let options = MetricsOptions {
            utc_offset: FixedOffset::east_opt(2 * 3600).unwrap(),
            ..MetricsOptions::default()
        };
        let report = MetricsEngine::new().compute(&trades, &options);
        assert_eq!(report.time_of_day[1].trades, 1);
        assert_eq!(report.session_performance.overnight.trades, 1);
        assert_eq!(report.daily[0].day, "2026-01-02");
    }

    #[test]
    fn direction_bias_sums_each_side() {
        let mut trades = vec![
            trade("a", at(1, 0), dec!(3)),
            trade("b", at(2, 0), dec!(-1)),
            trade("c", at(3, 0), dec!(4)),
        ];
        trades[2].side = Side::Short;
        let report = compute(&trades);
        assert_eq!(report.direction_bias.long.trades, 2);
        assert_eq!(report.direction_bias.long.pnl, dec!(2));
        assert_eq!(report.direction_bias.short.trades, 1);
        assert_eq!(report.direction_bias.short.pnl, dec!(4));
    }

    #[test]
    fn compute_is_pure_and_idempotent() {
        let trades = vec![
            trade("a", at(1, 5), dec!(12.5)),
            trade("b", at(2, 14), dec!(-3.75)),
            trade("c", at(2, 20), dec!(0)),
        ];
        let before = trades.clone();
        let first = compute(&trades);
        let second = compute(&trades);
        assert_eq!(first, second);
        assert_eq!(trades, before);
    }
}
