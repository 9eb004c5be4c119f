use crate::report::{BestWorstHour, FeeDrag, FlaggedDay, InsightsReport, Overtrading, Streaks};
use analytics::time::day_key;
use analytics::{HourBucket, MetricsReport};
use chrono::{FixedOffset, Offset, Utc};
use core_types::NormalizedTrade;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// A day with at least this many trades is flagged as overtrading.
pub const OVERTRADING_THRESHOLD: usize = 25;

/// Fee drag at or above this share of gross profit raises the warning.
pub const FEE_WARNING_PCT: u32 = 20;

/// Options for one insights computation. The offset must match the one the
/// metrics report was computed with for day grouping to line up.
#[derive(Debug, Clone)]
pub struct InsightsOptions {
    pub utc_offset: FixedOffset,
}

impl Default for InsightsOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }
}

/// A stateless calculator for behavioral analytics. Consumes the trade batch
/// together with its metrics report (so total fees and hour buckets are not
/// recomputed) and never fails.
#[derive(Debug, Default)]
pub struct InsightsEngine {}

impl InsightsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(
        &self,
        trades: &[NormalizedTrade],
        metrics: &MetricsReport,
        options: &InsightsOptions,
    ) -> InsightsReport {
        let report = InsightsReport {
            streaks: self.detect_streaks(trades),
            overtrading: self.flag_overtrading(trades, options),
            fee_drag: self.measure_fee_drag(trades, metrics),
            best_worst_hour: self.pick_hours(metrics),
        };

        debug!(
            max_win_streak = report.streaks.max_win,
            flagged_days = report.overtrading.flagged_days.len(),
            fee_warning = report.fee_drag.warning,
            "insights computed"
        );

        report
    }

    /// Two passes over the time-sorted batch. The forward walk records the
    /// maxima; a breakeven trade resets both counters there. The backward
    /// walk measures the *trailing* streak, which is not the forward
    /// counters' final value: a mid-batch breakeven must not erase an
    /// earlier maximum but does terminate the current streak when it is the
    /// most recent trade.
    fn detect_streaks(&self, trades: &[NormalizedTrade]) -> Streaks {
        let mut sorted: Vec<&NormalizedTrade> = trades.iter().collect();
        sorted.sort_by_key(|t| t.ts);

        let mut streaks = Streaks::default();
        let mut run_win = 0usize;
        let mut run_loss = 0usize;

        for trade in &sorted {
            if trade.pnl_usd > Decimal::ZERO {
                run_win += 1;
                run_loss = 0;
            } else if trade.pnl_usd < Decimal::ZERO {
                run_loss += 1;
                run_win = 0;
            } else {
                run_win = 0;
                run_loss = 0;
            }
            streaks.max_win = streaks.max_win.max(run_win);
            streaks.max_loss = streaks.max_loss.max(run_loss);
        }

        for trade in sorted.iter().rev() {
            if trade.pnl_usd > Decimal::ZERO {
                if streaks.current_loss > 0 {
                    break;
                }
                streaks.current_win += 1;
            } else if trade.pnl_usd < Decimal::ZERO {
                if streaks.current_win > 0 {
                    break;
                }
                streaks.current_loss += 1;
            } else {
                break;
            }
        }

        streaks
    }

    fn flag_overtrading(
        &self,
        trades: &[NormalizedTrade],
        options: &InsightsOptions,
    ) -> Overtrading {
        let mut per_day: BTreeMap<String, usize> = BTreeMap::new();
        for trade in trades {
            *per_day
                .entry(day_key(trade.ts, options.utc_offset))
                .or_default() += 1;
        }

        let mut flagged_days: Vec<FlaggedDay> = per_day
            .into_iter()
            .filter(|(_, count)| *count >= OVERTRADING_THRESHOLD)
            .map(|(day, trades)| FlaggedDay { day, trades })
            .collect();
        // Busiest day first; equal counts stay in chronological order.
        flagged_days.sort_by(|a, b| b.trades.cmp(&a.trades));

        Overtrading {
            flagged_days,
            threshold: OVERTRADING_THRESHOLD,
        }
    }

    fn measure_fee_drag(&self, trades: &[NormalizedTrade], metrics: &MetricsReport) -> FeeDrag {
        let gross_profit: Decimal = trades
            .iter()
            .filter(|t| t.pnl_usd > Decimal::ZERO)
            .map(|t| t.pnl_usd)
            .sum();
        let total_fees = metrics.kpis.total_fees;

        let fee_to_gross_profit_pct = if gross_profit > Decimal::ZERO {
            total_fees / gross_profit * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        // The boundary is inclusive: exactly the warning percentage triggers.
        let warning = gross_profit > Decimal::ZERO
            && fee_to_gross_profit_pct >= Decimal::from(FEE_WARNING_PCT);

        FeeDrag {
            gross_profit,
            total_fees,
            fee_to_gross_profit_pct,
            warning,
        }
    }

    /// Extremes over the hour buckets that saw any trades; the first bucket
    /// wins ties in either direction.
    fn pick_hours(&self, metrics: &MetricsReport) -> BestWorstHour {
        let mut best: Option<&HourBucket> = None;
        let mut worst: Option<&HourBucket> = None;
        for bucket in metrics.time_of_day.iter().filter(|b| b.trades > 0) {
            match best {
                Some(current) if bucket.pnl <= current.pnl => {}
                _ => best = Some(bucket),
            }
            match worst {
                Some(current) if bucket.pnl >= current.pnl => {}
                _ => worst = Some(bucket),
            }
        }
        BestWorstHour {
            best_hour: best.cloned(),
            worst_hour: worst.cloned(),
        }
    }
}
