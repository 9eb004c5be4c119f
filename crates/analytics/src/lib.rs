//! # Derivision Metrics Engine
//!
//! This crate derives the full performance report from a batch of normalized
//! trades: scalar KPIs, the equity curve with drawdown tracking, calendar and
//! symbol aggregates, fee composition, time-of-day and session buckets, and
//! directional bias.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of external
//!   systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless
//!   calculator. It borrows a trade batch, never mutates it, and produces a
//!   freshly allocated `MetricsReport`.
//! - **Totality:** The engine never fails. Every division is policy-guarded,
//!   and the empty batch produces the all-zero report, so there is no error
//!   type to propagate.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the calculator.
//! - `MetricsOptions`: starting equity baseline and calendar offset.
//! - `MetricsReport`: the standardized result struct.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;
pub mod time;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{MetricsEngine, MetricsOptions};
pub use report::{
    CumulativeFeePoint, DailyPoint, DirectionBias, EquityPoint, FeeComposition, HourBucket, Kpis,
    MetricsReport, OrderTypePerf, Session, SessionPerformance, SessionStats, SideBias, SymbolPerf,
};
