//! # Derivision Insights Engine
//!
//! Behavioral analytics layered on top of the metrics report: win/loss
//! streaks, overtrading detection, fee drag against gross profit, and the
//! best/worst trading hour.
//!
//! Like the metrics engine this is a pure Layer 1 crate: stateless, total
//! over any well-typed input (including the empty batch), and free of side
//! effects beyond tracing.

pub mod engine;
pub mod report;

pub use engine::{InsightsEngine, InsightsOptions, FEE_WARNING_PCT, OVERTRADING_THRESHOLD};
pub use report::{BestWorstHour, FeeDrag, FlaggedDay, InsightsReport, Overtrading, Streaks};
