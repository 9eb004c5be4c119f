use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section and field has a working default, so the application runs
/// with no `config.toml` at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub demo: DemoSettings,
    pub onchain: OnChainSettings,
    pub journal: JournalSettings,
}

/// Baselines for the metrics computation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Equity baseline for pnl-percent and the equity curve. An arbitrary
    /// display anchor, not real account equity.
    pub starting_equity: Decimal,
    /// Calendar bucketing offset from UTC, in minutes. Zero keeps all day
    /// and session grouping in UTC.
    pub utc_offset_minutes: i32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            starting_equity: Decimal::from(10_000),
            utc_offset_minutes: 0,
        }
    }
}

impl AnalyticsSettings {
    /// The configured offset; values outside chrono's valid range fall back
    /// to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Parameters of the deterministic demo batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub count: usize,
    pub seed: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            count: 150,
            seed: 1337,
        }
    }
}

/// Program environment for the on-chain event source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OnChainSettings {
    pub rpc_url: String,
    pub program_id: String,
    pub version: u32,
}

impl Default for OnChainSettings {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            program_id: String::new(),
            version: 6,
        }
    }
}

/// Where journal entries and trade annotations persist.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JournalSettings {
    pub journal_path: PathBuf,
    pub annotations_path: PathBuf,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from("journal.json"),
            annotations_path: PathBuf::from("trade-annotations.json"),
        }
    }
}
