use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a normalized trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Returns the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            other => Err(CoreError::InvalidInput(
                "side".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Order type as reported by the source venue.
///
/// Sources that do not carry order-type information (decoded on-chain fills,
/// sparse CSV exports) use `Unknown` rather than guessing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Limit,
    Market,
    Ioc,
    PostOnly,
    Unknown,
}

impl OrderType {
    /// Lenient mapping from a source string. Unrecognized labels collapse to
    /// `Unknown` instead of failing the batch.
    pub fn from_source(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "limit" => OrderType::Limit,
            "market" => OrderType::Market,
            "ioc" => OrderType::Ioc,
            "post_only" | "post-only" | "postonly" => OrderType::PostOnly,
            _ => OrderType::Unknown,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "limit"),
            OrderType::Market => write!(f, "market"),
            OrderType::Ioc => write!(f, "ioc"),
            OrderType::PostOnly => write!(f, "post_only"),
            OrderType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Win/loss classification of a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOutcome {
    Win,
    Loss,
    Breakeven,
}
