//! # Derivision Adapters
//!
//! Everything that turns an external trade source into a validated
//! `NormalizedTrade` batch: CSV imports, the deterministic demo generator,
//! and the on-chain program-event decoder.
//!
//! Adapters are the only place malformed data can appear, so they are the
//! only place that rejects it: a batch either validates completely or the
//! whole import fails with a structured error. The filter and the engines
//! downstream never see a partial batch.

pub mod csv;
pub mod demo;
pub mod error;
pub mod onchain;

pub use self::csv::parse_trades_csv;
pub use demo::{generate_demo_trades, DEFAULT_DEMO_COUNT, DEFAULT_DEMO_SEED};
pub use error::AdapterError;
pub use onchain::{decode_onchain_trades, OnChainEnv, SUPPORTED_PROGRAM_VERSION};
