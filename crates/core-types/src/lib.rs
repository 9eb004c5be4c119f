pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderType, Side, TradeOutcome};
pub use error::CoreError;
pub use structs::{NormalizedTrade, validate_batch};
