//! # Derivision Journal
//!
//! User-authored context around trades: free-form journal entries and
//! per-trade annotations. Both persist as JSON files with simple key-value
//! semantics (entries keyed by entry id, annotations keyed by trade id).
//!
//! Persistence is deliberately forgiving on the read side: a missing or
//! corrupt file starts an empty store after a warning, because user notes
//! must never block the dashboard. Writes are explicit via `save`.

pub mod annotations;
pub mod entries;
pub mod error;

pub use annotations::{AnnotationStore, TradeAnnotation};
pub use entries::{JournalEntry, JournalStore, MistakeType, SetupType};
pub use error::JournalError;
