use crate::entries::{MistakeType, SetupType};
use crate::error::JournalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User notes attached to a single trade, keyed externally by trade id.
/// Trades themselves are never persisted; annotations are the only state
/// that outlives a computation cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeAnnotation {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub setup_type: Option<SetupType>,
    #[serde(default)]
    pub mistake_type: Option<MistakeType>,
    #[serde(default)]
    pub reviewed: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// File-backed trade-id -> annotation map.
#[derive(Debug)]
pub struct AnnotationStore {
    path: PathBuf,
    map: BTreeMap<String, TradeAnnotation>,
}

impl AnnotationStore {
    /// Opens the store at `path`; missing or corrupt files start empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match load_annotations(&path) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "annotations unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, map }
    }

    pub fn get(&self, trade_id: &str) -> Option<&TradeAnnotation> {
        self.map.get(trade_id)
    }

    pub fn all(&self) -> &BTreeMap<String, TradeAnnotation> {
        &self.map
    }

    /// Inserts or replaces the annotation for a trade, stamping
    /// `updated_at`.
    pub fn upsert(&mut self, trade_id: impl Into<String>, mut annotation: TradeAnnotation) {
        annotation.updated_at = Some(Utc::now());
        self.map.insert(trade_id.into(), annotation);
    }

    /// Removes a trade's annotation; returns whether one existed.
    pub fn remove(&mut self, trade_id: &str) -> bool {
        self.map.remove(trade_id).is_some()
    }

    pub fn save(&self) -> Result<(), JournalError> {
        let rendered = serde_json::to_string_pretty(&self.map)?;
        fs::write(&self.path, rendered)?;
        Ok(())
    }
}

fn load_annotations(path: &Path) -> Result<BTreeMap<String, TradeAnnotation>, JournalError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_stamps_updated_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");

        let mut store = AnnotationStore::open(&path);
        store.upsert(
            "trade-1",
            TradeAnnotation {
                tags: vec!["scalp".to_string()],
                notes: "late entry".to_string(),
                setup_type: Some(SetupType::Breakout),
                mistake_type: Some(MistakeType::WrongEntry),
                reviewed: true,
                updated_at: None,
            },
        );
        assert!(store.get("trade-1").unwrap().updated_at.is_some());
        store.save().unwrap();

        let reopened = AnnotationStore::open(&path);
        let ann = reopened.get("trade-1").unwrap();
        assert_eq!(ann.notes, "late entry");
        assert_eq!(ann.setup_type, Some(SetupType::Breakout));
        assert!(ann.reviewed);
        assert!(reopened.get("trade-2").is_none());
    }

    #[test]
    fn remove_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AnnotationStore::open(dir.path().join("annotations.json"));
        store.upsert("trade-1", TradeAnnotation::default());
        assert!(store.remove("trade-1"));
        assert!(!store.remove("trade-1"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = AnnotationStore::open(&path);
        assert!(store.all().is_empty());
    }
}
