use crate::error::JournalError;
use chrono::{DateTime, Utc};
use core_types::TradeOutcome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Setup taxonomy for journaled trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupType {
    Breakout,
    Retracement,
    Range,
    Reversal,
    Other,
}

/// Self-reported execution mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeType {
    Overtrading,
    MissedTakeProfit,
    WrongEntry,
    BadRiskReward,
    Emotional,
    None,
}

/// One free-form journal entry, optionally linked to trades by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub ts: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub setup_type: SetupType,
    /// Self-reported conviction, 1-10.
    pub confidence: u8,
    pub outcome: Option<TradeOutcome>,
    pub mistake_type: MistakeType,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub linked_trade_ids: Vec<String>,
}

impl JournalEntry {
    /// A fresh entry with a generated id and neutral defaults.
    pub fn new(title: impl Into<String>, ts: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ts,
            title: title.into(),
            symbols: Vec::new(),
            setup_type: SetupType::Other,
            confidence: 5,
            outcome: None,
            mistake_type: MistakeType::None,
            notes: String::new(),
            tags: Vec::new(),
            linked_trade_ids: Vec::new(),
        }
    }
}

/// File-backed journal, newest entry first.
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    entries: Vec<JournalEntry>,
}

impl JournalStore {
    /// Opens the store at `path`. A missing file is an empty journal; an
    /// unreadable or corrupt one starts empty after a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "journal unreadable, starting empty");
                Vec::new()
            }
        };
        Self { path, entries }
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Inserts or replaces by id, keeping the newest-first ordering.
    pub fn upsert(&mut self, entry: JournalEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.ts.cmp(&a.ts));
    }

    /// Removes the entry with the given id; returns whether one existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn save(&self) -> Result<(), JournalError> {
        let rendered = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, rendered)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    let mut entries: Vec<JournalEntry> = serde_json::from_str(&raw)?;
    entries.sort_by(|a, b| b.ts.cmp(&a.ts));
    Ok(entries)
}
