//! Data model shared by the server and the administration tool.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// A single entry in the authorization list.
///
/// The `id` is the opaque credential identifier delivered by the reader
/// device (e.g. `0x1a2b3c4d`); it is compared by plain string equality and
/// is the unique key of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Credential identifier as sent by the reader.
    pub id: String,
    /// Human-readable display label.
    pub name: String,
    /// Whether this credential opens the door.
    pub authorized: bool,
}

/// The persisted authorization document: a named collection of records.
///
/// Serializes as `{"cards": [...]}` so the file stays hand-editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFile {
    /// Card records in insertion order.
    pub cards: Vec<CardRecord>,
}

impl CardFile {
    /// The record set seeded by the administrative `init` path.
    #[must_use]
    pub fn default_cards() -> Self {
        Self {
            cards: vec![
                CardRecord {
                    id: "0x1a2b3c4d".to_string(),
                    name: "Admin card".to_string(),
                    authorized: true,
                },
                CardRecord {
                    id: "0xabcdef12".to_string(),
                    name: "Visitor card".to_string(),
                    authorized: false,
                },
            ],
        }
    }

    /// Looks up a record by credential identifier. First match wins.
    #[must_use]
    pub fn find(&self, card_id: &str) -> Option<&CardRecord> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}

/// One recorded access attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    /// The credential identifier that was presented.
    pub card_id: String,
    /// ISO-8601 local time of the decision.
    pub timestamp: String,
    /// The decision that was made.
    pub authorized: bool,
}

impl AccessLogEntry {
    /// Creates an entry timestamped with the current local time.
    #[must_use]
    pub fn now(card_id: impl Into<String>, authorized: bool) -> Self {
        Self {
            card_id: card_id.into(),
            timestamp: Local::now().to_rfc3339(),
            authorized,
        }
    }
}
