//! The card store: the persisted authorization list.

use crate::error::CoreResult;
use crate::types::{CardFile, CardRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of an administrative add operation.
///
/// A duplicate identifier is a conflict outcome, not an error: the existing
/// record is left untouched and the caller decides how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The record was appended to the collection.
    Added,
    /// A record with this identifier already exists; nothing changed.
    AlreadyExists,
}

/// A handle over the persisted authorization list.
///
/// The store holds no in-memory copy of the collection. Every authorization
/// check re-reads the file, so edits made by the administration tool apply
/// on the next check without restarting the server.
///
/// # Fail-closed reads
///
/// A missing or malformed file reads as an empty collection, which denies
/// every credential. The read path never writes; seeding a default record
/// set happens only through [`CardStore::ensure_default`] on the
/// administrative path.
///
/// # Example
///
/// ```no_run
/// use latchd_core::CardStore;
///
/// let store = CardStore::new("authorized_cards.json");
/// assert!(!store.is_authorized("0xnotpresent"));
/// ```
#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
}

impl CardStore {
    /// Creates a store handle over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the collection, treating missing or corrupt state as empty.
    #[must_use]
    pub fn load(&self) -> CardFile {
        self.load_intact().unwrap_or_default()
    }

    /// Checks whether a credential identifier is authorized.
    ///
    /// Reloads the collection from disk on every call. Linear scan, first
    /// match wins; an absent identifier is always denied.
    #[must_use]
    pub fn is_authorized(&self, card_id: &str) -> bool {
        let file = self.load();
        let authorized = file.find(card_id).map(|c| c.authorized).unwrap_or(false);
        debug!(card_id, authorized, "authorization check");
        authorized
    }

    /// Persists the collection as pretty-printed JSON.
    ///
    /// Writes to a sibling temp file and renames it into place so a crash
    /// mid-write never leaves a truncated document behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or renamed.
    pub fn save(&self, file: &CardFile) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Seeds the default record set if the file is missing or corrupt.
    ///
    /// Idempotent: an intact file is returned unchanged, no matter its
    /// contents. Administrative path only.
    ///
    /// # Errors
    ///
    /// Returns an error if the default set needs to be written and cannot be.
    pub fn ensure_default(&self) -> CoreResult<CardFile> {
        if let Some(existing) = self.load_intact() {
            return Ok(existing);
        }
        let defaults = CardFile::default_cards();
        self.save(&defaults)?;
        Ok(defaults)
    }

    /// Appends a new record unless the identifier is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated collection cannot be persisted.
    pub fn add(&self, id: &str, name: &str, authorized: bool) -> CoreResult<AddOutcome> {
        let mut file = self.load();
        if file.find(id).is_some() {
            return Ok(AddOutcome::AlreadyExists);
        }
        file.cards.push(CardRecord {
            id: id.to_string(),
            name: name.to_string(),
            authorized,
        });
        self.save(&file)?;
        Ok(AddOutcome::Added)
    }

    /// Removes the record with the given identifier.
    ///
    /// Returns `false` if no such record existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated collection cannot be persisted.
    pub fn remove(&self, id: &str) -> CoreResult<bool> {
        let mut file = self.load();
        let before = file.cards.len();
        file.cards.retain(|c| c.id != id);
        if file.cards.len() == before {
            return Ok(false);
        }
        self.save(&file)?;
        Ok(true)
    }

    /// Updates the authorization flag of an existing record.
    ///
    /// Returns `false` if no such record existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated collection cannot be persisted.
    pub fn set_authorized(&self, id: &str, authorized: bool) -> CoreResult<bool> {
        let mut file = self.load();
        let Some(card) = file.cards.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        card.authorized = authorized;
        self.save(&file)?;
        Ok(true)
    }

    /// Loads the file only if it exists and parses cleanly.
    fn load_intact(&self) -> Option<CardFile> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "card store unreadable, denying all");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "card store malformed, denying all");
                None
            }
        }
    }
}
