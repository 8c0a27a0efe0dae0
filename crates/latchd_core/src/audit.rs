//! The append-only audit log of access attempts.

use crate::error::CoreResult;
use crate::types::AccessLogEntry;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The persisted history of access attempts.
///
/// The log is stored as a single JSON array and appended to with a
/// read-modify-write of the whole collection. Two concurrent appends that
/// both read the old collection would silently drop one entry, so every
/// append takes an internal mutex: appends are linearized and entries keep
/// their submission order.
///
/// Entries are never mutated or reordered by the server. Truncation
/// ([`AuditLog::clear`]) is an administrative operation.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLog {
    /// Creates a log handle over the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated collection cannot be persisted.
    pub fn append(&self, entry: AccessLogEntry) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read();
        entries.push(entry);
        self.write(&entries)
    }

    /// Reads all entries, treating missing or corrupt state as empty.
    #[must_use]
    pub fn read(&self) -> Vec<AccessLogEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "audit log unreadable");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "audit log malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Returns the number of recorded attempts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no attempts have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replaces the log with an empty collection. Administrative path only.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty collection cannot be persisted.
    pub fn clear(&self) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        self.write(&[])
    }

    fn write(&self, entries: &[AccessLogEntry]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn log_in(dir: &TempDir) -> AuditLog {
        AuditLog::new(dir.path().join("access_log.json"))
    }

    #[test]
    fn empty_log() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        assert!(log.is_empty());
        assert_eq!(log.read(), Vec::new());
    }

    #[test]
    fn append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(AccessLogEntry::now("0x01", true)).unwrap();
        log.append(AccessLogEntry::now("0x02", false)).unwrap();
        log.append(AccessLogEntry::now("0x03", true)).unwrap();

        let entries = log.read();
        let ids: Vec<_> = entries.iter().map(|e| e.card_id.as_str()).collect();
        assert_eq!(ids, ["0x01", "0x02", "0x03"]);
    }

    #[test]
    fn corrupt_log_starts_empty() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        fs::write(log.path(), "[{broken").unwrap();
        assert!(log.is_empty());

        log.append(AccessLogEntry::now("0x01", false)).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn clear_truncates() {
        let dir = TempDir::new().unwrap();
        let log = log_in(&dir);
        log.append(AccessLogEntry::now("0x01", true)).unwrap();
        log.clear().unwrap();
        assert!(log.is_empty());
        // The file exists as an explicit empty collection.
        assert_eq!(fs::read_to_string(log.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(log_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    log.append(AccessLogEntry::now(format!("0x{i:02}"), i % 2 == 0))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let entries = log.read();
        assert_eq!(entries.len(), 16);
        let mut ids: Vec<_> = entries.iter().map(|e| e.card_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}
