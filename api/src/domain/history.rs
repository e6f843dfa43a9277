use std::time::SystemTime;

use crate::db::repository::HistoryStore;
use crate::domain::request::HttpMethod;

/// Sidebar row for one persisted request. `meta` stays empty until the row
/// is paged in, so listing never reads more than the visible files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub modified: SystemTime,
    pub meta: Option<EntryMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMeta {
    pub request_url: String,
    pub method: HttpMethod,
    /// Relative age of the file, e.g. `Now`, `3m`, `2w`.
    pub age: String,
}

impl HistoryEntry {
    pub fn is_loaded(&self) -> bool {
        self.meta.is_some()
    }
}

/// Recency-ordered history, hydrated one window at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryListing {
    entries: Vec<HistoryEntry>,
}

impl HistoryListing {
    pub(crate) fn new(entries: Vec<HistoryEntry>) -> Self {
        HistoryListing { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Back-fills metadata for `limit` entries starting at `offset` and
    /// returns that window. Entries whose file has gone or no longer decodes
    /// are dropped, and the window slides forward to stay full.
    pub fn page(&mut self, store: &HistoryStore, offset: usize, limit: usize) -> &[HistoryEntry] {
        let stop = offset.saturating_add(limit);
        let mut index = offset;
        while index < self.entries.len() && index < stop {
            if self.entries[index].meta.is_some() {
                index += 1;
                continue;
            }
            match store.load_metadata(&self.entries[index].id) {
                Ok(meta) => {
                    self.entries[index].meta = Some(meta);
                    index += 1;
                }
                Err(e) => {
                    log::warn!("skipping history entry {}: {}", self.entries[index].id, e);
                    self.entries.remove(index);
                }
            }
        }
        let end = index.min(self.entries.len());
        &self.entries[offset.min(end)..end]
    }

    /// Drops an entry after it has been deleted from the store.
    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position))
    }
}
