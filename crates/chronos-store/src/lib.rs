//! Storage layer for the chronos time tracker.
//!
//! Timesheets and entries live in a single JSON document:
//!
//! ```json
//! {
//!   "timesheets": [{ "id": "...", "name": "Tue, Mar 4", "createdAt": "2025-03-04T08:00:00Z" }],
//!   "entries": [{ "id": "...", "timesheetId": "...", "name": "review", "category": "dev",
//!                 "startTime": "2025-03-04T09:00:00Z", "endTime": null }]
//! }
//! ```
//!
//! Identifiers are random UUIDs. Timestamps are RFC 3339 in UTC; a document
//! with an unparseable timestamp is rejected on load rather than silently
//! producing bad durations downstream.
//!
//! # Concurrency
//!
//! Every mutation holds an exclusive advisory lock on a sibling `.lock` file,
//! re-reads the document, applies the change and replaces the file via
//! write-then-rename. Two `chronos` processes therefore never lose each
//! other's writes or observe a half-written file.
//!
//! [`Store`] itself is a plain owned value. It holds no global state; callers
//! pass it to whatever needs it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use chronos_core::types::{
    normalize_category, sort_entries_for_display, sort_timesheets_for_display, validate_name,
};
use chronos_core::{Entry, EntryId, Timesheet, TimesheetId, ValidationError};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the document failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON or has malformed records.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
    /// Could not acquire the document lock.
    #[error("failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// No record matches the given ID or prefix.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// An ID prefix matches more than one record.
    #[error("{kind} prefix {prefix} is ambiguous ({matches} matches)")]
    AmbiguousId {
        kind: &'static str,
        prefix: String,
        matches: usize,
    },
    /// The entry already has an end time.
    #[error("entry {0} is already stopped")]
    AlreadyStopped(EntryId),
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub timesheets: Vec<Timesheet>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Fields for a new entry. Missing start defaults to the creation instant.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub timesheet_id: TimesheetId,
    pub name: String,
    pub category: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// A partial update to an entry. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<String>>,
    pub start_time: Option<DateTime<Utc>>,
    /// `Some(None)` puts the entry back into the running state.
    pub end_time: Option<Option<DateTime<Utc>>>,
}

impl EntryUpdate {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// Default timesheet name: the local date, e.g. "Tue, Mar 4".
pub fn default_timesheet_name<Tz>(now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.with_timezone(tz).format("%a, %b %-d").to_string()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Finds the single ID equal to or starting with `prefix`.
///
/// A blank prefix never matches.
fn resolve_prefix<'a, I>(kind: &'static str, prefix: &str, ids: I) -> Result<&'a str, StoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(StoreError::NotFound {
            kind,
            id: String::new(),
        });
    }
    let mut matches = Vec::new();
    for id in ids {
        if id == prefix {
            return Ok(id);
        }
        if id.starts_with(prefix) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [] => Err(StoreError::NotFound {
            kind,
            id: prefix.to_string(),
        }),
        [only] => Ok(*only),
        _ => Err(StoreError::AmbiguousId {
            kind,
            prefix: prefix.to_string(),
            matches: matches.len(),
        }),
    }
}

/// JSON-backed store for timesheets and entries.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    doc: Document,
}

impl Store {
    /// Opens the document at `path`. A missing file is an empty document.
    ///
    /// The parent directory is created if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let doc = read_document(path)?;
        tracing::debug!(
            path = %path.display(),
            timesheets = doc.timesheets.len(),
            entries = doc.entries.len(),
            "opened store"
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            doc,
        })
    }

    /// Creates a store that is never written to disk.
    ///
    /// Useful for testing.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: Document::default(),
        }
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the current document.
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// Applies `change` to the freshest copy of the document and persists it.
    ///
    /// The document is left untouched on disk if `change` fails.
    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut Document) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let Some(path) = self.path.clone() else {
            return change(&mut self.doc);
        };

        let lock_path = path.with_extension("lock");
        let lock_file = File::create(&lock_path).map_err(|source| StoreError::Io {
            path: lock_path.clone(),
            source,
        })?;
        lock_file.lock_exclusive().map_err(|source| StoreError::Lock {
            path: lock_path.clone(),
            source,
        })?;

        let mut doc = read_document(&path)?;
        let result = change(&mut doc)?;
        write_document(&path, &doc)?;
        self.doc = doc;

        if let Err(e) = FileExt::unlock(&lock_file) {
            tracing::warn!(path = %lock_path.display(), error = %e, "failed to release lock");
        }
        Ok(result)
    }

    // ========== Timesheets ==========

    /// Lists timesheets, newest first.
    pub fn list_timesheets(&self) -> Vec<Timesheet> {
        let mut sheets = self.doc.timesheets.clone();
        sort_timesheets_for_display(&mut sheets);
        sheets
    }

    /// Creates a timesheet. A blank or missing name defaults to the local date.
    pub fn create_timesheet(
        &mut self,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Timesheet, StoreError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_timesheet_name(now, &Local), str::to_string);
        let sheet = Timesheet {
            id: TimesheetId::new(new_id())?,
            name,
            created_at: now,
        };
        let created = sheet.clone();
        self.mutate(|doc| {
            doc.timesheets.push(sheet);
            Ok(())
        })?;
        tracing::debug!(id = %created.id, name = %created.name, "created timesheet");
        Ok(created)
    }

    /// Returns the newest timesheet, creating a default one when none exist.
    pub fn ensure_timesheet(&mut self, now: DateTime<Utc>) -> Result<Timesheet, StoreError> {
        if let Some(newest) = self.list_timesheets().into_iter().next() {
            return Ok(newest);
        }
        self.create_timesheet(None, now)
    }

    /// Resolves a full ID or unique prefix to a timesheet ID.
    pub fn resolve_timesheet_id(&self, prefix: &str) -> Result<TimesheetId, StoreError> {
        let id = resolve_prefix(
            "timesheet",
            prefix,
            self.doc.timesheets.iter().map(|t| t.id.as_str()),
        )?;
        Ok(TimesheetId::new(id)?)
    }

    pub fn get_timesheet(&self, id: &TimesheetId) -> Result<Timesheet, StoreError> {
        self.doc
            .timesheets
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "timesheet",
                id: id.to_string(),
            })
    }

    pub fn rename_timesheet(
        &mut self,
        id: &TimesheetId,
        name: &str,
    ) -> Result<Timesheet, StoreError> {
        let name = validate_name(name)?;
        self.mutate(|doc| {
            let sheet = doc
                .timesheets
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "timesheet",
                    id: id.to_string(),
                })?;
            sheet.name = name;
            Ok(sheet.clone())
        })
    }

    /// Deletes a timesheet and every entry in it. Returns the number of
    /// entries removed.
    pub fn delete_timesheet(&mut self, id: &TimesheetId) -> Result<usize, StoreError> {
        let removed = self.mutate(|doc| {
            let before = doc.timesheets.len();
            doc.timesheets.retain(|t| &t.id != id);
            if doc.timesheets.len() == before {
                return Err(StoreError::NotFound {
                    kind: "timesheet",
                    id: id.to_string(),
                });
            }
            let entries_before = doc.entries.len();
            doc.entries.retain(|e| &e.timesheet_id != id);
            Ok(entries_before - doc.entries.len())
        })?;
        tracing::debug!(%id, entries = removed, "deleted timesheet");
        Ok(removed)
    }

    // ========== Entries ==========

    /// Lists a timesheet's entries in display order (running first, then
    /// newest start).
    pub fn list_entries(&self, timesheet_id: &TimesheetId) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .doc
            .entries
            .iter()
            .filter(|e| &e.timesheet_id == timesheet_id)
            .cloned()
            .collect();
        sort_entries_for_display(&mut entries);
        entries
    }

    /// Resolves a full ID or unique prefix to an entry ID.
    pub fn resolve_entry_id(&self, prefix: &str) -> Result<EntryId, StoreError> {
        let id = resolve_prefix(
            "entry",
            prefix,
            self.doc.entries.iter().map(|e| e.id.as_str()),
        )?;
        Ok(EntryId::new(id)?)
    }

    pub fn get_entry(&self, id: &EntryId) -> Result<Entry, StoreError> {
        self.doc
            .entries
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| entry_not_found(id))
    }

    /// Creates an entry. Without a start time it starts at `now`; without an
    /// end time it is running.
    pub fn create_entry(
        &mut self,
        new: NewEntry,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError> {
        let entry = Entry {
            id: EntryId::new(new_id())?,
            timesheet_id: new.timesheet_id,
            name: validate_name(&new.name)?,
            category: normalize_category(new.category.as_deref()),
            start_time: new.start_time.unwrap_or(now),
            end_time: new.end_time,
        };
        let created = entry.clone();
        self.mutate(|doc| {
            if !doc.timesheets.iter().any(|t| t.id == entry.timesheet_id) {
                return Err(StoreError::NotFound {
                    kind: "timesheet",
                    id: entry.timesheet_id.to_string(),
                });
            }
            doc.entries.push(entry);
            Ok(())
        })?;
        tracing::debug!(
            id = %created.id,
            name = %created.name,
            running = created.is_running(),
            "created entry"
        );
        Ok(created)
    }

    /// Applies a partial update to an entry.
    pub fn update_entry(
        &mut self,
        id: &EntryId,
        update: EntryUpdate,
    ) -> Result<Entry, StoreError> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        self.mutate(|doc| {
            let entry = find_entry_mut(doc, id)?;
            if let Some(name) = name {
                entry.name = name;
            }
            if let Some(category) = update.category {
                entry.category = normalize_category(category.as_deref());
            }
            if let Some(start_time) = update.start_time {
                entry.start_time = start_time;
            }
            if let Some(end_time) = update.end_time {
                entry.end_time = end_time;
            }
            Ok(entry.clone())
        })
    }

    /// Stops a running entry at `now`.
    pub fn stop_entry(&mut self, id: &EntryId, now: DateTime<Utc>) -> Result<Entry, StoreError> {
        let stopped = self.mutate(|doc| {
            let entry = find_entry_mut(doc, id)?;
            if !entry.is_running() {
                return Err(StoreError::AlreadyStopped(entry.id.clone()));
            }
            entry.end_time = Some(now);
            Ok(entry.clone())
        })?;
        tracing::debug!(%id, "stopped entry");
        Ok(stopped)
    }

    /// Starts a new running entry with the same name and category as `id`,
    /// in the same timesheet.
    pub fn restart_entry(
        &mut self,
        id: &EntryId,
        now: DateTime<Utc>,
    ) -> Result<Entry, StoreError> {
        let source = self.get_entry(id)?;
        self.create_entry(
            NewEntry {
                timesheet_id: source.timesheet_id,
                name: source.name,
                category: source.category,
                start_time: None,
                end_time: None,
            },
            now,
        )
    }

    pub fn delete_entry(&mut self, id: &EntryId) -> Result<(), StoreError> {
        self.mutate(|doc| {
            let before = doc.entries.len();
            doc.entries.retain(|e| &e.id != id);
            if doc.entries.len() == before {
                return Err(entry_not_found(id));
            }
            Ok(())
        })?;
        tracing::debug!(%id, "deleted entry");
        Ok(())
    }

    /// All categories used by any entry, sorted and de-duplicated.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .doc
            .entries
            .iter()
            .filter_map(|e| e.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

fn entry_not_found(id: &EntryId) -> StoreError {
    StoreError::NotFound {
        kind: "entry",
        id: id.to_string(),
    }
}

fn find_entry_mut<'a>(doc: &'a mut Document, id: &EntryId) -> Result<&'a mut Entry, StoreError> {
    doc.entries
        .iter_mut()
        .find(|e| &e.id == id)
        .ok_or_else(|| entry_not_found(id))
}

fn read_document(path: &Path) -> Result<Document, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Document::default());
    }
    Ok(serde_json::from_str(&content)?)
}

fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(doc)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
