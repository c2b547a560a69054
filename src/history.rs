//! Recently searched places, persisted in a key-value slot.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::constants::{HISTORY_CAPACITY, HISTORY_KEY};
use crate::error::Error;

/// Durable string slots addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}

/// One `<key>.json` file per slot under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        // write-then-rename so a crash never leaves a half-written slot
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Process-local slots; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|count| *count).unwrap_or(0)
    }
}

fn poisoned() -> io::Error {
    io::Error::other("memory store lock poisoned")
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.slots
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().map_err(|_| poisoned())? += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.slots.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

/// Place names, most recent first.
///
/// Holds at most [`HISTORY_CAPACITY`] entries and never two entries that are
/// equal ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<String>,
}

fn same_place(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from entries ordered most recent first, dropping
    /// blanks, later duplicates and anything past capacity.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut history = Self::new();
        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() || history.contains(entry) {
                continue;
            }
            history.entries.push(entry.to_string());
            if history.entries.len() == HISTORY_CAPACITY {
                break;
            }
        }
        history
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.entries.iter().any(|entry| same_place(entry, city))
    }

    /// Entries starting with `prefix`, ignoring case, in recency order.
    pub fn suggest<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix = prefix.trim().to_lowercase();
        self.iter()
            .filter(move |entry| entry.to_lowercase().starts_with(&prefix))
    }

    /// Moves `city` to the front. Returns false, leaving the history as is,
    /// when `city` is blank.
    fn promote(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }
        self.entries.retain(|entry| !same_place(entry, city));
        self.entries.insert(0, city.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        true
    }
}

impl<'a> IntoIterator for &'a SearchHistory {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Loads and persists a [`SearchHistory`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct SearchHistoryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SearchHistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted history, falling back to an empty one when the
    /// slot is missing, unreadable or malformed.
    pub fn load(&self) -> SearchHistory {
        match self.try_load() {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!("Starting with empty search history: {}", err);
                SearchHistory::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<SearchHistory, Error> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(|source| self.unavailable(source))?;

        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(SearchHistory::new());
        };

        let entries: Vec<String> =
            serde_json::from_str(&raw).map_err(|source| Error::MalformedHistoryData {
                key: self.key.clone(),
                source,
            })?;
        Ok(SearchHistory::from_entries(entries))
    }

    /// Records a search for `city` and persists the result.
    ///
    /// Blank input is ignored without touching the store. On a write failure
    /// `history` still holds the updated entries.
    pub fn record_search(&self, history: &mut SearchHistory, city: &str) -> Result<(), Error> {
        if !history.promote(city) {
            return Ok(());
        }
        self.persist(history)
    }

    /// Empties the slot, then `history`. A failed removal leaves both intact.
    pub fn clear(&self, history: &mut SearchHistory) -> Result<(), Error> {
        self.store
            .remove(&self.key)
            .map_err(|source| self.unavailable(source))?;
        history.entries.clear();
        Ok(())
    }

    fn persist(&self, history: &SearchHistory) -> Result<(), Error> {
        let serialized =
            serde_json::to_string(history).map_err(|source| self.encode_failed(source))?;
        tracing::debug!("Persisting {} history entries", history.len());
        self.store
            .set(&self.key, &serialized)
            .map_err(|source| self.unavailable(source))
    }

    fn unavailable(&self, source: io::Error) -> Error {
        Error::PersistenceUnavailable {
            key: self.key.clone(),
            source,
        }
    }

    fn encode_failed(&self, source: serde_json::Error) -> Error {
        self.unavailable(io::Error::from(source))
    }
}
