//! Ordered list of SKK dictionary sources and its on-disk form.
//!
//! Order is lookup priority. The list is loaded wholesale from the flat
//! file, edited in memory, and written back with an atomic replace
//! (write `.tmp`, then rename). Lines that do not describe a valid record
//! are dropped on load; that is never an error.

pub mod format;
mod record;

pub use record::{DictRecord, FileMode, RecordError, DEFAULT_ENCODING};

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Factory dictionary list shipped with the crate.
pub const DEFAULT_DICTIONARY_LIST: &str = include_str!("default_dictionary_list");

#[derive(Debug, thiserror::Error)]
pub enum DictListError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Change notification delivered to observers after the list is modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The whole list was replaced (load or defaults).
    Reset,
    Inserted { index: usize },
    Removed { index: usize, count: usize },
    Moved { from: usize, to: usize },
}

type Observer = Box<dyn FnMut(&ListChange)>;

#[derive(Default)]
pub struct DictList {
    records: Vec<DictRecord>,
    modified: bool,
    observers: Vec<Observer>,
}

impl DictList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DictRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Register a callback run after every successful change.
    pub fn subscribe(&mut self, observer: impl FnMut(&ListChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DictRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DictRecord> {
        self.records.get(index)
    }

    /// Whether the list differs from what was last loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Replace the list with the records parsed from `content`.
    /// Returns the number of records accepted.
    pub fn load_str(&mut self, content: &str) -> usize {
        self.replace(format::parse(content));
        self.modified = false;
        self.records.len()
    }

    /// Replace the list with everything `reader` yields.
    ///
    /// Invalid UTF-8 is replaced, not rejected. On a read error the list is
    /// left as it was.
    pub fn load_reader(&mut self, reader: impl BufRead) -> io::Result<usize> {
        let content = read_lossy(reader)?;
        Ok(self.load_str(&content))
    }

    /// Replace the list with the contents of `path`.
    ///
    /// If the file cannot be read the list is left as it was.
    pub fn load_path(&mut self, path: &Path) -> Result<usize, DictListError> {
        let content = read_file(path)?;
        let count = self.load_str(&content);
        debug!(path = %path.display(), count, "loaded dictionary list");
        Ok(count)
    }

    /// Replace the list with the built-in factory defaults.
    pub fn defaults(&mut self) -> usize {
        self.replace(format::parse(DEFAULT_DICTIONARY_LIST));
        self.modified = true;
        self.records.len()
    }

    /// Replace the list with an installed default template.
    ///
    /// If the template cannot be read the list is left as it was.
    pub fn defaults_from(&mut self, template: &Path) -> Result<usize, DictListError> {
        let content = read_file(template)?;
        self.replace(format::parse(&content));
        self.modified = true;
        Ok(self.records.len())
    }

    /// Flat-file form of the whole list.
    pub fn serialize(&self) -> String {
        format::serialize(&self.records)
    }

    /// Atomic write: write to a sibling `.tmp` file, then rename over `path`.
    ///
    /// On failure the previous file is left untouched.
    pub fn save(&mut self, path: &Path) -> Result<(), DictListError> {
        let write_err = |source| DictListError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = tmp_path(path);
        if let Err(e) = fs::write(&tmp, self.serialize()).and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        self.modified = false;
        info!(path = %path.display(), count = self.records.len(), "saved dictionary list");
        Ok(())
    }

    /// Append a record at the lowest priority.
    pub fn add(&mut self, record: DictRecord) {
        self.records.push(record);
        let index = self.records.len() - 1;
        self.changed(ListChange::Inserted { index });
    }

    /// Remove `count` records starting at `index`.
    /// Returns `false` and does nothing if the range is empty or out of bounds.
    pub fn remove_at(&mut self, index: usize, count: usize) -> bool {
        let in_range = index
            .checked_add(count)
            .is_some_and(|end| end <= self.records.len());
        if count == 0 || !in_range {
            return false;
        }
        self.records.drain(index..index + count);
        self.changed(ListChange::Removed { index, count });
        true
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.remove_at(index, 1)
    }

    /// Swap the record at `index` with the one above it.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.records.len() {
            return false;
        }
        self.records.swap(index - 1, index);
        self.changed(ListChange::Moved {
            from: index,
            to: index - 1,
        });
        true
    }

    /// Swap the record at `index` with the one below it.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.records.len().saturating_sub(1) {
            return false;
        }
        self.records.swap(index, index + 1);
        self.changed(ListChange::Moved {
            from: index,
            to: index + 1,
        });
        true
    }

    /// Label shown for the record at `index`: its path, or `host:port`.
    pub fn display_label(&self, index: usize) -> Option<String> {
        self.records.get(index).map(DictRecord::label)
    }

    fn replace(&mut self, records: Vec<DictRecord>) {
        self.records = records;
        self.notify(ListChange::Reset);
    }

    fn changed(&mut self, change: ListChange) {
        self.modified = true;
        self.notify(change);
    }

    fn notify(&mut self, change: ListChange) {
        for observer in &mut self.observers {
            observer(&change);
        }
    }
}

fn read_lossy(mut reader: impl BufRead) -> io::Result<String> {
    let mut content = String::new();
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line)? > 0 {
        content.push_str(&String::from_utf8_lossy(&line));
        line.clear();
    }
    Ok(content)
}

fn read_file(path: &Path) -> Result<String, DictListError> {
    let read_err = |source| DictListError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    read_lossy(BufReader::new(file)).map_err(read_err)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
