use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::HistoryRangeError;

/// Location history.
///
/// Works like a web browser's: going back and then visiting a new location
/// discards everything after the current entry.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<PathBuf>,
    /// Index of the currently viewed entry, `None` while empty.
    pointer: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit to `path`.
    ///
    /// Visiting the entry the pointer is on is a no-op. Entries after the
    /// pointer are dropped before `path` is appended.
    pub fn add(&mut self, path: &Path) {
        if let Some(p) = self.pointer {
            if self.entries[p] == path {
                return;
            }
            self.entries.truncate(p + 1);
        }
        self.entries.push(path.to_path_buf());
        self.pointer = Some(self.entries.len() - 1);
    }

    /// Move `step` entries (negative = older) and return the entry there.
    ///
    /// The pointer does not move when the target is out of range.
    pub fn go(&mut self, step: isize) -> Result<PathBuf, HistoryRangeError> {
        let current = self.pointer.ok_or(HistoryRangeError)?;
        let target = current
            .checked_add_signed(step)
            .filter(|&t| t < self.entries.len())
            .ok_or(HistoryRangeError)?;
        self.pointer = Some(target);
        Ok(self.entries[target].clone())
    }

    pub fn current(&self) -> Option<&Path> {
        self.pointer.map(|p| self.entries[p].as_path())
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "History(")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if Some(i) == self.pointer {
                write!(f, "*")?;
            }
            write!(f, "{}", entry.display())?;
        }
        write!(f, ")")
    }
}
