use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::access::{DirEntry, Filesystem};

/// What directory entries are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive name order.
    Alpha,
    /// Newest first.
    LastModified,
    /// Smallest first.
    Size,
}

impl SortKey {
    fn name(self) -> &'static str {
        match self {
            SortKey::Alpha => "alpha",
            SortKey::LastModified => "last_modified",
            SortKey::Size => "size",
        }
    }
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub reverse: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Alpha,
            reverse: false,
        }
    }
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::new(SortKey::Alpha, false),
        SortOrder::new(SortKey::Alpha, true),
        SortOrder::new(SortKey::LastModified, false),
        SortOrder::new(SortKey::LastModified, true),
        SortOrder::new(SortKey::Size, false),
        SortOrder::new(SortKey::Size, true),
    ];

    pub const fn new(key: SortKey, reverse: bool) -> Self {
        Self { key, reverse }
    }

    /// Cycle to the next sort option.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Sort `entries` in place.
    pub fn sort(self, entries: &mut [DirEntry], fs: &dyn Filesystem) {
        match self.key {
            SortKey::Alpha => entries.sort_by(compare_names),
            SortKey::LastModified => {
                entries.sort_by(|a, b| {
                    let ma = a.stat(fs).ok().and_then(|s| s.mtime);
                    let mb = b.stat(fs).ok().and_then(|s| s.mtime);
                    mb.cmp(&ma)
                });
            }
            SortKey::Size => {
                entries.sort_by_key(|e| e.stat(fs).map(|s| s.size).unwrap_or(0));
            }
        }
        if self.reverse {
            entries.reverse();
        }
    }
}

/// Lowercased code point order, raw name as tie-break. Not locale collation.
fn compare_names(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            write!(f, "{}_reverse", self.key.name())
        } else {
            write!(f, "{}", self.key.name())
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, reverse) = match s.strip_suffix("_reverse") {
            Some(base) => (base, true),
            None => (s, false),
        };
        let key = match base {
            "alpha" | "name" => SortKey::Alpha,
            "last_modified" | "modified" => SortKey::LastModified,
            "size" => SortKey::Size,
            _ => return Err(s.to_string()),
        };
        Ok(SortOrder { key, reverse })
    }
}
