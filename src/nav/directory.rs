//! Directory listing with a focus line and filter folds.
//!
//! Lines are 1-based and map one-to-one onto `items`. A fold is a closed
//! interval of lines hidden by the active filter. Focus never rests inside
//! a fold, and is `None` exactly when every line is hidden (an empty listing
//! included).

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PathError;
use crate::fs::access::{DirEntry, Filesystem};
use crate::host::{Fold, Host, StyleId, SurfaceId};

use super::filter::FilterMode;
use super::options::Options;

pub const EMPTY_MESSAGE: &str = "(directory empty)";

#[derive(Debug)]
pub struct DirectoryView {
    path: PathBuf,
    items: Vec<DirEntry>,
    focus: Option<usize>,
    folds: Vec<Fold>,
    query: Option<String>,
    error: Option<PathError>,
}

impl DirectoryView {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: Vec::new(),
            focus: None,
            folds: Vec::new(),
            query: None,
            error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[DirEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    /// The active filter query, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn error(&self) -> Option<&PathError> {
        self.error.as_ref()
    }

    /// Re-list the directory.
    ///
    /// Folds are dropped. Focus follows the previously focused entry by name
    /// and falls back to the first line.
    pub fn init(&mut self, fs: &dyn Filesystem, options: &Options) {
        let previous = self
            .focus
            .and_then(|f| self.items.get(f - 1))
            .map(|e| e.name.clone());

        match fs.list(&self.path) {
            Ok(mut entries) => {
                if !options.show_hidden {
                    entries.retain(|e| !e.is_hidden());
                }
                options.sort.sort(&mut entries, fs);
                self.items = entries;
                self.error = None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "listing failed");
                self.items.clear();
                self.error = Some(err);
            }
        }
        self.folds.clear();
        self.query = None;
        self.focus = if self.items.is_empty() { None } else { Some(1) };
        if let Some(name) = previous {
            if let Some(idx) = self.items.iter().position(|e| e.name == name) {
                self.focus = Some(idx + 1);
            }
        }
        debug!(
            path = %self.path.display(),
            items = self.items.len(),
            focus = ?self.focus,
            "directory listed"
        );
    }

    /// Render the listing (or its error) into `surface`.
    pub fn draw(
        &self,
        fs: &dyn Filesystem,
        options: &Options,
        host: &mut dyn Host,
        surface: SurfaceId,
    ) {
        if let Some(err) = &self.error {
            host.set_lines(surface, vec![err.to_string()]);
            host.set_styled_range(surface, 0, 0, None, StyleId::Error);
            host.set_folds(surface, &[]);
            return;
        }
        if self.items.is_empty() {
            host.set_lines(surface, vec![EMPTY_MESSAGE.to_string()]);
            host.set_styled_range(surface, 0, 0, None, StyleId::Message);
            host.set_folds(surface, &[]);
            return;
        }

        let format = options.line_format();
        let lines: Vec<_> = self
            .items
            .iter()
            .map(|e| format.format_entry(fs, e))
            .collect();
        host.set_lines(surface, lines.iter().map(|l| l.text.clone()).collect());
        for (idx, line) in lines.iter().enumerate() {
            for &(style, start, end) in &line.styles {
                host.set_styled_range(surface, idx, start, Some(end), style);
            }
        }
        host.set_folds(surface, &self.folds);
    }

    fn fold_containing(&self, line: usize) -> Option<Fold> {
        self.folds
            .iter()
            .copied()
            .find(|&(start, stop)| (start..=stop).contains(&line))
    }

    fn all_folded(&self) -> bool {
        self.items.is_empty() || self.folds == [(1, self.items.len())]
    }

    /// Move focus to `line`, escaping folds in the direction of motion.
    ///
    /// Returns `true` when the resulting focus is not `line`, i.e. the
    /// display cursor has to be re-snapped.
    pub fn set_cursor(&mut self, line: usize) -> bool {
        if self.items.is_empty() {
            self.focus = None;
            return true;
        }
        let len = self.items.len();
        let target = line.clamp(1, len);

        let new_focus = match self.fold_containing(target) {
            None => Some(target),
            Some((start, stop)) => {
                let upward = self.focus.map_or(true, |f| target < f);
                let before = start.checked_sub(1).filter(|&l| l >= 1);
                let after = Some(stop + 1).filter(|&l| l <= len);
                if upward {
                    before.or(after)
                } else {
                    after.or(before)
                }
            }
        };
        self.focus = new_focus;
        new_focus != Some(line)
    }

    /// Path of the focused entry.
    pub fn focused_item(&self) -> Option<&Path> {
        if self.all_folded() {
            return None;
        }
        self.focus
            .and_then(|f| self.items.get(f - 1))
            .map(|e| e.path.as_path())
    }

    /// Focus the entry named like the last component of `path`.
    ///
    /// Returns whether such an entry exists. An entry hidden by the filter
    /// is not focused directly; focus escapes to the nearest visible line.
    pub fn set_focused_item_by_path(&mut self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let Some(idx) = self.items.iter().position(|e| e.name.as_str() == name) else {
            return false;
        };
        self.set_cursor(idx + 1);
        true
    }

    /// Hide every maximal run of entries not matching `query`.
    ///
    /// Focus moves to the first match, or `None` if nothing matches.
    pub fn filter(&mut self, mode: FilterMode, query: &str) {
        let matcher = mode.matcher(query);
        self.folds.clear();
        let mut first_match = None;
        let mut run_start: Option<usize> = None;
        for (idx, item) in self.items.iter().enumerate() {
            if matcher.matches(&item.name) {
                first_match.get_or_insert(idx + 1);
                if let Some(start) = run_start.take() {
                    self.folds.push((start + 1, idx));
                }
            } else if run_start.is_none() {
                run_start = Some(idx);
            }
        }
        if let Some(start) = run_start {
            self.folds.push((start + 1, self.items.len()));
        }
        self.focus = first_match;
        self.query = Some(query.to_string());
        debug!(
            path = %self.path.display(),
            query,
            folds = self.folds.len(),
            focus = ?self.focus,
            "filter applied"
        );
    }

    /// Drop all folds. Focus stays where it was.
    pub fn clear_filter(&mut self) {
        self.folds.clear();
        self.query = None;
        if self.focus.is_none() && !self.items.is_empty() {
            self.focus = Some(1);
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.query.is_some()
    }
}
