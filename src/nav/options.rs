use crate::error::OptionError;
use crate::fs::format::{is_valid_time_format, parse_columns, Column, LineFormat, DEFAULT_TIME_FORMAT};
use crate::fs::sort::SortOrder;

use super::filter::FilterMode;
use super::view::Dirty;

/// Runtime options of a browsing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub sort: SortOrder,
    pub columns: Vec<Column>,
    pub time_format: String,
    pub show_hidden: bool,
    pub filter_mode: FilterMode,
    /// Bytes of a file read for its preview.
    pub preview_size_limit: usize,
    /// Bytes shown when a preview falls back to a hexdump.
    pub hexdump_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            columns: Column::DEFAULT.to_vec(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            show_hidden: false,
            filter_mode: FilterMode::default(),
            preview_size_limit: 100_000,
            hexdump_limit: 4096,
        }
    }
}

impl Options {
    pub const KEYS: [&'static str; 5] = ["sort", "columns", "time_format", "hidden", "filter_mode"];

    pub fn line_format(&self) -> LineFormat {
        LineFormat {
            columns: self.columns.clone(),
            time_format: self.time_format.clone(),
        }
    }

    /// Set option `key` from its textual form.
    ///
    /// Returns how stale directory views become: sort and hidden changes
    /// need a re-list, column and time format changes only a redraw.
    pub fn set(&mut self, key: &str, value: &str) -> Result<Dirty, OptionError> {
        let invalid = || OptionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "sort" => {
                self.sort = value.parse().map_err(|_| invalid())?;
                Ok(Dirty::Init)
            }
            "columns" => {
                self.columns = parse_columns(value).map_err(|_| invalid())?;
                Ok(Dirty::Redraw)
            }
            "time_format" => {
                if !is_valid_time_format(value) {
                    return Err(invalid());
                }
                self.time_format = value.to_string();
                Ok(Dirty::Redraw)
            }
            "hidden" => {
                self.show_hidden = value.parse().map_err(|_| invalid())?;
                Ok(Dirty::Init)
            }
            "filter_mode" => {
                self.filter_mode = value.parse().map_err(|_| invalid())?;
                Ok(Dirty::Clean)
            }
            _ => Err(OptionError::UnknownKey(key.to_string())),
        }
    }

    /// Current value of `key` in the form `set` accepts.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "sort" => Some(self.sort.to_string()),
            "columns" => Some(
                self.columns
                    .iter()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "time_format" => Some(self.time_format.clone()),
            "hidden" => Some(self.show_hidden.to_string()),
            "filter_mode" => Some(self.filter_mode.to_string()),
            _ => None,
        }
    }
}
