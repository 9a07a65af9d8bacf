//! Turning directory entries and file contents into display lines.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use super::access::{mode_string, DirEntry, FileKind, Filesystem, Stat};
use crate::host::StyleId;

/// Default strftime format of time columns.
pub const DEFAULT_TIME_FORMAT: &str = "%b %d %H:%M";

/// Single-child directories are followed at most this deep.
const DIR_CHAIN_DEPTH: usize = 4;

/// One metadata column of a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Mode,
    User,
    Group,
    Size,
    Mtime,
    Ino,
    Nlink,
}

impl Column {
    pub const DEFAULT: [Column; 4] = [Column::Mode, Column::User, Column::Size, Column::Mtime];

    pub fn name(self) -> &'static str {
        match self {
            Column::Mode => "mode",
            Column::User => "user",
            Column::Group => "group",
            Column::Size => "size",
            Column::Mtime => "mtime",
            Column::Ino => "ino",
            Column::Nlink => "nlink",
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mode" => Ok(Column::Mode),
            "user" => Ok(Column::User),
            "group" => Ok(Column::Group),
            "size" => Ok(Column::Size),
            "mtime" => Ok(Column::Mtime),
            "ino" => Ok(Column::Ino),
            "nlink" => Ok(Column::Nlink),
            other => Err(other.to_string()),
        }
    }
}

/// Parse a comma separated column list such as `mode,size,mtime`.
pub fn parse_columns(s: &str) -> Result<Vec<Column>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',').map(Column::from_str).collect()
}

/// Whether `fmt` is a usable strftime format.
pub fn is_valid_time_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Human readable size: `0`, `512B`, `4.0K`, `1.5M`, ...
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0".to_string();
    }
    const UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}B", bytes)
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

fn format_time(time: Option<SystemTime>, fmt: &str) -> String {
    let Some(time) = time else {
        return "?".to_string();
    };
    let dt: DateTime<Local> = time.into();
    let mut out = String::new();
    if write!(out, "{}", dt.format(fmt)).is_err() {
        return "?".to_string();
    }
    out
}

/// Column layout and time format for listing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    pub columns: Vec<Column>,
    pub time_format: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            columns: Column::DEFAULT.to_vec(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// A rendered line with its style ranges (byte offsets, end exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub text: String,
    pub styles: Vec<(StyleId, usize, usize)>,
}

/// Style for an entry based on its type and permissions.
pub fn style_for(stat: &Stat) -> Option<StyleId> {
    match stat.kind {
        FileKind::Directory => Some(StyleId::Directory),
        FileKind::Symlink => Some(StyleId::Symlink),
        FileKind::Socket => Some(StyleId::Socket),
        FileKind::Fifo => Some(StyleId::Pipe),
        FileKind::BlockDevice => Some(StyleId::BlockDevice),
        FileKind::CharDevice => Some(StyleId::CharDevice),
        FileKind::Regular if stat.is_executable() => Some(StyleId::Executable),
        FileKind::Regular | FileKind::Unknown => None,
    }
}

impl LineFormat {
    /// Format one listing line for `entry`.
    pub fn format_entry(&self, fs: &dyn Filesystem, entry: &DirEntry) -> FormattedLine {
        let stat = match entry.stat(fs) {
            Ok(stat) => stat,
            Err(err) => {
                let text = err.to_string();
                let len = text.len();
                return FormattedLine {
                    text,
                    styles: vec![(StyleId::Error, 0, len)],
                };
            }
        };

        let mut name = entry.name.clone();
        let mut extra = String::new();
        let size_str = if stat.is_dir() {
            name.push('/');
            match fs.list(&entry.path) {
                Ok(children) => {
                    if children.len() == 1 {
                        extra = single_child_chain(fs, &entry.path);
                    }
                    children.len().to_string()
                }
                Err(_) => "?".to_string(),
            }
        } else {
            if stat.kind == FileKind::Symlink {
                let target = fs
                    .read_link(&entry.path)
                    .map(|t| t.display().to_string())
                    .unwrap_or_else(|_| "?".to_string());
                extra = format!(" -> {}", target);
            }
            format_size(stat.size)
        };

        let meta = self.format_meta(stat, &size_str);
        let mut styles = Vec::new();
        let mut text = String::new();
        if !meta.is_empty() {
            text.push_str(&meta);
            text.push(' ');
        }
        let name_start = text.len();
        text.push_str(&name);
        if let Some(style) = style_for(stat) {
            styles.push((style, name_start, text.len()));
        }
        if !extra.is_empty() {
            let extra_start = text.len();
            text.push_str(&extra);
            styles.push((StyleId::FileMeta, extra_start, text.len()));
        }
        if !meta.is_empty() {
            styles.push((StyleId::FileMeta, 0, meta.len()));
        }
        FormattedLine { text, styles }
    }

    fn format_meta(&self, stat: &Stat, size_str: &str) -> String {
        let mut meta = String::new();
        for column in &self.columns {
            // Writing to a String cannot fail.
            let _ = match column {
                Column::Mode => write!(meta, "{}", mode_string(stat.kind, stat.mode)),
                Column::User => write!(meta, " {:>5}", stat.uid),
                Column::Group => write!(meta, " {:>5}", stat.gid),
                Column::Size => write!(meta, "{:>7}", size_str),
                Column::Mtime => write!(
                    meta,
                    " {:>9}",
                    format_time(stat.mtime, &self.time_format)
                ),
                Column::Ino => write!(meta, " {}", stat.inode),
                Column::Nlink => write!(meta, " {}", stat.nlink),
            };
        }
        meta
    }
}

/// Names along a chain of directories that each contain exactly one entry,
/// e.g. `inner/deeper/` for `dir -> inner -> deeper -> (several)`.
fn single_child_chain(fs: &dyn Filesystem, dir: &Path) -> String {
    let mut chain = String::new();
    let mut current = dir.to_path_buf();
    for _ in 0..DIR_CHAIN_DEPTH {
        let Ok(children) = fs.list(&current) else {
            break;
        };
        let [only] = children.as_slice() else {
            break;
        };
        chain.push_str(&only.name);
        let is_dir = fs
            .stat(&only.path, true)
            .map(|s| s.is_dir())
            .unwrap_or(false);
        if !is_dir {
            break;
        }
        chain.push('/');
        current = only.path.clone();
    }
    chain
}

/// xxd-style hexdump of `data`.
pub fn hexdump(data: &[u8], columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    data.chunks(columns)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("{:08x}:", i * columns);
            for (j, byte) in chunk.iter().enumerate() {
                if j % 2 == 0 {
                    line.push(' ');
                }
                let _ = write!(line, "{:02x}", byte);
            }
            // Pad short final rows so the text column lines up.
            let hex_width = columns * 2 + columns.div_ceil(2);
            let used = chunk.len() * 2 + chunk.len().div_ceil(2);
            line.push_str(&" ".repeat(hex_width - used + 2));
            line.extend(chunk.iter().map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            }));
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::access::LocalFs;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn entry(dir: &TempDir, name: &str) -> DirEntry {
        DirEntry::new(dir.path().join(name))
    }

    fn name_only() -> LineFormat {
        LineFormat {
            columns: Vec::new(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(4096), "4.0K");
        assert_eq!(format_size(1536 * 1024), "1.5M");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn parse_columns_list() {
        assert_eq!(
            parse_columns("mode, size,mtime").unwrap(),
            vec![Column::Mode, Column::Size, Column::Mtime]
        );
        assert_eq!(parse_columns("").unwrap(), Vec::<Column>::new());
        assert_eq!(parse_columns("mode,colour"), Err("colour".to_string()));
    }

    #[test]
    fn time_format_validation() {
        assert!(is_valid_time_format("%Y-%m-%d"));
        assert!(is_valid_time_format(DEFAULT_TIME_FORMAT));
        assert!(!is_valid_time_format("%Q"));
    }

    #[test]
    fn directory_line_has_slash_and_count() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("a"), "").unwrap();
        fs::write(dir.path().join("sub").join("b"), "").unwrap();
        let fmt = LineFormat {
            columns: vec![Column::Size],
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        };
        let line = fmt.format_entry(&LocalFs, &entry(&dir, "sub"));
        assert_eq!(line.text, "      2 sub/");
        assert!(line.styles.contains(&(StyleId::Directory, 8, 12)));
        assert!(line.styles.contains(&(StyleId::FileMeta, 0, 7)));
    }

    #[test]
    fn single_child_directories_are_chained() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("aa").join("aa_aa");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("aa_aa_f"), "").unwrap();
        let line = name_only().format_entry(&LocalFs, &entry(&dir, "aa"));
        assert_eq!(line.text, "aa/aa_aa/aa_aa_f");
        assert!(line.styles.contains(&(StyleId::FileMeta, 3, 16)));
    }

    #[test]
    fn symlink_line_shows_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("target.txt"), "x").unwrap();
        symlink("target.txt", dir.path().join("link")).unwrap();
        let line = name_only().format_entry(&LocalFs, &entry(&dir, "link"));
        assert_eq!(line.text, "link -> target.txt");
        assert_eq!(line.styles[0], (StyleId::Symlink, 0, 4));
    }

    #[test]
    fn regular_file_has_no_name_style() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain"), "hello").unwrap();
        let fmt = LineFormat {
            columns: vec![Column::Size],
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        };
        let line = fmt.format_entry(&LocalFs, &entry(&dir, "plain"));
        assert_eq!(line.text, "     5B plain");
        assert_eq!(line.styles, vec![(StyleId::FileMeta, 0, 7)]);
    }

    #[test]
    fn default_columns_start_with_mode() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f"), "").unwrap();
        let line = LineFormat::default().format_entry(&LocalFs, &entry(&dir, "f"));
        assert!(line.text.starts_with("-rw"));
        assert!(line.text.ends_with(" f"));
    }

    #[test]
    fn hexdump_layout() {
        let lines = hexdump(b"Hello, world!\x00\x01\x02xyz", 16);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "00000000: 4865 6c6c 6f2c 2077 6f72 6c64 2100 0102  Hello, world!..."
        );
        assert!(lines[1].starts_with("00000010: 7879 7a "));
        assert!(lines[1].ends_with(" xyz"));
        assert_eq!(lines[1].find("xyz"), lines[0].find("Hello"));
    }
}
