use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PathError;
use crate::fs::access::Filesystem;
use crate::fs::format::hexdump;
use crate::host::{Host, RegionId, RegionOption, StyleId, SurfaceId};

use super::bus::EmitterKind;
use super::directory::DirectoryView;
use super::options::Options;

pub const NOTHING_MESSAGE: &str = "(nothing to show)";
pub const FILE_EMPTY_MESSAGE: &str = "(file empty)";
const HEXDUMP_COLUMNS: usize = 16;

/// Cache key of a view. `None` means "nothing to show".
pub type ViewKey = Option<PathBuf>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// What a view owes before it is shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dirty {
    Clean,
    Redraw,
    Init,
}

#[derive(Debug)]
pub struct View {
    pub id: ViewId,
    pub key: ViewKey,
    pub surface: SurfaceId,
    pub dirty: Dirty,
    pub kind: ViewKind,
}

#[derive(Debug)]
pub enum ViewKind {
    Directory(DirectoryView),
    File(FileView),
    Message(MessageView),
    Empty,
}

/// Preview of a regular file.
#[derive(Debug, Default)]
pub struct FileView {
    path: PathBuf,
    lines: Vec<String>,
    style: Option<StyleId>,
}

/// Fixed text, optionally styled as a whole.
#[derive(Debug, Clone)]
pub struct MessageView {
    text: String,
    style: StyleId,
}

impl MessageView {
    pub fn new(text: impl Into<String>, style: StyleId) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn error(err: &PathError) -> Self {
        Self::new(err.to_string(), StyleId::Error)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl FileView {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Read the head of the file into preview lines.
    pub fn init(&mut self, fs: &dyn Filesystem, options: &Options) {
        self.style = None;
        let limit = options.preview_size_limit;
        let mut data = match fs.read_bytes(&self.path, limit.saturating_add(1)) {
            Ok(data) => data,
            Err(err) => {
                self.lines = vec![err.to_string()];
                self.style = Some(StyleId::Error);
                return;
            }
        };
        if data.is_empty() {
            self.lines = vec![FILE_EMPTY_MESSAGE.to_string()];
            self.style = Some(StyleId::Message);
            return;
        }
        let truncated = data.len() > limit;
        data.truncate(limit);

        self.lines = match std::str::from_utf8(&data) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            // A multi-byte character cut off by the read limit.
            Err(e) if truncated && e.error_len().is_none() => {
                String::from_utf8_lossy(&data[..e.valid_up_to()])
                    .lines()
                    .map(str::to_string)
                    .collect()
            }
            Err(_) => {
                let shown = data.len().min(options.hexdump_limit);
                hexdump(&data[..shown], HEXDUMP_COLUMNS)
            }
        };
        if truncated {
            self.lines.push("...".to_string());
        }
    }
}

impl View {
    pub fn new(id: ViewId, key: ViewKey, surface: SurfaceId, kind: ViewKind) -> Self {
        Self {
            id,
            key,
            surface,
            dirty: Dirty::Init,
            kind,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.key.as_deref()
    }

    pub fn emitter_kind(&self) -> EmitterKind {
        match self.kind {
            ViewKind::Directory(_) => EmitterKind::DirectoryView,
            ViewKind::File(_) => EmitterKind::FileView,
            ViewKind::Message(_) => EmitterKind::MessageView,
            ViewKind::Empty => EmitterKind::EmptyView,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryView> {
        match &self.kind {
            ViewKind::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut DirectoryView> {
        match &mut self.kind {
            ViewKind::Directory(d) => Some(d),
            _ => None,
        }
    }

    /// Raise the dirty level, never lowering it.
    pub fn mark(&mut self, level: Dirty) {
        self.dirty = self.dirty.max(level);
    }

    /// Run whatever initialization and drawing is owed, then mark clean.
    pub fn prepare(&mut self, fs: &dyn Filesystem, options: &Options, host: &mut dyn Host) {
        if self.dirty >= Dirty::Init {
            self.init(fs, options);
        }
        if self.dirty >= Dirty::Redraw {
            self.draw(fs, options, host);
        }
        self.dirty = Dirty::Clean;
    }

    fn init(&mut self, fs: &dyn Filesystem, options: &Options) {
        debug!(view = self.id.0, key = ?self.key, "init");
        match &mut self.kind {
            ViewKind::Directory(d) => d.init(fs, options),
            ViewKind::File(f) => f.init(fs, options),
            ViewKind::Message(_) | ViewKind::Empty => {}
        }
    }

    /// Write the view's lines, styles and folds to its surface.
    pub fn draw(&self, fs: &dyn Filesystem, options: &Options, host: &mut dyn Host) {
        debug!(view = self.id.0, key = ?self.key, "draw");
        let surface = self.surface;
        match &self.kind {
            ViewKind::Directory(d) => d.draw(fs, options, host, surface),
            ViewKind::File(f) => {
                host.set_lines(surface, f.lines.clone());
                if let Some(style) = f.style {
                    host.set_styled_range(surface, 0, 0, None, style);
                }
                host.set_folds(surface, &[]);
            }
            ViewKind::Message(m) => {
                let lines: Vec<String> = m.text.lines().map(str::to_string).collect();
                let count = lines.len();
                host.set_lines(surface, lines);
                for idx in 0..count {
                    host.set_styled_range(surface, idx, 0, None, m.style);
                }
                host.set_folds(surface, &[]);
            }
            ViewKind::Empty => {
                host.set_lines(surface, vec![NOTHING_MESSAGE.to_string()]);
                host.set_styled_range(surface, 0, 0, None, StyleId::Message);
                host.set_folds(surface, &[]);
            }
        }
    }

    /// Apply the region settings this view wants while it is shown.
    pub fn configure_region(&self, host: &mut dyn Host, region: RegionId) {
        let (cursor_line, wrap) = match &self.kind {
            ViewKind::Directory(d) => (!d.is_empty(), false),
            ViewKind::File(_) => (false, false),
            ViewKind::Message(_) | ViewKind::Empty => (false, true),
        };
        host.set_region_option(region, RegionOption::CursorLine(cursor_line));
        host.set_region_option(region, RegionOption::Wrap(wrap));
    }

    /// Release per-view state when a panel stops showing this view.
    pub fn unload(&mut self, host: &mut dyn Host) {
        let surface = self.surface;
        if let ViewKind::Directory(d) = &mut self.kind {
            if d.is_filtered() {
                d.clear_filter();
                host.set_folds(surface, &[]);
            }
        }
    }

    /// Cursor position (1-based line, column) the panel should apply.
    pub fn cursor(&self) -> Option<(usize, usize)> {
        match &self.kind {
            ViewKind::Directory(d) => d.focus().map(|f| (f, 0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::access::LocalFs;
    use crate::host::buffers::BufferHost;
    use std::fs;
    use tempfile::TempDir;

    fn file_view(dir: &TempDir, name: &str, options: &Options) -> FileView {
        let mut view = FileView::new(dir.path().join(name));
        view.init(&LocalFs, options);
        view
    }

    #[test]
    fn file_preview_reads_text_lines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let view = file_view(&dir, "a.txt", &Options::default());
        assert_eq!(view.lines(), &["one", "two"]);
    }

    #[test]
    fn empty_file_preview() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty"), "").unwrap();
        let view = file_view(&dir, "empty", &Options::default());
        assert_eq!(view.lines(), &[FILE_EMPTY_MESSAGE]);
        assert_eq!(view.style, Some(StyleId::Message));
    }

    #[test]
    fn long_file_is_truncated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("long"), "abcdef\nghijkl\n").unwrap();
        let opts = Options {
            preview_size_limit: 9,
            ..Options::default()
        };
        let view = file_view(&dir, "long", &opts);
        assert_eq!(view.lines(), &["abcdef", "gh", "..."]);
    }

    #[test]
    fn cut_multibyte_char_is_not_binary() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("utf8"), "aé").unwrap();
        let opts = Options {
            preview_size_limit: 2,
            ..Options::default()
        };
        let view = file_view(&dir, "utf8", &opts);
        assert_eq!(view.lines(), &["a", "..."]);
    }

    #[test]
    fn binary_file_is_hexdumped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin"), [0xff_u8, 0xfe, 0x00, 0x41]).unwrap();
        let view = file_view(&dir, "bin", &Options::default());
        assert_eq!(view.lines().len(), 1);
        assert!(view.lines()[0].starts_with("00000000: fffe 0041"));
    }

    #[test]
    fn unreadable_file_shows_error() {
        let dir = TempDir::new().unwrap();
        let view = file_view(&dir, "missing", &Options::default());
        assert_eq!(view.style, Some(StyleId::Error));
        assert!(view.lines()[0].contains("No such file"));
    }

    #[test]
    fn prepare_runs_owed_steps_once() {
        let mut host = BufferHost::new();
        let surface = host.create_surface();
        let mut view = View::new(
            ViewId(1),
            None,
            surface,
            ViewKind::Message(MessageView::new("line one\nline two", StyleId::Error)),
        );
        view.prepare(&LocalFs, &Options::default(), &mut host);
        assert_eq!(view.dirty, Dirty::Clean);
        let buffer = host.buffer(surface).unwrap();
        assert_eq!(buffer.lines, vec!["line one", "line two"]);
        assert_eq!(buffer.styles.len(), 2);

        view.mark(Dirty::Redraw);
        view.mark(Dirty::Clean);
        assert_eq!(view.dirty, Dirty::Redraw);
    }

    #[test]
    fn message_views_wrap_and_hide_cursor_line() {
        let mut host = BufferHost::new();
        let surface = host.create_surface();
        let view = View::new(ViewId(1), None, surface, ViewKind::Empty);
        view.configure_region(&mut host, RegionId::Right);
        let region = host.region(RegionId::Right);
        assert!(region.wrap);
        assert!(!region.cursor_line);
        assert_eq!(view.emitter_kind(), EmitterKind::EmptyView);
        assert_eq!(view.cursor(), None);
    }
}
