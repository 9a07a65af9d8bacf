//! The narrow display contract between the navigation core and its host.
//!
//! The core never draws anything itself. It creates surfaces (line buffers),
//! fills them with text and style ranges, binds them to one of the three
//! regions and positions the region cursor. Whoever implements [`Host`]
//! decides how that ends up on screen.

pub mod buffers;
pub mod launcher;

/// Closed interval of 1-based line numbers hidden by a filter.
pub type Fold = (usize, usize);

/// Handle of a display surface owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// The three fixed display regions of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionId {
    Left,
    Main,
    Right,
}

impl RegionId {
    pub const ALL: [RegionId; 3] = [RegionId::Left, RegionId::Main, RegionId::Right];

    pub fn label(self) -> &'static str {
        match self {
            RegionId::Left => "left",
            RegionId::Main => "main",
            RegionId::Right => "right",
        }
    }
}

/// Semantic style of a text range. The host maps these onto colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    Message,
    Error,
    FileMeta,
    Directory,
    Symlink,
    Executable,
    Socket,
    Pipe,
    BlockDevice,
    CharDevice,
}

/// Per-region display settings a view may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOption {
    /// Persistent highlight of the cursor line.
    CursorLine(bool),
    /// Soft-wrap long lines.
    Wrap(bool),
}

/// Display-surface provider.
///
/// Line numbers passed to cursor methods are 1-based; the `line` of a
/// styled range is a 0-based index into the surface's lines and columns are
/// byte offsets. `col_end = None` styles to the end of the line.
pub trait Host {
    fn create_surface(&mut self) -> SurfaceId;
    fn dispose_surface(&mut self, surface: SurfaceId);
    /// Replace all lines of `surface`. Existing style ranges are dropped.
    fn set_lines(&mut self, surface: SurfaceId, lines: Vec<String>);
    fn set_styled_range(
        &mut self,
        surface: SurfaceId,
        line: usize,
        col_start: usize,
        col_end: Option<usize>,
        style: StyleId,
    );
    /// Replace the collapsed ranges of `surface`.
    fn set_folds(&mut self, surface: SurfaceId, folds: &[Fold]);
    fn bind_surface(&mut self, region: RegionId, surface: SurfaceId);
    fn set_cursor(&mut self, region: RegionId, line: usize, col: usize);
    fn cursor(&self, region: RegionId) -> (usize, usize);
    fn set_region_option(&mut self, region: RegionId, option: RegionOption);
    fn focus_region(&mut self, region: RegionId);
}
