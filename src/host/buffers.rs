use std::collections::HashMap;

use tracing::debug;

use super::{Fold, Host, RegionId, RegionOption, StyleId, SurfaceId};

/// A style applied to a byte range of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRange {
    pub line: usize,
    pub start: usize,
    pub end: Option<usize>,
    pub style: StyleId,
}

/// Contents of one surface.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    pub lines: Vec<String>,
    pub styles: Vec<StyledRange>,
    pub folds: Vec<Fold>,
}

impl Buffer {
    /// Style ranges on the 0-based line `idx`.
    pub fn styles_on(&self, idx: usize) -> impl Iterator<Item = &StyledRange> {
        self.styles.iter().filter(move |s| s.line == idx)
    }

    /// Rows as they appear on screen: each closed fold collapses to one row.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::with_capacity(self.lines.len());
        let mut line = 1;
        while line <= self.lines.len() {
            match self.folds.iter().find(|(start, _)| *start == line) {
                Some(&(start, stop)) => {
                    rows.push(DisplayRow::Folded { start, stop });
                    line = stop + 1;
                }
                None => {
                    rows.push(DisplayRow::Line(line));
                    line += 1;
                }
            }
        }
        rows
    }
}

/// One visible row of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRow {
    /// A 1-based line shown as-is.
    Line(usize),
    /// A collapsed fold covering `start..=stop`.
    Folded { start: usize, stop: usize },
}

impl DisplayRow {
    pub fn contains(&self, line: usize) -> bool {
        match *self {
            DisplayRow::Line(l) => l == line,
            DisplayRow::Folded { start, stop } => (start..=stop).contains(&line),
        }
    }
}

/// State of one display region.
#[derive(Debug, Clone)]
pub struct Region {
    pub surface: Option<SurfaceId>,
    /// 1-based line, 0-based column.
    pub cursor: (usize, usize),
    pub cursor_line: bool,
    pub wrap: bool,
    /// First visible display row.
    pub scroll_offset: usize,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            surface: None,
            cursor: (1, 0),
            cursor_line: false,
            wrap: false,
            scroll_offset: 0,
        }
    }
}

/// In-memory surface store.
///
/// The terminal front end renders from it, and tests use it to observe what
/// the core asked the host to display.
#[derive(Debug)]
pub struct BufferHost {
    buffers: HashMap<SurfaceId, Buffer>,
    regions: HashMap<RegionId, Region>,
    next_surface: u32,
    focused: RegionId,
}

impl Default for BufferHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferHost {
    pub fn new() -> Self {
        let regions = RegionId::ALL
            .iter()
            .map(|r| (*r, Region::default()))
            .collect();
        Self {
            buffers: HashMap::new(),
            regions,
            next_surface: 1,
            focused: RegionId::Main,
        }
    }

    pub fn buffer(&self, surface: SurfaceId) -> Option<&Buffer> {
        self.buffers.get(&surface)
    }

    pub fn region(&self, region: RegionId) -> &Region {
        // Every region is created in `new` and never removed.
        &self.regions[&region]
    }

    fn region_mut(&mut self, region: RegionId) -> &mut Region {
        self.regions.entry(region).or_default()
    }

    /// Buffer currently bound to `region`.
    pub fn bound(&self, region: RegionId) -> Option<&Buffer> {
        self.region(region)
            .surface
            .and_then(|s| self.buffers.get(&s))
    }

    /// Lines currently shown in `region` (empty if nothing is bound).
    pub fn lines(&self, region: RegionId) -> Vec<String> {
        self.bound(region)
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    pub fn surface_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn focused(&self) -> RegionId {
        self.focused
    }

    fn line_count(&self, region: RegionId) -> usize {
        self.bound(region).map(|b| b.lines.len()).unwrap_or(0)
    }

    /// Move the cursor by `delta` lines, clamped to the bound buffer.
    ///
    /// Returns whether the cursor moved.
    pub fn move_cursor(&mut self, region: RegionId, delta: isize) -> bool {
        let count = self.line_count(region).max(1);
        let (line, col) = self.region(region).cursor;
        let target = line.saturating_add_signed(delta).clamp(1, count);
        self.region_mut(region).cursor = (target, col);
        target != line
    }

    /// Jump to the first or last line.
    pub fn cursor_to_edge(&mut self, region: RegionId, last: bool) -> bool {
        let line = if last {
            self.line_count(region).max(1)
        } else {
            1
        };
        let before = self.region(region).cursor;
        self.region_mut(region).cursor = (line, 0);
        before != (line, 0)
    }

    /// Keep the cursor row inside a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, region: RegionId, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let (cursor_line, _) = self.region(region).cursor;
        let cursor_row = self
            .bound(region)
            .map(|b| {
                b.display_rows()
                    .iter()
                    .position(|row| row.contains(cursor_line))
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        let r = self.region_mut(region);
        if cursor_row < r.scroll_offset {
            r.scroll_offset = cursor_row;
        } else if cursor_row >= r.scroll_offset + visible_height {
            r.scroll_offset = cursor_row - visible_height + 1;
        }
    }
}

impl Host for BufferHost {
    fn create_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.buffers.insert(id, Buffer::default());
        debug!(surface = id.0, "surface created");
        id
    }

    fn dispose_surface(&mut self, surface: SurfaceId) {
        self.buffers.remove(&surface);
        for region in self.regions.values_mut() {
            if region.surface == Some(surface) {
                region.surface = None;
            }
        }
        debug!(surface = surface.0, "surface disposed");
    }

    fn set_lines(&mut self, surface: SurfaceId, lines: Vec<String>) {
        let buffer = self.buffers.entry(surface).or_default();
        buffer.lines = lines;
        buffer.styles.clear();
    }

    fn set_styled_range(
        &mut self,
        surface: SurfaceId,
        line: usize,
        col_start: usize,
        col_end: Option<usize>,
        style: StyleId,
    ) {
        self.buffers
            .entry(surface)
            .or_default()
            .styles
            .push(StyledRange {
                line,
                start: col_start,
                end: col_end,
                style,
            });
    }

    fn set_folds(&mut self, surface: SurfaceId, folds: &[Fold]) {
        self.buffers.entry(surface).or_default().folds = folds.to_vec();
    }

    fn bind_surface(&mut self, region: RegionId, surface: SurfaceId) {
        let r = self.region_mut(region);
        if r.surface != Some(surface) {
            r.surface = Some(surface);
            r.scroll_offset = 0;
            r.cursor = (1, 0);
        }
    }

    fn set_cursor(&mut self, region: RegionId, line: usize, col: usize) {
        let count = self.line_count(region).max(1);
        self.region_mut(region).cursor = (line.clamp(1, count), col);
    }

    fn cursor(&self, region: RegionId) -> (usize, usize) {
        self.region(region).cursor
    }

    fn set_region_option(&mut self, region: RegionId, option: RegionOption) {
        let r = self.region_mut(region);
        match option {
            RegionOption::CursorLine(on) => r.cursor_line = on,
            RegionOption::Wrap(on) => r.wrap = on,
        }
    }

    fn focus_region(&mut self, region: RegionId) {
        self.focused = region;
    }
}
