use ratatui::{
    buffer::Buffer as TermBuffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::host::buffers::{Buffer, DisplayRow, Region};
use crate::theme::ThemeColors;

/// Renders the surface bound to one region.
///
/// Rows hidden by a filter show as a single dim marker. The caller keeps
/// `region.scroll_offset` current via `BufferHost::update_scroll`.
pub struct PaneWidget<'a> {
    buffer: Option<&'a Buffer>,
    region: &'a Region,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PaneWidget<'a> {
    pub fn new(buffer: Option<&'a Buffer>, region: &'a Region, theme: &'a ThemeColors) -> Self {
        Self {
            buffer,
            region,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Split line `n` (1-based) into spans along its style ranges.
    fn styled_line(&self, buffer: &'a Buffer, n: usize) -> Line<'a> {
        let Some(text) = buffer.lines.get(n - 1) else {
            return Line::default();
        };
        let mut ranges: Vec<_> = buffer.styles_on(n - 1).collect();
        ranges.sort_by_key(|r| r.start);

        let mut spans = Vec::new();
        let mut pos = 0;
        for range in ranges {
            let start = range.start.min(text.len());
            let end = range.end.unwrap_or(text.len()).min(text.len());
            if start < pos || end <= start {
                continue;
            }
            if let Some(plain) = text.get(pos..start) {
                if !plain.is_empty() {
                    spans.push(Span::styled(plain, self.theme.text()));
                }
            }
            match text.get(start..end) {
                Some(styled) => spans.push(Span::styled(styled, self.theme.style(range.style))),
                None => continue,
            }
            pos = end;
        }
        if let Some(rest) = text.get(pos..) {
            if !rest.is_empty() {
                spans.push(Span::styled(rest, self.theme.text()));
            }
        }
        Line::from(spans)
    }

    fn fold_line(&self, start: usize, stop: usize) -> Line<'a> {
        let hidden = stop + 1 - start;
        Line::from(Span::styled(
            format!("··· {hidden} hidden"),
            self.theme.fold(),
        ))
    }
}

impl<'a> Widget for PaneWidget<'a> {
    fn render(self, area: Rect, buf: &mut TermBuffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        let height = inner.height as usize;
        let Some(buffer) = self.buffer else {
            return;
        };
        if height == 0 {
            return;
        }

        let rows = buffer.display_rows();
        let (cursor_line, _) = self.region.cursor;
        let mut cursor_row = None;
        let mut lines = Vec::with_capacity(height);
        for (i, row) in rows
            .iter()
            .skip(self.region.scroll_offset)
            .take(height)
            .enumerate()
        {
            if row.contains(cursor_line) {
                cursor_row = Some(i);
            }
            lines.push(match *row {
                DisplayRow::Line(n) => self.styled_line(buffer, n),
                DisplayRow::Folded { start, stop } => self.fold_line(start, stop),
            });
        }

        let mut paragraph = Paragraph::new(lines).style(self.theme.text());
        if self.region.wrap {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        paragraph.render(inner, buf);

        if self.region.cursor_line && !self.region.wrap {
            if let Some(row) = cursor_row {
                let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
                buf.set_style(line_area, self.theme.cursor_line());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::buffers::StyledRange;
    use crate::host::StyleId;
    use crate::theme;

    fn row_text(buf: &TermBuffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn sample() -> Buffer {
        Buffer {
            lines: vec!["a.txt".into(), "b.txt".into(), "c.txt".into(), "d.txt".into()],
            styles: vec![StyledRange {
                line: 3,
                start: 0,
                end: Some(1),
                style: StyleId::Directory,
            }],
            folds: vec![(2, 3)],
        }
    }

    #[test]
    fn test_folded_rows_collapse_to_marker() {
        let tc = theme::dark_theme();
        let buffer = sample();
        let region = Region::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = TermBuffer::empty(area);
        PaneWidget::new(Some(&buffer), &region, &tc).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0, 20), "a.txt");
        assert_eq!(row_text(&buf, 1, 20), "··· 2 hidden");
        assert_eq!(row_text(&buf, 2, 20), "d.txt");
        assert_eq!(row_text(&buf, 3, 20), "");
    }

    #[test]
    fn test_style_ranges_applied() {
        let tc = theme::dark_theme();
        let buffer = sample();
        let region = Region::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = TermBuffer::empty(area);
        PaneWidget::new(Some(&buffer), &region, &tc).render(area, &mut buf);

        assert_eq!(buf.cell((0, 2)).unwrap().fg, tc.directory_fg);
        assert_eq!(buf.cell((1, 2)).unwrap().fg, tc.fg);
    }

    #[test]
    fn test_cursor_line_highlight() {
        let tc = theme::dark_theme();
        let buffer = sample();
        let region = Region {
            cursor: (4, 0),
            cursor_line: true,
            ..Region::default()
        };
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = TermBuffer::empty(area);
        PaneWidget::new(Some(&buffer), &region, &tc).render(area, &mut buf);

        assert_eq!(buf.cell((15, 2)).unwrap().bg, tc.cursor_line_bg);
        assert_ne!(buf.cell((15, 0)).unwrap().bg, tc.cursor_line_bg);
    }

    #[test]
    fn test_scroll_offset_skips_rows() {
        let tc = theme::dark_theme();
        let buffer = sample();
        let region = Region {
            scroll_offset: 1,
            ..Region::default()
        };
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = TermBuffer::empty(area);
        PaneWidget::new(Some(&buffer), &region, &tc).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0, 20), "··· 2 hidden");
    }

    #[test]
    fn test_unbound_region_renders_nothing() {
        let tc = theme::dark_theme();
        let region = Region::default();
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = TermBuffer::empty(area);
        PaneWidget::new(None, &region, &tc).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0, 10), "");
    }
}
