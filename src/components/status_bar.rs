use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::nav::Status;
use crate::theme::ThemeColors;

/// One-line summary of the main panel, or a transient message.
pub struct StatusBarWidget<'a> {
    status: &'a Status,
    theme: &'a ThemeColors,
    message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(status: &'a Status, theme: &'a ThemeColors) -> Self {
        Self {
            status,
            theme,
            message: None,
            is_error: false,
        }
    }

    pub fn message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.message = Some(msg);
        self.is_error = is_error;
        self
    }

    /// Position, filter and sort, shown on the right.
    fn info(&self) -> String {
        let position = match self.status.focus {
            Some(focus) => format!("{focus}/{}", self.status.count),
            None => format!("-/{}", self.status.count),
        };
        match &self.status.query {
            Some(query) => format!(" /{query}  {position}  {} ", self.status.sort),
            None => format!(" {position}  {} ", self.status.sort),
        }
    }
}

/// Keep the tail of `text` within `budget` characters.
fn truncate_left(text: &str, budget: usize) -> String {
    let len = text.chars().count();
    if len <= budget {
        return text.to_string();
    }
    if budget <= 3 {
        return text.chars().skip(len - budget).collect();
    }
    let tail: String = text.chars().skip(len - (budget - 3)).collect();
    format!("...{tail}")
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), base);

        if let Some(msg) = self.message {
            let style = if self.is_error {
                base.fg(self.theme.error_fg).add_modifier(Modifier::BOLD)
            } else {
                base.fg(self.theme.accent_fg)
            };
            let line = Line::from(Span::styled(truncate_left(msg, width), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let info = self.info();
        let info_len = info.chars().count();
        let path = self
            .status
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let item = self.status.item.as_deref().unwrap_or("");
        let left = if item.is_empty() || path == "/" {
            format!(" {path}{item}")
        } else {
            format!(" {path}/{item}")
        };
        let left = truncate_left(&left, width.saturating_sub(info_len));
        let gap = width
            .saturating_sub(left.chars().count())
            .saturating_sub(info_len);

        let line = Line::from(vec![
            Span::styled(left, base.add_modifier(Modifier::BOLD)),
            Span::styled(" ".repeat(gap), base),
            Span::styled(info, base.fg(self.theme.accent_fg)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
