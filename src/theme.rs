//! Color palettes and the mapping from semantic styles to terminal styles.
//!
//! Two built-in palettes (dark and light) are provided; the config picks one
//! by name.

use ratatui::style::{Color, Modifier, Style};

use crate::host::StyleId;

/// All runtime colors used in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub fg: Color,
    pub bg: Color,
    pub cursor_line_bg: Color,

    // Entry kinds
    pub directory_fg: Color,
    pub symlink_fg: Color,
    pub executable_fg: Color,
    pub socket_fg: Color,
    pub pipe_fg: Color,
    pub device_fg: Color,
    pub meta_fg: Color,

    // Messages
    pub message_fg: Color,
    pub error_fg: Color,
    pub fold_fg: Color,

    // Chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub accent_fg: Color,
}

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        fg: Color::Rgb(205, 214, 244),             // #cdd6f4 (text)
        bg: Color::Reset,
        cursor_line_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        directory_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        symlink_fg: Color::Rgb(148, 226, 213),     // #94e2d5 (teal)
        executable_fg: Color::Rgb(166, 227, 161),  // #a6e3a1 (green)
        socket_fg: Color::Rgb(203, 166, 247),      // #cba6f7 (mauve)
        pipe_fg: Color::Rgb(249, 226, 175),        // #f9e2af (yellow)
        device_fg: Color::Rgb(250, 179, 135),      // #fab387 (peach)
        meta_fg: Color::Rgb(108, 112, 134),        // #6c7086 (overlay0)
        message_fg: Color::Rgb(147, 153, 178),     // #9399b2 (overlay2)
        error_fg: Color::Rgb(243, 139, 168),       // #f38ba8 (red)
        fold_fg: Color::Rgb(88, 91, 112),          // #585b70 (surface2)
        border_fg: Color::Rgb(88, 91, 112),
        border_focused_fg: Color::Rgb(137, 180, 250),
        status_bg: Color::Rgb(30, 30, 46),         // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),
        accent_fg: Color::Rgb(203, 166, 247),
    }
}

/// Light theme using the Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        fg: Color::Rgb(76, 79, 105),               // #4c4f69 (text)
        bg: Color::Reset,
        cursor_line_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        directory_fg: Color::Rgb(30, 102, 245),    // #1e66f5 (blue)
        symlink_fg: Color::Rgb(23, 146, 153),      // #179299 (teal)
        executable_fg: Color::Rgb(64, 160, 43),    // #40a02b (green)
        socket_fg: Color::Rgb(136, 57, 239),       // #8839ef (mauve)
        pipe_fg: Color::Rgb(223, 142, 29),         // #df8e1d (yellow)
        device_fg: Color::Rgb(254, 100, 11),       // #fe640b (peach)
        meta_fg: Color::Rgb(156, 160, 176),        // #9ca0b0 (overlay0)
        message_fg: Color::Rgb(124, 127, 147),     // #7c7f93 (overlay2)
        error_fg: Color::Rgb(210, 15, 57),         // #d20f39 (red)
        fold_fg: Color::Rgb(172, 176, 190),        // #acb0be (surface2)
        border_fg: Color::Rgb(172, 176, 190),
        border_focused_fg: Color::Rgb(30, 102, 245),
        status_bg: Color::Rgb(239, 241, 245),      // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),
        accent_fg: Color::Rgb(136, 57, 239),
    }
}

/// Pick a palette by scheme name. Unknown names fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme.to_lowercase().as_str() {
        "light" => light_theme(),
        "dark" => dark_theme(),
        other => {
            tracing::warn!(scheme = other, "unknown color scheme, using dark");
            dark_theme()
        }
    }
}

impl ThemeColors {
    /// Base style for plain text.
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Terminal style for a semantic style id.
    pub fn style(&self, id: StyleId) -> Style {
        let fg = match id {
            StyleId::Message => {
                return Style::default()
                    .fg(self.message_fg)
                    .add_modifier(Modifier::ITALIC)
            }
            StyleId::Error => {
                return Style::default()
                    .fg(self.error_fg)
                    .add_modifier(Modifier::BOLD)
            }
            StyleId::FileMeta => self.meta_fg,
            StyleId::Directory => {
                return Style::default()
                    .fg(self.directory_fg)
                    .add_modifier(Modifier::BOLD)
            }
            StyleId::Symlink => self.symlink_fg,
            StyleId::Executable => self.executable_fg,
            StyleId::Socket => self.socket_fg,
            StyleId::Pipe => self.pipe_fg,
            StyleId::BlockDevice | StyleId::CharDevice => self.device_fg,
        };
        Style::default().fg(fg)
    }

    /// Style of a collapsed-rows marker.
    pub fn fold(&self) -> Style {
        Style::default()
            .fg(self.fold_fg)
            .add_modifier(Modifier::DIM)
    }

    pub fn cursor_line(&self) -> Style {
        Style::default().bg(self.cursor_line_bg)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused_fg)
        } else {
            Style::default().fg(self.border_fg)
        }
    }
}
