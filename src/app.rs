use std::path::Path;
use std::time::Instant;

use tracing::warn;

use crate::host::buffers::BufferHost;
use crate::host::RegionId;
use crate::nav::{EnterTarget, Entered, HostEvent, Session};
use crate::theme::ThemeColors;

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Typing a filter query for the main panel.
    Filter,
}

/// Text being typed into the prompt line.
#[derive(Debug, Default)]
pub struct PromptState {
    pub input: String,
    pub cursor_position: usize,
    /// Query that was active when the prompt opened, restored on cancel.
    previous: Option<String>,
}

/// Main application state.
pub struct App {
    pub session: Session<BufferHost>,
    pub theme: ThemeColors,
    pub should_quit: bool,
    pub mode: AppMode,
    pub prompt: PromptState,
    /// Message, whether it is an error, and when it was set.
    pub status_message: Option<(String, bool, Instant)>,
}

impl App {
    pub fn new(session: Session<BufferHost>, theme: ThemeColors) -> Self {
        Self {
            session,
            theme,
            should_quit: false,
            mode: AppMode::Normal,
            prompt: PromptState::default(),
            status_message: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, false, Instant::now()));
    }

    pub fn set_error(&mut self, msg: String) {
        warn!(%msg, "shown to user");
        self.status_message = Some((msg, true, Instant::now()));
    }

    /// Clear the status message once it has been up for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Move the main cursor by `delta` lines.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.session.host_mut().move_cursor(RegionId::Main, delta) {
            self.session
                .handle_event(HostEvent::CursorMoved(RegionId::Main));
        }
    }

    /// Jump to the first or last line of the main panel.
    pub fn cursor_to_edge(&mut self, last: bool) {
        if self.session.host_mut().cursor_to_edge(RegionId::Main, last) {
            self.session
                .handle_event(HostEvent::CursorMoved(RegionId::Main));
        }
    }

    pub fn enter(&mut self, target: EnterTarget) {
        match self.session.enter(target) {
            Ok(Entered::Launched(path)) => {
                self.set_status_message(format!("Opened {}", display_name(&path)));
            }
            Ok(Entered::Shown(_)) | Ok(Entered::Nothing) => {}
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn go_history(&mut self, step: isize) {
        if let Err(e) = self.session.go_history(step) {
            self.set_error(e.to_string());
        }
    }

    pub fn cycle_sort(&mut self) {
        let next = self.session.options().sort.next();
        self.set_option("sort", &next.to_string());
    }

    pub fn toggle_hidden(&mut self) {
        let value = if self.session.options().show_hidden {
            "false"
        } else {
            "true"
        };
        self.set_option("hidden", value);
    }

    fn set_option(&mut self, key: &str, value: &str) {
        match self.session.set_option(key, value) {
            Ok(()) => self.set_status_message(format!("{key} = {value}")),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn refresh(&mut self) {
        self.session.refresh_all();
        self.set_status_message("Refreshed".to_string());
    }

    // ── Filter prompt ────────────────────────────────────────────────────

    /// Open the filter prompt, seeded with the active query.
    pub fn open_filter(&mut self) {
        let previous = self
            .session
            .main_directory()
            .and_then(|d| d.query().map(str::to_string));
        let input = previous.clone().unwrap_or_default();
        self.prompt = PromptState {
            cursor_position: input.len(),
            input,
            previous,
        };
        self.mode = AppMode::Filter;
    }

    /// Keep the typed query and leave the prompt.
    pub fn confirm_filter(&mut self) {
        self.mode = AppMode::Normal;
        self.prompt = PromptState::default();
    }

    /// Leave the prompt and put back whatever filter was active before.
    pub fn cancel_filter(&mut self) {
        let previous = self.prompt.previous.take();
        match previous {
            Some(query) => self.session.filter(&query, None),
            None => self.session.clear_filter(),
        }
        self.mode = AppMode::Normal;
        self.prompt = PromptState::default();
    }

    /// Drop the filter of the main panel.
    pub fn clear_filter(&mut self) {
        self.session.clear_filter();
    }

    fn apply_prompt(&mut self) {
        let query = self.prompt.input.clone();
        self.session.filter(&query, None);
    }

    pub fn prompt_input_char(&mut self, c: char) {
        self.prompt.input.insert(self.prompt.cursor_position, c);
        self.prompt.cursor_position += c.len_utf8();
        self.apply_prompt();
    }

    /// Delete the character before the cursor.
    pub fn prompt_delete_char(&mut self) {
        let Some(prev) = self.prompt.input[..self.prompt.cursor_position]
            .chars()
            .next_back()
        else {
            return;
        };
        self.prompt.cursor_position -= prev.len_utf8();
        self.prompt.input.remove(self.prompt.cursor_position);
        self.apply_prompt();
    }

    pub fn prompt_move_cursor_left(&mut self) {
        if let Some(prev) = self.prompt.input[..self.prompt.cursor_position]
            .chars()
            .next_back()
        {
            self.prompt.cursor_position -= prev.len_utf8();
        }
    }

    pub fn prompt_move_cursor_right(&mut self) {
        if let Some(next) = self.prompt.input[self.prompt.cursor_position..]
            .chars()
            .next()
        {
            self.prompt.cursor_position += next.len_utf8();
        }
    }

    pub fn prompt_cursor_home(&mut self) {
        self.prompt.cursor_position = 0;
    }

    pub fn prompt_cursor_end(&mut self) {
        self.prompt.cursor_position = self.prompt.input.len();
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
