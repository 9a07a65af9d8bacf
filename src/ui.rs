use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::pane::PaneWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::host::RegionId;

/// Split the screen into the three panel areas and the bottom line.
fn layout(area: Rect) -> ([Rect; 3], Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 6),
            Constraint::Ratio(2, 6),
            Constraint::Ratio(3, 6),
        ])
        .split(rows[0]);
    ([cols[0], cols[1], cols[2]], rows[1])
}

/// Panel title: the path the panel's view shows.
fn title(app: &App, region: RegionId) -> String {
    let path = app
        .session
        .view_in(region)
        .and_then(|v| v.path())
        .map(|p| match (region, p.file_name()) {
            (RegionId::Main, _) | (_, None) => p.display().to_string(),
            (_, Some(name)) => name.to_string_lossy().to_string(),
        });
    match path {
        Some(p) => format!(" {p} "),
        None => String::new(),
    }
}

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let (panes, bottom) = layout(frame.area());

    for (region, area) in RegionId::ALL.into_iter().zip(panes) {
        let visible_height = area.height.saturating_sub(2) as usize;
        app.session.host_mut().update_scroll(region, visible_height);
    }

    let host = app.session.host();
    for (region, area) in RegionId::ALL.into_iter().zip(panes) {
        let focused = host.focused() == region;
        let block = Block::default()
            .title(title(app, region))
            .borders(Borders::ALL)
            .border_style(app.theme.border(focused));
        let widget = PaneWidget::new(host.bound(region), host.region(region), &app.theme)
            .block(block);
        frame.render_widget(widget, area);
    }

    match app.mode {
        AppMode::Filter => render_prompt(app, frame, bottom),
        AppMode::Normal => {
            let status = app.session.status();
            let mut bar = StatusBarWidget::new(&status, &app.theme);
            if let Some((msg, is_error, _)) = &app.status_message {
                bar = bar.message(msg, *is_error);
            }
            frame.render_widget(bar, bottom);
        }
    }
}

fn render_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let mode = app.session.options().filter_mode;
    let prefix = format!("filter ({mode}) /");
    let line = Line::from(vec![
        Span::styled(prefix.clone(), app.theme.style(crate::host::StyleId::FileMeta)),
        Span::styled(app.prompt.input.as_str(), app.theme.text()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let typed = app.prompt.input[..app.prompt.cursor_position].chars().count();
    let x = area.x + (prefix.chars().count() + typed) as u16;
    if x < area.x + area.width {
        frame.set_cursor_position(Position::new(x, area.y));
    }
}
