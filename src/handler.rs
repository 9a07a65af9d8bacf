use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::nav::EnterTarget;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    match app.mode {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Filter => handle_filter_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('g') | KeyCode::Home => app.cursor_to_edge(false),
        KeyCode::Char('G') | KeyCode::End => app.cursor_to_edge(true),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => app.enter(EnterTarget::Focused),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
            app.enter(EnterTarget::Parent)
        }
        KeyCode::Char('H') => app.go_history(-1),
        KeyCode::Char('L') => app.go_history(1),
        KeyCode::Char('/') => app.open_filter(),
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('.') => app.toggle_hidden(),
        KeyCode::Char('R') => app.refresh(),
        _ => {}
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_filter(),
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Backspace => app.prompt_delete_char(),
        KeyCode::Left => app.prompt_move_cursor_left(),
        KeyCode::Right => app.prompt_move_cursor_right(),
        KeyCode::Home => app.prompt_cursor_home(),
        KeyCode::End => app.prompt_cursor_end(),
        KeyCode::Char(c) => app.prompt_input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::setup_app;
    use std::path::Path;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn focused(app: &App) -> Option<String> {
        app.session
            .focused_item()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
    }

    #[test]
    fn q_quits() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_prompt() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn jk_move_focus() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(focused(&app).as_deref(), Some("beta"));
        press(&mut app, KeyCode::Up);
        assert_eq!(focused(&app).as_deref(), Some("alpha"));
    }

    #[test]
    fn l_and_h_walk_the_tree() {
        let (_dir, root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.session.current_path(), Some(root.join("alpha").as_path()));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.session.current_path(), Some(root.as_path()));
    }

    #[test]
    fn history_keys() {
        let (_dir, root, mut app) = setup_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('H'));
        assert_eq!(app.session.current_path(), Some(root.as_path()));
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.session.current_path(), Some(root.join("alpha").as_path()));
    }

    #[test]
    fn slash_types_into_filter_not_navigation() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.prompt.input, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn esc_clears_confirmed_filter() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.status().query.as_deref(), Some("be"));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.status().query, None);
        assert_eq!(focused(&app).as_deref(), Some("beta"));
    }

    #[test]
    fn dot_toggles_hidden() {
        let (_dir, _root, mut app) = setup_app();
        press(&mut app, KeyCode::Char('.'));
        assert!(app.session.options().show_hidden);
        press(&mut app, KeyCode::Char('.'));
        assert!(!app.session.options().show_hidden);
    }
}
