//! Keyboard input handling for the TUI.
//!
//! Overlays take keys first (help, quit confirmation, then the profile
//! modal); everything else goes to the main screen.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use profilecache_core::Backdrop;

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    if app.is_modal_open() {
        handle_modal_input(app, key);
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        KeyCode::Char('g') => app.generate_profile(),
        KeyCode::Char('f') => app.toggle_current_favorite(),

        KeyCode::Char('d') => app.toggle_backdrop(Backdrop::Details),
        KeyCode::Char('v') => app.toggle_backdrop(Backdrop::Favorites),
        KeyCode::Char('l') => app.toggle_backdrop(Backdrop::Gallery),
        KeyCode::Char('b') => app.toggle_backdrop(Backdrop::BulkProfiles),
        KeyCode::Char('r') => app.refresh_gallery(),
        KeyCode::Esc => app.close_backdrop(),

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('x') => app.toggle_selected_favorite(),
        _ => {}
    }

    Ok(false)
}

fn handle_modal_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.close_modal(),
        KeyCode::Char('x') | KeyCode::Char('f') => app.toggle_modal_favorite(),
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use profilecache_core::Config;

    use super::*;
    use crate::app::AppStore;

    fn app() -> App {
        App::new(&Config::default(), AppStore::ephemeral()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.snapshot().backdrop, Backdrop::None);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_backdrop_keys_toggle_and_escape_closes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.snapshot().backdrop, Backdrop::Details);

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.snapshot().backdrop, Backdrop::Favorites);

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.snapshot().backdrop, Backdrop::None);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.snapshot().backdrop, Backdrop::None);
    }

    #[test]
    fn test_selection_stays_in_empty_list() {
        let mut app = app();
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selection, 0);
        assert!(app.selected_profile().is_none());

        // Nothing selected, nothing opens
        press(&mut app, KeyCode::Enter);
        assert!(!app.is_modal_open());
    }
}
