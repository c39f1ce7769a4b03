//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Screen switches caused by signing in or out
//! are never made here; they arrive through the navigation guard.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use authgate_core::navigation::Route;

use crate::app::{App, AppState, SignInFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Splash is up: only allow leaving
    if app.splash.is_visible() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        return Ok(false);
    }

    // Handle quit confirmation
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

    match app.current_route() {
        Some(Route::SignIn) => handle_sign_in_input(app, key),
        Some(Route::SignUp) => Ok(handle_sign_up_input(app, key)),
        Some(Route::Home) => Ok(handle_home_input(app, key)),
        None => Ok(false),
    }
}

fn handle_sign_in_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on sign-in screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.focus = app.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.focus = app.focus.prev();
        }
        KeyCode::Enter => match app.focus {
            SignInFocus::Email => app.focus = SignInFocus::Password,
            SignInFocus::Password => app.focus = SignInFocus::Button,
            SignInFocus::Button => {
                // Success shows up later as a guard redirect
                app.submit_sign_in();
            }
            SignInFocus::SignUpLink => app.navigate(Route::SignUp),
        },
        KeyCode::Backspace => {
            if !app.is_submitting {
                app.pop_char();
            }
        }
        KeyCode::Char(c) => {
            if !app.is_submitting {
                app.push_char(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_sign_up_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
            app.navigate(Route::SignIn);
        }
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        _ => {}
    }
    false
}

fn handle_home_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
            app.submit_sign_out();
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use authgate_core::api::MockCredentialService;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_keys_ignored_during_splash() {
        let mut app = test_app(MockCredentialService::instant(), None);
        assert!(!handle_input(&mut app, key(KeyCode::Char('x'))).unwrap());
        assert_eq!(app.password, "");
        assert!(handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_sign_in_typing_and_focus() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        assert_eq!(app.focus, SignInFocus::Password);

        type_text(&mut app, "pw");
        assert_eq!(app.password, "pw");

        handle_input(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus, SignInFocus::Email);
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.email, "a@b.co");
    }

    #[test]
    fn test_sign_up_link_and_back() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        app.focus = SignInFocus::SignUpLink;

        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.current_route(), Some(Route::SignUp));

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.current_route(), Some(Route::SignIn));
    }

    #[test]
    fn test_esc_on_sign_in_quits() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_quit_confirmation_on_home() {
        let mut app = test_app(
            MockCredentialService::instant(),
            Some(r#"{"id":"1","email":"a@b.com"}"#),
        );
        app.start();

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);
        handle_input(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
    }

    #[tokio::test]
    async fn test_submit_from_button_then_guard_redirects() {
        let mut app = test_app(MockCredentialService::instant(), None);
        app.start();
        type_text(&mut app, "pw");
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.focus, SignInFocus::Button);

        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        // No direct navigation happened
        assert_eq!(app.current_route(), Some(Route::SignIn));

        app.settle().await;
        assert_eq!(app.current_route(), Some(Route::Home));

        handle_input(&mut app, key(KeyCode::Char('s'))).unwrap();
        app.settle().await;
        assert_eq!(app.current_route(), Some(Route::SignIn));
    }
}
