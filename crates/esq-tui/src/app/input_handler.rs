//! Keyboard input handling for the application.
//!
//! Keys are offered in order to the help overlay, the global bindings and
//! finally the focused pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::AppAction;
use crate::components::{Component, Focus};

use super::App;

impl App {
    /// Handle keyboard input with delegated responsibility.
    pub(super) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if self.handle_overlay_keys(code) {
            return;
        }

        if self.handle_global_keys(code, modifiers) {
            return;
        }

        match self.focus {
            Focus::Query => self.handle_query_keys(code, modifiers),
            Focus::Results => self.handle_results_keys(code, modifiers),
        }
    }

    /// Returns true if the help overlay consumed the key.
    pub(super) fn handle_overlay_keys(&mut self, code: KeyCode) -> bool {
        if !self.show_help {
            return false;
        }
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
            self.show_help = false;
        }
        true
    }

    /// Bindings that work in either pane.
    pub(super) fn handle_global_keys(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(AppAction::Quit);
            }
            KeyCode::F(2) => {
                self.query_input.toggle_language();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.set_focus(self.focus.toggle());
            }
            _ => return false,
        }
        true
    }

    fn handle_query_keys(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Enter => {
                let _ = self.action_tx.send(AppAction::SubmitQuery);
            }
            KeyCode::Esc => self.query_input.clear(),
            _ => {
                self.query_input.handle_key(KeyEvent::new(code, modifiers));
            }
        }
    }

    fn handle_results_keys(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(AppAction::Quit);
            }
            KeyCode::Char('n') => {
                let _ = self.action_tx.send(AppAction::NextPage);
            }
            KeyCode::Char('p') => {
                let _ = self.action_tx.send(AppAction::PreviousPage);
            }
            KeyCode::Esc | KeyCode::Char('x') => {
                let _ = self.action_tx.send(AppAction::CancelSearch);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.session.scroll_left() {
                    self.sync_view();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.session.scroll_right() {
                    self.sync_view();
                }
            }
            KeyCode::Char('t') => {
                self.session.cycle_preset(true);
                self.sync_view();
            }
            KeyCode::Char('T') => {
                self.session.cycle_preset(false);
                self.sync_view();
            }
            KeyCode::Char('/') | KeyCode::Char('i') => self.set_focus(Focus::Query),
            KeyCode::Char('?') => self.show_help = true,
            _ => {
                self.results.handle_key(KeyEvent::new(code, modifiers));
            }
        }
    }
}
