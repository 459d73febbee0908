//! Event handler for turning terminal input into actions.

use super::{InputEvent, Key};
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, InputMode, SortField, Store, Tab, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Handles input events and produces actions.
pub struct EventHandler {
    keybindings: KeyBindings,
    poll_timeout: Duration,
    snapshot: StoreSnapshot,
}

/// The parts of the store that decide what a key means.
#[derive(Debug, Clone, Copy, Default)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    show_help: bool,
}

impl EventHandler {
    pub fn new(keybindings: KeyBindings, poll_timeout: Duration) -> Self {
        Self {
            keybindings,
            poll_timeout,
            snapshot: StoreSnapshot::default(),
        }
    }

    /// Update the snapshot used for mode- and view-aware handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.snapshot = StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            show_help: store.app.show_help,
        };
    }

    /// Wait up to the poll timeout for input and map it to an action.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.poll_timeout)? {
            return Ok(match event::read()? {
                CrosstermEvent::Key(key) => self.handle_key(key),
                CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse),
                // The next frame picks up the new size.
                _ => None,
            });
        }
        Ok(None)
    }

    pub(crate) fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        if input.ctrl() && input.key == Key::Char('c') {
            return Some(Action::Quit);
        }

        match self.snapshot.input_mode {
            InputMode::Normal if self.snapshot.show_help => self.handle_help_overlay(input),
            InputMode::Normal => self.handle_normal_mode(input),
            InputMode::Search => self.handle_text_input(input, true),
            InputMode::NewsSearch => self.handle_text_input(input, false),
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        if self.snapshot.input_mode != InputMode::Normal {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_help_overlay(&self, input: InputEvent) -> Option<Action> {
        let kb = &self.keybindings;
        if input.matches(&kb.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&kb.help) || input.matches(&kb.back) {
            return Some(Action::ToggleHelp);
        }
        None
    }

    fn handle_normal_mode(&self, input: InputEvent) -> Option<Action> {
        let kb = &self.keybindings;
        let view = self.snapshot.current_view;

        // Global shortcuts
        if input.matches(&kb.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&kb.help) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&kb.refresh) {
            return Some(Action::Refresh);
        }
        if input.matches(&kb.search) {
            let mode = if view == View::News {
                InputMode::NewsSearch
            } else {
                InputMode::Search
            };
            return Some(Action::SetInputMode(mode));
        }

        // Tabs
        if input.matches(&kb.markets) {
            return Some(Action::SetView(View::Markets));
        }
        if input.matches(&kb.themes) {
            return Some(Action::SetView(View::Themes));
        }
        if input.matches(&kb.news) {
            return Some(Action::SetView(View::News));
        }
        if input.key == Key::Tab {
            return Some(Action::SetView(next_tab_root(view)));
        }

        // Navigation
        if input.matches(&kb.up) || input.key == Key::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&kb.down) || input.key == Key::Down {
            return Some(Action::ScrollDown);
        }
        if input.key == Key::Home {
            return Some(Action::GoToTop);
        }
        if input.key == Key::End {
            return Some(Action::GoToBottom);
        }
        if input.matches(&kb.prev_page) || matches!(input.key, Key::Left | Key::PageUp) {
            return Some(Action::PrevPage);
        }
        if input.matches(&kb.next_page) || matches!(input.key, Key::Right | Key::PageDown) {
            return Some(Action::NextPage);
        }
        if input.matches(&kb.select) {
            return Some(Action::Select);
        }
        if input.matches(&kb.back) || input.key == Key::Backspace {
            return Some(if view == View::News {
                Action::ClearNewsSearch
            } else {
                Action::Back
            });
        }

        self.handle_view_keys(input, view)
    }

    fn handle_view_keys(&self, input: InputEvent, view: View) -> Option<Action> {
        let kb = &self.keybindings;

        if input.matches(&kb.favorite)
            && matches!(view, View::Markets | View::CoinDetail | View::ThemeDetail)
        {
            return Some(Action::ToggleFavorite);
        }

        match view {
            View::Markets => {
                if input.matches(&kb.trending) {
                    return Some(Action::CycleTrending);
                }
                let sort_keys = [
                    &kb.sort_rank,
                    &kb.sort_price,
                    &kb.sort_change_24h,
                    &kb.sort_change_7d,
                    &kb.sort_market_cap,
                    &kb.sort_volume,
                ];
                sort_keys
                    .iter()
                    .zip(SortField::ALL)
                    .find(|(binding, _)| input.matches(binding))
                    .map(|(_, field)| Action::SortBy(field))
            }
            View::CoinDetail if input.matches(&kb.timeframe) => Some(Action::CycleTimeframe),
            _ => None,
        }
    }

    fn handle_text_input(&self, input: InputEvent, with_results: bool) -> Option<Action> {
        match input.key {
            Key::Escape => Some(Action::CancelInput),
            Key::Enter => Some(Action::SubmitInput),
            Key::Backspace => Some(Action::InputBackspace),
            Key::Up if with_results => Some(Action::ScrollUp),
            Key::Down if with_results => Some(Action::ScrollDown),
            _ => input.text().map(Action::InputChar),
        }
    }
}

fn next_tab_root(view: View) -> View {
    match view.tab() {
        Tab::Markets => View::Themes,
        Tab::Themes => View::News,
        Tab::News => View::Markets,
    }
}
