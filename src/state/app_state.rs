//! Application-level state.

use super::Notification;
use std::time::{Duration, Instant};

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Markets,
    CoinDetail,
    Themes,
    ThemeDetail,
    News,
    NewsDetail,
}

/// Top-level tabs shown in the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Markets,
    Themes,
    News,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Markets, Tab::Themes, Tab::News];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Markets => "Markets",
            Tab::Themes => "Themes",
            Tab::News => "News",
        }
    }

    /// The list view the tab opens on.
    pub fn root(&self) -> View {
        match self {
            Tab::Markets => View::Markets,
            Tab::Themes => View::Themes,
            Tab::News => View::News,
        }
    }
}

impl View {
    /// The tab this view is shown under.
    pub fn tab(&self) -> Tab {
        match self {
            View::Markets | View::CoinDetail => Tab::Markets,
            View::Themes | View::ThemeDetail => Tab::Themes,
            View::News | View::NewsDetail => Tab::News,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, View::CoinDetail | View::ThemeDetail | View::NewsDetail)
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Coin search popup.
    Search,
    /// News keyword box.
    NewsSearch,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Views to return to with "back".
    pub history: Vec<View>,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// When the current notification was shown.
    pub notification_at: Option<Instant>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    /// Open `view`, remembering the current one for [`AppState::back`].
    ///
    /// Switching to a tab's root view starts a fresh history. A detail view
    /// appears at most once: opening one already in the history cuts the
    /// history back to where it was entered.
    pub fn open(&mut self, view: View) {
        if view == self.current_view {
            return;
        }
        if view.is_detail() {
            match self.history.iter().position(|v| *v == view) {
                Some(index) => self.history.truncate(index),
                None => self.history.push(self.current_view),
            }
        } else {
            self.history.clear();
        }
        self.current_view = view;
    }

    /// Return to the previous view. Returns the view that was left.
    pub fn back(&mut self) -> Option<View> {
        let previous = self.history.pop()?;
        Some(std::mem::replace(&mut self.current_view, previous))
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.notification_at = Some(Instant::now());
    }

    /// Drop the notification once its display time has passed.
    pub fn expire_notification(&mut self, now: Instant) {
        let expired = match (&self.notification, self.notification_at) {
            (Some(n), Some(at)) => now.duration_since(at) >= Duration::from_secs(n.duration_secs),
            _ => false,
        };
        if expired {
            self.dismiss_notification();
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.notification_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detail_views_stack_and_back() {
        let mut state = AppState::new();
        state.open(View::CoinDetail);
        state.open(View::NewsDetail);
        assert_eq!(state.history, vec![View::Markets, View::CoinDetail]);

        assert_eq!(state.back(), Some(View::NewsDetail));
        assert_eq!(state.current_view, View::CoinDetail);
        assert_eq!(state.back(), Some(View::CoinDetail));
        assert_eq!(state.current_view, View::Markets);
        assert_eq!(state.back(), None);
    }

    #[test]
    fn test_tab_switch_clears_history() {
        let mut state = AppState::new();
        state.open(View::CoinDetail);
        state.open(View::News);
        assert!(state.history.is_empty());
        assert_eq!(state.current_view.tab(), Tab::News);
    }

    #[test]
    fn test_notification_expires() {
        let mut state = AppState::new();
        state.notify(Notification::info("Added to favorites"));
        let shown = state.notification_at.unwrap();

        state.expire_notification(shown + Duration::from_secs(1));
        assert!(state.notification.is_some());

        state.expire_notification(shown + Duration::from_secs(3));
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_reopening_detail_cuts_history() {
        let mut state = AppState::new();
        state.open(View::CoinDetail);
        state.open(View::NewsDetail);
        assert_eq!(state.history, vec![View::Markets, View::CoinDetail]);

        state.open(View::CoinDetail);
        assert_eq!(state.current_view, View::CoinDetail);
        assert_eq!(state.history, vec![View::Markets]);
        assert_eq!(state.back(), Some(View::CoinDetail));
        assert_eq!(state.current_view, View::Markets);
    }
}
