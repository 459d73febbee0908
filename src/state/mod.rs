//! State management for CryptoGuide.
//!
//! UI-level state (current view, input mode, overlays) lives in the
//! [`Store`] and changes only through dispatched [`Action`]s. Remote data
//! lives in [`Resource`]s owned by the views, which publish their state
//! through watch channels.

mod app_state;
mod favorites;
mod pagination;
mod resource;
mod search;
mod sort;

pub use app_state::{AppState, InputMode, Tab, View};
pub use favorites::{FavoritesStorage, FavoritesStore, FileStorage, MemoryStorage};
pub use pagination::Pager;
pub use resource::{
    FetchFn, Phase, Resource, ResourceHandle, ResourceState, ResourceView,
};
pub use search::DebouncedSearch;
pub use sort::{SortDirection, SortField, SortState};

use crate::error::Result;
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Navigation
    SetView(View),
    SetInputMode(InputMode),
    Select,
    Back,

    // List actions
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    NextPage,
    PrevPage,
    SortBy(SortField),

    // Coin actions
    ToggleFavorite,
    CycleTimeframe,
    CycleTrending,

    // Text input
    InputChar(char),
    InputBackspace,
    SubmitInput,
    CancelInput,
    ClearNewsSearch,

    // UI actions
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Data refresh
    Refresh,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The global UI state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::new(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Apply a UI-only action. Returns `false` for actions that need a view.
    pub fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::SetView(view) => self.app.open(*view),
            Action::SetInputMode(mode) => self.app.input_mode = *mode,
            Action::Back => {
                self.app.back();
            }
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => self.app.notify(notification.clone()),
            Action::DismissNotification => self.app.dismiss_notification(),
            Action::Quit => self.app.should_quit = true,
            _ => return false,
        }
        true
    }
}
