//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, and rendering.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::events::EventHandler;
use crate::state::{Action, FavoritesStore, FileStorage, Store};
use crate::ui::Ui;
use crate::views::{Screens, ViewContext};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// View models for every screen.
    screens: Screens,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    ///
    /// Must be called from within a tokio runtime; mounting views spawns
    /// their fetch tasks.
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(config.api.clone())?;
        tracing::info!(base_url = %client.base_url(), "API client ready");

        let favorites = match FileStorage::default_location() {
            Ok(storage) => {
                tracing::debug!(path = %storage.path().display(), "Loading favorites");
                FavoritesStore::new(storage)
            }
            Err(e) => {
                tracing::warn!("Favorites will not persist: {}", e);
                FavoritesStore::in_memory()
            }
        };

        let ctx = ViewContext::new(Arc::new(client), config.polling.clone(), config.ui.clone())
            .with_favorites(favorites);
        let screens = Screens::new(ctx);

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let store = Store::new(action_tx);
        let event_handler = EventHandler::new(
            config.keybindings.clone(),
            Duration::from_millis(config.ui.tick_rate_ms),
        );

        Ok(Self {
            terminal,
            store,
            event_handler,
            action_rx,
            screens,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.screens.start(&self.store);

        loop {
            self.event_handler.update_store_snapshot(&self.store);
            self.store.app.expire_notification(Instant::now());
            self.screens.sync();

            let keys = &self.config.keybindings;
            self.terminal.draw(|frame| {
                Ui::render(frame, &self.store, &self.screens, keys);
            })?;

            tokio::select! {
                // Terminal events; a poll timeout yields None and redraws
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.screens.apply(&mut self.store, action);
                    }
                }

                // Actions dispatched through the store
                Some(action) = self.action_rx.recv() => {
                    self.screens.apply(&mut self.store, action);
                }
            }

            if self.store.app.should_quit {
                tracing::info!("Shutting down");
                break;
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
