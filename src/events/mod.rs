//! Event handling for CryptoGuide.
//!
//! Terminal input is polled by the [`EventHandler`] and mapped to
//! [`Action`](crate::state::Action)s according to the current view and
//! input mode.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};
