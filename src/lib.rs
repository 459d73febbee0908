//! # CryptoGuide - a terminal client for cryptocurrency market data
//!
//! Browses the CryptoGuide backend: paged coin listings, coin details with
//! price history, curated themes and a crypto news feed. Built with ratatui
//! and reqwest.
//!
//! ## Architecture
//!
//! - **App**: Terminal lifecycle and the event loop
//! - **API**: Typed HTTP client for the backend, behind the `MarketApi` trait
//! - **State**: Navigation store, polling resources, favorites, paging and sorting
//! - **Views**: View models that own resources and react to actions
//! - **UI**: Layout and rendering logic
//! - **Events**: Input handling and key mapping
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod markup;
pub mod state;
pub mod ui;
pub mod views;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
