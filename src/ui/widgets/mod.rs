//! TUI widgets.

mod coin_detail;
mod common;
mod dashboard;
mod help;
mod market_table;
mod news;
mod notifications;
mod search_popup;
mod status_bar;
mod tab_bar;
mod themes;

pub use coin_detail::CoinDetailWidget;
pub use dashboard::{LatestNewsWidget, OverviewWidget, TrendingWidget};
pub use help::HelpPanel;
pub use market_table::MarketTableWidget;
pub use news::{NewsDetailWidget, NewsFeedWidget};
pub use notifications::{render_error, render_hints, render_notification};
pub use search_popup::SearchPopup;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
pub use themes::{ThemeDetailWidget, ThemeListWidget};
