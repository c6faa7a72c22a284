//! taxbot-tui: Terminal UI components
//!
//! Chat widgets for taxbot built on ratatui and crossterm.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
