//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without TUI.

pub mod app_state;
pub mod scroll_handler;
pub mod selection_handler;

pub use app_state::{AppState, ScrollPosition, Viewport};
pub use scroll_handler::{handle_scroll_action, scroll_by, scroll_into_view};
pub use selection_handler::handle_selection_action;
