//! Vertical scrolling keyboard action handler.
//!
//! Pure functions that transform AppState in response to scroll actions.

use crate::model::KeyAction;
use crate::state::{AppState, ScrollPosition, Viewport};

/// Handle a scroll keyboard action.
///
/// Line and page moves resolve the current position first, so scrolling up
/// from `Bottom` starts from the last page. Non-scroll actions are no-ops.
pub fn handle_scroll_action(mut state: AppState, action: KeyAction, viewport: Viewport) -> AppState {
    let current = state.scroll.resolve(viewport.total_height, viewport.height);
    let max = viewport.total_height.saturating_sub(viewport.height);
    let page = viewport.height.max(1);

    state.scroll = match action {
        KeyAction::ScrollUp => ScrollPosition::AtLine(current.saturating_sub(1)),
        KeyAction::ScrollDown => ScrollPosition::AtLine(current.saturating_add(1).min(max)),
        KeyAction::PageUp => ScrollPosition::AtLine(current.saturating_sub(page)),
        KeyAction::PageDown => ScrollPosition::AtLine(current.saturating_add(page).min(max)),
        KeyAction::ScrollToTop => ScrollPosition::Top,
        KeyAction::ScrollToBottom => ScrollPosition::Bottom,
        _ => return state,
    };

    state
}

/// Scroll by `lines` (negative is up), as for mouse wheel events.
pub fn scroll_by(mut state: AppState, lines: isize, viewport: Viewport) -> AppState {
    let current = state.scroll.resolve(viewport.total_height, viewport.height);
    let max = viewport.total_height.saturating_sub(viewport.height);
    let target = current.saturating_add_signed(lines).min(max);
    state.scroll = ScrollPosition::AtLine(target);
    state
}

/// Scroll the least amount that brings `[top, top + height)` into view.
///
/// Content taller than the viewport is aligned to its top.
pub fn scroll_into_view(mut state: AppState, top: usize, height: usize, viewport: Viewport) -> AppState {
    let current = state.scroll.resolve(viewport.total_height, viewport.height);
    let bottom = top.saturating_add(height);

    if top < current || height >= viewport.height {
        state.scroll = ScrollPosition::AtLine(top);
    } else if bottom > current + viewport.height {
        state.scroll = ScrollPosition::AtLine(bottom - viewport.height);
    }

    state
}
