//! Card selection keyboard action handler.
//!
//! Pure functions that transform AppState in response to card navigation.

use crate::grid::ItemIndex;
use crate::model::KeyAction;
use crate::state::AppState;

/// Handle a card navigation action.
///
/// The first `NextCard` selects card 0 and the first `PrevCard` selects the
/// last card. Selection saturates at both ends and is cleared when there are
/// no cards. Other actions are no-ops.
pub fn handle_selection_action(mut state: AppState, action: KeyAction, item_count: usize) -> AppState {
    if item_count == 0 {
        state.selected = None;
        return state;
    }
    let last = item_count - 1;

    state.selected = match (action, state.selected) {
        (KeyAction::NextCard, None) => Some(ItemIndex::new(0)),
        (KeyAction::NextCard, Some(i)) => Some(ItemIndex::new((i.get() + 1).min(last))),
        (KeyAction::PrevCard, None) => Some(ItemIndex::new(last)),
        (KeyAction::PrevCard, Some(i)) => Some(ItemIndex::new(i.get().saturating_sub(1).min(last))),
        _ => return state,
    };

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_next_selects_first_card() {
        let state = handle_selection_action(AppState::new(), KeyAction::NextCard, 5);
        assert_eq!(state.selected, Some(ItemIndex::new(0)));
    }

    #[test]
    fn first_prev_selects_last_card() {
        let state = handle_selection_action(AppState::new(), KeyAction::PrevCard, 5);
        assert_eq!(state.selected, Some(ItemIndex::new(4)));
    }

    #[test]
    fn selection_saturates_at_ends() {
        let mut state = AppState::new();
        for _ in 0..10 {
            state = handle_selection_action(state, KeyAction::NextCard, 3);
        }
        assert_eq!(state.selected, Some(ItemIndex::new(2)));

        for _ in 0..10 {
            state = handle_selection_action(state, KeyAction::PrevCard, 3);
        }
        assert_eq!(state.selected, Some(ItemIndex::new(0)));
    }

    #[test]
    fn empty_grid_clears_selection() {
        let state = AppState {
            selected: Some(ItemIndex::new(3)),
            ..AppState::default()
        };
        assert_eq!(handle_selection_action(state, KeyAction::NextCard, 0).selected, None);
    }

    #[test]
    fn scroll_action_leaves_selection() {
        let state = AppState {
            selected: Some(ItemIndex::new(1)),
            ..AppState::default()
        };
        let state = handle_selection_action(state, KeyAction::ScrollDown, 3);
        assert_eq!(state.selected, Some(ItemIndex::new(1)));
    }
}
