//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the grid up by one line. Default: k/↑
    ScrollUp,
    /// Scroll the grid down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one viewport height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one viewport height. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the top of the grid. Default: g/Home
    ScrollToTop,
    /// Jump to the bottom of the grid. Default: G/End
    ScrollToBottom,

    // Card selection
    /// Select the next card, scrolling it into view. Default: l/→
    NextCard,
    /// Select the previous card, scrolling it into view. Default: h/←
    PrevCard,

    // Application controls
    /// Force a remeasure of the grid. Default: r
    Refresh,
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether this action only moves the viewport.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            Self::ScrollUp
                | Self::ScrollDown
                | Self::PageUp
                | Self::PageDown
                | Self::ScrollToTop
                | Self::ScrollToBottom
        )
    }
}
