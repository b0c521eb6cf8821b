//! TUI rendering and terminal management (impure shell)

pub mod card;
pub mod grid_view;
pub mod status_bar;
mod styles;
pub mod terminal_host;

pub use card::{Card, CardWidget};
pub use grid_view::{render_grid, GridPaint, RowMeasurement};
pub use status_bar::{StatusBar, StatusInfo};
pub use styles::{CardStyles, ColorConfig};
pub use terminal_host::{TerminalHost, MAIN_PANE};

use crate::config::keybindings::KeyBindings;
use crate::config::ResolvedConfig;
use crate::grid::{GridFrame, VirtualGrid};
use crate::host::ScrollMetrics;
use crate::model::{AppError, KeyAction, ParsedRecord};
use crate::source::InputSource;
use crate::state::{
    handle_scroll_action, handle_selection_action, scroll_by, scroll_into_view, AppState, Viewport,
};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Lines scrolled per mouse wheel notch.
const MOUSE_SCROLL_LINES: isize = 3;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Input source error
    #[error("Input error: {0}")]
    Input(#[from] crate::model::InputError),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend. The grid owns
/// the records; the terminal host feeds it width, scroll and frame events.
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    input_source: InputSource,
    key_bindings: KeyBindings,
    grid: VirtualGrid<ParsedRecord, Card>,
    host: TerminalHost,
    styles: CardStyles,
    /// Main pane height at the last draw.
    pane_height: usize,
    /// Card areas of the last draw (for mouse click detection)
    last_paint: GridPaint,
    /// Remeasure generation whose mounted rows have been reported.
    reported_generation: u64,
    /// Frame callbacks ran after the last draw; the screen may be stale.
    needs_redraw: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        input_source: InputSource,
        config: &ResolvedConfig,
        styles: CardStyles,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Self::with_terminal(terminal, input_source, config, styles)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Waits for input no longer than
    /// the next host timer, and not at all while frame callbacks are queued.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = if self.needs_redraw {
                Duration::ZERO
            } else {
                self.host.next_timeout()
            };

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        self.draw()?;
                        continue;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        self.draw()?;
                        continue;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        self.draw()?;
                        continue;
                    }
                    _ => {}
                }
            }

            if self.tick()? {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create the application on an already initialized terminal.
    ///
    /// Loads whatever the input source has ready and mounts the grid. The
    /// main pane is not laid out until the first [`TuiApp::draw`].
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Input` if the source fails and `TuiError::App` if
    /// the layout configuration is invalid.
    pub fn with_terminal(
        terminal: Terminal<B>,
        mut input_source: InputSource,
        config: &ResolvedConfig,
        styles: CardStyles,
    ) -> Result<Self, TuiError> {
        let records = input_source.poll()?;
        let mut app_state = AppState::new();
        app_state.add_records(&records);
        app_state.live = input_source.is_live();

        let host = TerminalHost::new();
        let grid = VirtualGrid::with_options(
            records,
            config.layout,
            config.remeasure,
            Card::from_record,
            host.host(),
        )
        .map_err(AppError::from)?;

        debug!(
            records = app_state.record_count(),
            malformed = app_state.malformed_count(),
            live = app_state.live,
            "browser started"
        );

        Ok(Self {
            terminal,
            app_state,
            input_source,
            key_bindings: KeyBindings::default(),
            grid,
            host,
            styles,
            pane_height: 0,
            last_paint: GridPaint::default(),
            reported_generation: 0,
            needs_redraw: false,
        })
    }

    /// UI state.
    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// The card grid.
    pub fn grid(&self) -> &VirtualGrid<ParsedRecord, Card> {
        &self.grid
    }

    /// The terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Host work between input events: due timers and new records.
    ///
    /// Returns whether a redraw is needed.
    pub fn tick(&mut self) -> Result<bool, TuiError> {
        let timers = self.host.fire_timers();
        let input_changed = self.poll_input()?;
        Ok(timers > 0 || input_changed || self.needs_redraw || self.host.has_pending_frames())
    }

    /// Poll input source for new records and append them to the grid.
    ///
    /// Existing rows keep their measured heights, so the viewport does not
    /// move. Returns whether anything visible changed.
    fn poll_input(&mut self) -> Result<bool, TuiError> {
        let was_live = self.app_state.live;
        let records = self.input_source.poll()?;
        self.app_state.live = self.input_source.is_live();

        if records.is_empty() {
            return Ok(was_live != self.app_state.live);
        }

        debug!(count = records.len(), "appending records");
        self.app_state.add_records(&records);
        self.grid.extend_items(records);
        Ok(true)
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits, even if rebound.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        match action {
            KeyAction::Quit => return true,
            KeyAction::Refresh => {
                debug!("remeasure requested from keyboard");
                self.grid.request_remeasure();
            }
            KeyAction::NextCard | KeyAction::PrevCard => {
                let state = std::mem::take(&mut self.app_state);
                self.app_state = handle_selection_action(state, action, self.grid.item_count());
                self.reveal_selection();
            }
            KeyAction::ScrollUp
            | KeyAction::ScrollDown
            | KeyAction::PageUp
            | KeyAction::PageDown
            | KeyAction::ScrollToTop
            | KeyAction::ScrollToBottom => {
                let state = std::mem::take(&mut self.app_state);
                self.app_state = handle_scroll_action(state, action, self.viewport());
            }
        }
        false
    }

    /// Handle a single mouse event: wheel scrolls, left click selects.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let lines = match mouse.kind {
            MouseEventKind::ScrollUp => -MOUSE_SCROLL_LINES,
            MouseEventKind::ScrollDown => MOUSE_SCROLL_LINES,
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(item) = self.last_paint.hit_test(mouse.column, mouse.row) {
                    trace!(item = item.get(), "card clicked");
                    self.app_state.selected = Some(item);
                }
                return;
            }
            _ => return,
        };
        let state = std::mem::take(&mut self.app_state);
        self.app_state = scroll_by(state, lines, self.viewport());
    }

    /// Handle a terminal resize event
    ///
    /// The main pane spans the full width, so its new width goes straight to
    /// the grid's resize subscribers.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "terminal resized");
        self.host.set_pane_width(width);
    }

    /// Render the current frame, report row heights and run the frame
    /// callbacks it triggered.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let [main, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.sync_pane(main);
        let frame = self.grid.frame();
        let scroll_top = self
            .app_state
            .scroll
            .resolve(frame.total_height, usize::from(main.height));
        let info = self.status_info(&frame, scroll_top);
        let styles = self.styles;
        let selected = self.app_state.selected;

        let mut paint = GridPaint::default();
        self.terminal.draw(|f| {
            if frame.item_count == 0 {
                let message = if info.live { "Waiting for records..." } else { "No records" };
                f.render_widget(Paragraph::new(message).alignment(Alignment::Center), main);
            } else {
                paint = render_grid(&frame, main, f.buffer_mut(), scroll_top, &styles, selected);
            }
            f.render_widget(StatusBar::new(info, &styles), status);
        })?;

        self.report_measurements(&paint);
        self.last_paint = paint;
        self.needs_redraw = self.host.end_frame() > 0;
        Ok(())
    }

    /// Push the pane geometry to the host and the grid.
    fn sync_pane(&mut self, main: Rect) {
        self.host.set_pane_width(main.width);

        self.pane_height = usize::from(main.height);
        let scroll_top = self
            .app_state
            .scroll
            .resolve(self.grid.total_height(), self.pane_height);
        let metrics = ScrollMetrics::new(scroll_top, self.pane_height);
        self.host.set_pane_metrics(metrics);
        self.grid.on_scroll(MAIN_PANE, metrics);
    }

    /// Report painted row heights. After a remeasure pass every mounted row
    /// is reported again; otherwise only rows whose height disagrees.
    fn report_measurements(&mut self, paint: &GridPaint) {
        let generation = self.grid.remeasure_generation();
        let report_all = generation != self.reported_generation;
        self.reported_generation = generation;

        for measurement in &paint.measurements {
            if report_all || measurement.stale {
                self.grid.measure_row(measurement.row, measurement.height);
            }
        }
    }

    fn status_info(&self, frame: &GridFrame<Card>, scroll_top: usize) -> StatusInfo {
        StatusInfo {
            records: self.app_state.record_count(),
            malformed: self.app_state.malformed_count(),
            columns: frame.columns,
            first_row: frame.range.start_index.get(),
            end_row: frame.range.end_index.get(),
            row_count: frame.row_count,
            scroll_top,
            total_height: frame.total_height,
            live: self.app_state.live,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.pane_height, self.grid.total_height())
    }

    /// Scroll the selected card's row into view.
    fn reveal_selection(&mut self) {
        let Some(item) = self.app_state.selected else {
            return;
        };
        let (Some(top), Some(row)) = (self.grid.offset_of_item(item), self.grid.row_of_item(item)) else {
            return;
        };
        let height = self.grid.row_height(row).get();
        let state = std::mem::take(&mut self.app_state);
        self.app_state = scroll_into_view(state, top.get(), height, self.viewport());
    }
}

/// Initialize and run the TUI application with input source and config
///
/// This is the main entry point for the TUI. It handles terminal
/// setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_source(
    input_source: InputSource,
    config: &ResolvedConfig,
    colors: ColorConfig,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(input_source, config, CardStyles::with_color_config(colors))?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
