//! App: terminal init, main loop, clock ticks and input handling.

use crate::game::{GameState, MoveOutcome};
use crate::input::{Action, key_to_action, move_cursor};
use crate::theme::Theme;
use crate::ui::{self, View};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Render at roughly 60 FPS.
const FRAME_DURATION: Duration = Duration::from_millis(16);
/// Upper bound on clock ticks run in one frame after a stall.
const MAX_CATCH_UP_TICKS: u32 = 8;

pub struct App {
    state: GameState,
    theme: Theme,
    no_animation: bool,
    paused: bool,
    /// Board cell highlighted for keyboard selection.
    cursor: usize,
    last_tick: Instant,
    /// TachyonFX fade over uncaptured cells (created when a game is lost).
    loss_effect: Option<Effect>,
    /// Last time we processed the loss effect (for delta).
    loss_effect_process_time: Option<Instant>,
    /// Frame area of the last draw, for mouse hit-testing.
    last_area: Rect,
}

impl App {
    pub fn new(state: GameState, theme: Theme, no_animation: bool) -> Self {
        Self {
            state,
            theme,
            no_animation,
            paused: false,
            cursor: 0,
            last_tick: Instant::now(),
            loss_effect: None,
            loss_effect_process_time: None,
            last_area: Rect::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        log::debug!("terminal ready, {:?}", terminal.size()?);

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let view = View {
                cursor: self.cursor,
                paused: self.paused,
                animate: !self.no_animation,
            };
            let completed = terminal.draw(|f| {
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    view,
                    &mut self.loss_effect,
                    &mut self.loss_effect_process_time,
                    now,
                )
            })?;
            self.last_area = completed.area;

            let timeout = FRAME_DURATION.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if !self.handle_action(key_to_action(key))? {
                                return Ok(());
                            }
                        }
                        Event::Mouse(mouse) => self.handle_mouse(mouse),
                        _ => {}
                    }
                }
            }

            if !self.paused {
                self.run_ticks();
            }
        }
    }

    /// Apply one action. Returns false when the player quits.
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        if self.paused && !matches!(action, Action::Pause | Action::Quit) {
            return Ok(true);
        }
        match action {
            Action::Quit => return Ok(false),
            Action::Pause => {
                self.paused = !self.paused;
                if !self.paused {
                    // Time spent paused is not owed to the clock.
                    self.last_tick = Instant::now();
                }
                log::debug!("paused: {}", self.paused);
            }
            Action::Reset => {
                self.state.reset()?;
                self.cursor = self.cursor.min(self.state.grid().len().saturating_sub(1));
                self.loss_effect = None;
                self.loss_effect_process_time = None;
                self.last_tick = Instant::now();
            }
            Action::Choose(color) => {
                let outcome = self.state.choose_color(color);
                self.log_move(outcome);
            }
            Action::ChooseAtCursor => {
                let outcome = self.state.choose_cell(self.cursor);
                self.log_move(outcome);
            }
            Action::CursorLeft | Action::CursorRight | Action::CursorUp | Action::CursorDown => {
                self.cursor = move_cursor(self.cursor, self.state.grid().size(), action);
            }
            Action::None => {}
        }
        Ok(true)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse;
        if self.paused || kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(index) = ui::cell_at(self.last_area, self.state.grid().size(), column, row) {
            self.cursor = index;
            let outcome = self.state.choose_cell(index);
            self.log_move(outcome);
        }
    }

    fn log_move(&self, outcome: MoveOutcome) {
        if let MoveOutcome::Accepted { absorbed } = outcome {
            log::trace!(
                "move accepted: {} absorbed, {} queued for reveal",
                absorbed,
                self.state.pending_reveal()
            );
        }
    }

    /// Fixed-step clock: one game tick per elapsed tick interval, bounded per frame.
    fn run_ticks(&mut self) {
        let interval = self.state.config().tick_interval;
        let mut ticks = 0;
        while self.last_tick.elapsed() >= interval {
            if ticks == MAX_CATCH_UP_TICKS {
                self.last_tick = Instant::now();
                break;
            }
            self.state.tick(interval);
            self.last_tick += interval;
            ticks += 1;
        }
    }
}
