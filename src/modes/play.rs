use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::game::{Action, Direction, GameConfig, GameEngine, GameOverSummary, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// One-shot tick timer. Re-armed only after a tick's work and render have
/// finished, so a slow frame pushes the next tick back instead of letting
/// ticks bunch up. The interval is re-read on every arm, which is how the
/// score-driven speedup takes effect.
struct TickClock {
    deadline: Instant,
}

impl TickClock {
    fn starting_in(interval: Duration) -> Self {
        Self {
            deadline: Instant::now() + interval,
        }
    }

    async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }

    fn arm(&mut self, interval: Duration) {
        self.deadline = Instant::now() + interval;
    }
}

pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
    /// Summary of the run that just ended, shown until the player steers
    last_run: Option<GameOverSummary>,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.new_session();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
            last_run: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            food_eaten = self.metrics.total_food_eaten,
            "session finished"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut clock = TickClock::starting_in(self.state.tick_interval);

        // First frame before the first tick fires
        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick, one frame per tick
                _ = clock.expired() => {
                    self.advance_tick();
                    self.draw(terminal)?;
                    clock.arm(self.state.tick_interval);
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(dir) => {
                    self.pending_direction = Some(dir);
                    // Steering after a crash dismisses the banner
                    self.last_run = None;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn advance_tick(&mut self) {
        let action = self
            .pending_direction
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        self.pending_direction = None;

        let outcome = self.engine.step(&mut self.state, action);

        if outcome.eaten > 0 {
            self.metrics.on_food_eaten(outcome.eaten);
        }

        // The engine has already swapped in a fresh session; bookkeeping
        // and the banner are all that is left to do here
        if let Some(summary) = outcome.game_over {
            self.metrics.on_game_over(summary.final_score);
            self.metrics.on_game_start();
            self.last_run = Some(summary);
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics.update();
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, &self.state, &self.metrics, self.last_run.as_ref());
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
