use anyhow::{Context, Result};
use crossterm::{
    event::{
        Event, EventStream, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::game::{GameConfig, Intent, RoundState, SharedSimulation, SnakeSimulation, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at ~30 FPS
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal session around one simulation
pub struct PlayMode {
    config: GameConfig,
    simulation: SharedSimulation,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    last_round: RoundState,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Self {
        let simulation = SharedSimulation::new(SnakeSimulation::new(config.clone()));

        Self {
            config,
            simulation,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            last_round: RoundState::Active,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;

        // Release events let a held pause key toggle only once
        let enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stderr,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .is_ok();
        self.input_handler = InputHandler::with_release_events(enhanced);
        debug!(enhanced, "keyboard setup");

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let scheduler = spawn_scheduler(self.simulation.clone(), &self.config);
        info!(
            grid_cells = self.config.grid_cells,
            tick_ms = self.config.tick_interval_ms,
            "session started"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        scheduler.abort();
        self.cleanup_terminal(&mut terminal, enhanced)?;
        info!(
            games = self.metrics.games_played,
            best = self.metrics.best_score,
            "session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.simulation.snapshot();
                    self.observe_round(snapshot.state, snapshot.score);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
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
            match self.input_handler.handle_key_event(key) {
                KeyAction::Intent(Intent::Restart) => {
                    self.simulation.reset();
                    self.metrics.on_game_start();
                    self.last_round = RoundState::Active;
                }
                KeyAction::Intent(intent) => self.simulation.apply(intent),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Track round transitions seen between frames
    fn observe_round(&mut self, round: RoundState, score: u32) {
        self.metrics.update(round);

        if round == RoundState::Over && self.last_round != RoundState::Over {
            self.metrics.on_game_over(score);
        }
        self.last_round = round;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
        enhanced: bool,
    ) -> Result<()> {
        if enhanced {
            if let Err(err) = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags) {
                warn!(?err, "failed to pop keyboard enhancement flags");
            }
        }
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Drive `tick` at the configured cadence until aborted
///
/// Ticks keep coming while the round is paused or over; the simulation
/// skips them.
fn spawn_scheduler(simulation: SharedSimulation, config: &GameConfig) -> JoinHandle<()> {
    let period = config.tick_interval();

    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            if let TickOutcome::Ended(reason) = simulation.tick() {
                debug!(?reason, "scheduler observed round end");
            }
        }
    })
}
