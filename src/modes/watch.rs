//! Interactive mode for watching the snakes learn
//!
//! Renders the arena in the terminal while both snakes keep learning. When a
//! snake hits a wall the tables are saved and the game-over screen waits for
//! the operator.
//!
//! # Controls
//!
//! - Enter / R: Restart after game over
//! - Space: Exit after game over
//! - +/-: Faster / slower ticks
//! - P: Pause/unpause
//! - Q/Esc: Quit (saves tables if an episode is running)

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::warn;

use crate::game::{Arena, Decision, GameConfig, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Playback, Renderer};
use crate::rl::{QLearningConfig, QTableStore};

const MIN_TICK_MS: u64 = 10;
const MAX_TICK_MS: u64 = 1000;

pub struct WatchMode<R: Rng, S: QTableStore> {
    arena: Arena<R, S>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    playback: Playback,
    should_quit: bool,
}

impl<R: Rng, S: QTableStore> WatchMode<R, S> {
    pub fn new(config: GameConfig, learning: QLearningConfig, store: S, rng: R) -> Self {
        let playback = Playback {
            paused: false,
            tick_ms: config.tick_ms,
        };

        Self {
            arena: Arena::new(config, learning, store, rng),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            playback,
            should_quit: false,
        }
    }

    pub fn arena(&self) -> &Arena<R, S> {
        &self.arena
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
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

        // Save whatever was learned in an unfinished episode
        self.arena
            .shutdown()
            .context("Failed to save q-tables on exit")?;

        let [first, second] = self.arena.scores();
        println!("\nFinal Scores:");
        println!("Snake 1: {}", first);
        println!("Snake 2: {}", second);

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_ms = self.playback.tick_ms;
        let mut tick_timer = interval(Duration::from_millis(tick_ms));

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Simulation tick
                _ = tick_timer.tick() => {
                    if !self.playback.paused {
                        self.update_game()?;
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let view = self.arena.view();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view, &self.metrics, &self.playback);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit || self.arena.is_stopped() {
                break;
            }

            if self.playback.tick_ms != tick_ms {
                tick_ms = self.playback.tick_ms;
                tick_timer = interval(Duration::from_millis(tick_ms));
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

            let action = self.input_handler.handle_key_event(key);
            self.apply_key_action(action);
        }
    }

    fn apply_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Restart => {
                if self.arena.resolve(Decision::Restart) {
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Exit => {
                self.arena.resolve(Decision::Exit);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::TogglePause => {
                self.playback.paused = !self.playback.paused;
            }
            KeyAction::SpeedUp => {
                self.playback.tick_ms = (self.playback.tick_ms / 2).max(MIN_TICK_MS);
            }
            KeyAction::SlowDown => {
                self.playback.tick_ms = (self.playback.tick_ms * 2).min(MAX_TICK_MS);
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) -> Result<()> {
        let was_running = self.arena.is_running();

        if let Err(err) = self.arena.tick() {
            // The episode is over either way; keep the prompt up
            warn!(error = %err, "failed to save q-tables");
        }

        if was_running {
            if let Phase::Terminal(summary) = self.arena.phase() {
                self.metrics.on_game_over(&summary);
            }
        }

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
