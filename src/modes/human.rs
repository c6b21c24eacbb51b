use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, GameEvent};
use crate::input::{InputAction, InputHandler};
use crate::metrics::GameMetrics;
use crate::render::{BoardRenderer, Hud, Renderer};
use crate::storage::KeyValueStore;

use super::scheduler::TickScheduler;

pub struct HumanMode<S: KeyValueStore> {
    engine: GameEngine<S>,
    hud: Hud,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: KeyValueStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S, min_swipe: f64) -> Self {
        let renderer = Renderer::new(
            BoardRenderer::new(config.grid_size, config.show_grid),
            config.surface_size(),
        );
        let engine = GameEngine::new(config, store);

        let mut mode = Self {
            engine,
            hud: Hud::new(),
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(min_swipe),
            should_quit: false,
        };
        mode.drain_events();
        mode
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut scheduler = TickScheduler::new();
        scheduler.schedule(self.engine.tick_delay());

        // Redraw at 30 FPS so the clock and toasts stay current between ticks
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        log::info!(
            "session started on a {0}x{0} grid, best score {1}",
            self.engine.config().tile_count,
            self.engine.high_score()
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => log::warn!("terminal event error: {}", err),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, then render, then schedule the next one
                _ = scheduler.fired() => {
                    self.update_game();
                    self.draw(terminal)?;
                    scheduler.schedule(self.engine.tick_delay());
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.draw(terminal)?;
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

        scheduler.cancel();
        log::info!(
            "session ended after {} games, best score {}",
            self.metrics.games_played,
            self.engine.high_score()
        );
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let now = Instant::now();
        self.metrics.update_at(self.engine.phase(), now);
        self.hud.expire(now);

        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, self.engine.state(), &self.hud, &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.input_handler.handle_mouse_event(mouse),
            _ => InputAction::None,
        };

        self.handle_action(action);
    }

    fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Turn(direction) => {
                if !self.engine.set_direction(direction) {
                    log::trace!("ignored turn {:?}", direction);
                }
            }
            InputAction::TogglePause => {
                self.metrics.update(self.engine.phase());
                self.engine.toggle_pause();
            }
            InputAction::Restart => {
                self.reset_game();
            }
            InputAction::Quit => {
                self.should_quit = true;
            }
            InputAction::None => {}
        }
    }

    fn update_game(&mut self) {
        self.metrics.update(self.engine.phase());
        self.engine.tick();
        self.drain_events();
    }

    /// Feed engine events to the display sinks
    fn drain_events(&mut self) {
        for event in self.engine.take_events() {
            if matches!(event, GameEvent::GameOver { .. } | GameEvent::Victory { .. }) {
                self.metrics.on_game_over();
            }
            self.hud.apply(&event);
        }
    }

    fn reset_game(&mut self) {
        self.engine.restart();
        self.hud.clear_notices();
        self.metrics.on_game_start();
        self.drain_events();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
