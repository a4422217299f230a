use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEvent,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{Stderr, stderr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;

use crate::game::{GameConfig, TickEngine, TickResult};
use crate::input::{GestureTracker, InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, View};
use crate::session::{SessionMachine, SessionState};
use crate::settings::{Settings, save_settings};

/// Startup options for an interactive game.
#[derive(Debug, Clone)]
pub struct HumanOptions {
    pub settings: Settings,
    /// Where settings changes are written back to
    pub settings_path: PathBuf,
    /// Fixed grid size instead of fitting it to the terminal
    pub grid_override: Option<(usize, usize)>,
}

pub struct HumanMode {
    machine: SessionMachine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    gestures: GestureTracker,
    settings: Settings,
    settings_path: PathBuf,
    grid_override: Option<(usize, usize)>,
    screen: Rect,
    settings_open: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(options: HumanOptions) -> Result<Self> {
        let screen = Rect::new(0, 0, 80, 24);
        let config = session_config(&options.settings, options.grid_override, screen);

        Ok(Self {
            machine: SessionMachine::new(TickEngine::new(config)?),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            gestures: GestureTracker::new(),
            settings: options.settings,
            settings_path: options.settings_path,
            grid_override: options.grid_override,
            screen,
            settings_open: false,
            should_quit: false,
        })
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

        let size = terminal.size().context("Failed to query terminal size")?;
        self.on_resize(size.width, size.height);

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

        // Render at 30 FPS (33ms per frame); ticks come from the session's own timer
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = self.machine.next_tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    let view = View {
                        machine: &self.machine,
                        metrics: &self.metrics,
                        settings: &self.settings,
                        settings_open: self.settings_open,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.handle_action(action);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.on_resize(width, height),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let Some(direction) =
            self.gestures
                .handle_mouse_event(mouse, self.screen.width, self.screen.height)
        {
            self.handle_action(KeyAction::Steer(direction));
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::ToggleTheme => {
                self.settings.toggle_theme();
                self.persist_settings();
            }
            KeyAction::ToggleSettings => {
                if !self.settings_open && self.machine.pause() {
                    self.metrics.on_pause();
                }
                self.settings_open = !self.settings_open;
            }
            KeyAction::Faster
            | KeyAction::Slower
            | KeyAction::FinerGrid
            | KeyAction::CoarserGrid
            | KeyAction::ToggleWalls
                if self.settings_open =>
            {
                self.adjust_settings(action);
            }
            // Gameplay is frozen behind the settings panel
            _ if self.settings_open => {}
            KeyAction::Steer(direction) => {
                self.machine.steer(direction);
            }
            KeyAction::Confirm => match self.machine.state() {
                SessionState::Start => self.start_game(),
                SessionState::GameOver => self.restart_game(),
                _ => {}
            },
            KeyAction::TogglePause => {
                if self.machine.pause() {
                    self.metrics.on_pause();
                } else if self.machine.resume() {
                    self.metrics.on_resume();
                }
            }
            KeyAction::Restart => match self.machine.state() {
                SessionState::Start => self.start_game(),
                _ => self.restart_game(),
            },
            _ => {}
        }
    }

    fn adjust_settings(&mut self, action: KeyAction) {
        match action {
            KeyAction::Faster => self.settings.faster(),
            KeyAction::Slower => self.settings.slower(),
            KeyAction::FinerGrid => self.settings.finer_grid(),
            KeyAction::CoarserGrid => self.settings.coarser_grid(),
            KeyAction::ToggleWalls => self.settings.toggle_walls(),
            _ => return,
        }
        self.persist_settings();
        self.refresh_config();
    }

    fn update_game(&mut self) {
        if let Some(TickResult::GameOver(summary)) = self.machine.on_tick() {
            self.metrics.on_game_over(summary.score);
        }
    }

    fn start_game(&mut self) {
        if self.machine.start() {
            self.metrics.on_game_start();
        }
    }

    fn restart_game(&mut self) {
        // An abandoned session still counts towards the best score
        if matches!(
            self.machine.state(),
            SessionState::Running | SessionState::Paused
        ) {
            self.metrics.on_game_over(self.machine.game().score());
        }
        self.refresh_config();
        if self.machine.restart() {
            self.metrics.on_game_start();
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        self.refresh_config();
    }

    /// Hand the latest preferences to the session; they take effect on the
    /// next (re)start.
    fn refresh_config(&mut self) {
        let config = session_config(&self.settings, self.grid_override, self.screen);
        if let Err(err) = self.machine.apply_config(config) {
            warn!("keeping previous game configuration: {:#}", err);
        }
    }

    fn persist_settings(&self) {
        if let Err(err) = save_settings(&self.settings, &self.settings_path) {
            warn!("{:#}", err);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn session_config(
    settings: &Settings,
    grid_override: Option<(usize, usize)>,
    screen: Rect,
) -> GameConfig {
    let (cells_wide, cells_high) = Renderer::play_area(screen);
    let mut config = settings.game_config(cells_wide, cells_high);
    if let Some((width, height)) = grid_override {
        config.grid_width = width;
        config.grid_height = height;
    }
    config
}
