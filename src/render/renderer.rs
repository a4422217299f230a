use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::theme::Palette;
use crate::game::{CollisionType, GameState, GameSummary, Position, moves_per_second};
use crate::metrics::GameMetrics;
use crate::session::{SessionMachine, SessionState};
use crate::settings::Settings;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;
/// Each tile is drawn two columns wide so it looks roughly square.
const TILE_WIDTH: u16 = 2;

/// Everything one frame needs; the renderer never mutates game state.
pub struct View<'a> {
    pub machine: &'a SessionMachine,
    pub metrics: &'a GameMetrics,
    pub settings: &'a Settings,
    pub settings_open: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Number of tiles that fit on a screen of the given size, once the
    /// header, footer and grid border are taken out.
    pub fn play_area(screen: Rect) -> (u16, u16) {
        let width = screen.width.saturating_sub(2) / TILE_WIDTH;
        let height = screen
            .height
            .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + 2);
        (width, height)
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let palette = view.settings.theme.palette();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        frame.render_widget(
            Block::default().style(Style::default().bg(palette.background)),
            frame.area(),
        );

        let game = view.machine.game();
        frame.render_widget(self.render_stats(game, view.metrics, &palette), chunks[0]);

        match view.machine.state() {
            SessionState::Start => {
                frame.render_widget(self.render_start(&palette), chunks[1]);
            }
            SessionState::Running | SessionState::Paused if !grid_fits(game, chunks[1]) => {
                frame.render_widget(self.render_too_small(&palette), chunks[1]);
            }
            SessionState::Running => {
                frame.render_widget(self.render_grid(game, &palette), chunks[1]);
            }
            SessionState::Paused => {
                frame.render_widget(self.render_grid(game, &palette), chunks[1]);
                let popup = centered_rect(30, 7, chunks[1]);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_paused(&palette), popup);
            }
            SessionState::GameOver => {
                let summary = view.machine.last_summary().copied();
                frame.render_widget(self.render_game_over(summary, &palette), chunks[1]);
            }
        }

        if view.settings_open {
            let popup = centered_rect(44, 12, chunks[1]);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_settings(view.settings, &palette), popup);
        }

        frame.render_widget(
            self.render_controls(view.machine.state(), view.settings_open, &palette),
            chunks[2],
        );
    }

    fn render_grid(&self, state: &GameState, palette: &Palette) -> Paragraph<'static> {
        let head = state.snake.head();
        let lines: Vec<Line> = (0..state.grid_height)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid_width)
                    .map(|x| {
                        let pos = Position::new(x as i32, y as i32);
                        if pos == head {
                            Span::styled(
                                "██",
                                Style::default()
                                    .fg(palette.snake_head)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if state.snake.occupies(pos) {
                            Span::styled("▓▓", Style::default().fg(palette.snake_body))
                        } else if pos == state.food {
                            Span::styled(
                                "● ",
                                Style::default()
                                    .fg(palette.food)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled("· ", Style::default().fg(palette.grid))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let walls = if state.session.wall_mode.is_hard() {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(walls)
                    .border_style(Style::default().fg(palette.text))
                    .title(" Snake "),
            )
            .style(Style::default().bg(palette.background))
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        palette: &Palette,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(palette.accent);
        let value = Style::default().fg(palette.text);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(
                format!("{} moves/s", state.session.moves_per_second()),
                value,
            ),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_start(&self, palette: &Palette) -> Paragraph<'static> {
        let key = Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(palette.muted);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(palette.snake_head)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", key),
                Span::styled(" start", text),
            ]),
            Line::from(vec![
                Span::styled("O", key),
                Span::styled(" settings", text),
            ]),
            Line::from(vec![Span::styled("Q", key), Span::styled(" quit", text)]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(overlay_block(palette, palette.text))
    }

    /// Shown instead of a clipped playfield after the terminal shrank below
    /// the size of the running session's grid.
    fn render_too_small(&self, palette: &Palette) -> Paragraph<'static> {
        let lines = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "enlarge it or press R",
                Style::default().fg(palette.muted),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(palette.background))
    }

    fn render_paused(&self, palette: &Palette) -> Paragraph<'static> {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Space to resume, R to restart",
                Style::default().fg(palette.muted),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(overlay_block(palette, palette.accent))
    }

    fn render_game_over(&self, summary: Option<GameSummary>, palette: &Palette) -> Paragraph<'static> {
        let label = Style::default().fg(palette.accent);
        let value = Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default()
                    .fg(palette.food)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if let Some(summary) = summary {
            let cause = match summary.cause {
                CollisionType::Wall => "Hit the wall",
                CollisionType::SelfCollision => "Bit your own tail",
                CollisionType::BoardFull => "Board filled!",
            };
            lines.extend([
                Line::from(Span::styled(cause, Style::default().fg(palette.muted))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Score: ", label),
                    Span::styled(summary.score.to_string(), value),
                ]),
                Line::from(vec![
                    Span::styled("Speed: ", label),
                    Span::styled(format!("{} moves/s", summary.moves_per_second()), value),
                ]),
                Line::from(vec![
                    Span::styled("Length: ", label),
                    Span::styled(summary.length.to_string(), value),
                ]),
            ]);
        }

        lines.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(palette.muted)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(palette.snake_head)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(palette.muted)),
                Span::styled(
                    "Q",
                    Style::default()
                        .fg(palette.food)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(palette.muted)),
            ]),
        ]);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(overlay_block(palette, palette.food))
    }

    fn render_settings(&self, settings: &Settings, palette: &Palette) -> Paragraph<'static> {
        let label = Style::default().fg(palette.muted);
        let value = Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD);
        let key = Style::default().fg(palette.accent);

        let row = |name: &'static str, current: String, keys: &'static str| {
            Line::from(vec![
                Span::styled(format!("{:<14}", name), label),
                Span::styled(format!("{:<12}", current), value),
                Span::styled(keys, key),
            ])
        };

        let lines = vec![
            Line::from(""),
            row("Theme", settings.theme.name().to_string(), "T"),
            row(
                "Start speed",
                format!("{} moves/s", moves_per_second(settings.initial_interval_ms)),
                "+ / -",
            ),
            row(
                "Hard walls",
                if settings.hard_walls { "on" } else { "off" }.to_string(),
                "H",
            ),
            row(
                "Snake size",
                format!("{}%", settings.scale_percent()),
                "[ / ]",
            ),
            Line::from(""),
            Line::from(Span::styled(
                "Applies from the next game",
                Style::default().fg(palette.muted),
            )),
            Line::from(vec![
                Span::styled("O", key),
                Span::styled(" close", label),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(overlay_block(palette, palette.accent).title(" Settings "))
    }

    fn render_controls(
        &self,
        state: SessionState,
        settings_open: bool,
        palette: &Palette,
    ) -> Paragraph<'static> {
        let key = Style::default().fg(palette.accent);
        let text = Style::default().fg(palette.muted);

        let spans = if settings_open {
            vec![
                Span::styled("T H + - [ ]", key),
                Span::styled(" adjust | ", text),
                Span::styled("O", key),
                Span::styled(" close", text),
            ]
        } else {
            match state {
                SessionState::Start => vec![
                    Span::styled("Enter", key),
                    Span::styled(" start | ", text),
                    Span::styled("O", key),
                    Span::styled(" settings | ", text),
                    Span::styled("Q", key),
                    Span::styled(" quit", text),
                ],
                _ => vec![
                    Span::styled("↑↓←→", key),
                    Span::styled(" or ", text),
                    Span::styled("WASD", key),
                    Span::styled(" move | ", text),
                    Span::styled("Space", key),
                    Span::styled(" pause | ", text),
                    Span::styled("O", key),
                    Span::styled(" settings | ", text),
                    Span::styled("Q", key),
                    Span::styled(" quit", text),
                ],
            }
        };

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn overlay_block(palette: &Palette, border: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.overlay))
}

/// Whether the whole grid, border included, fits in `area`.
fn grid_fits(state: &GameState, area: Rect) -> bool {
    let width = state.grid_width.saturating_mul(TILE_WIDTH as usize) + 2;
    let height = state.grid_height + 2;
    width <= area.width as usize && height <= area.height as usize
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, TickEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(machine: &SessionMachine, settings_open: bool) -> String {
        draw_sized(machine, settings_open, 80, 30)
    }

    fn draw_sized(machine: &SessionMachine, settings_open: bool, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let metrics = GameMetrics::new();
        let settings = Settings::default();
        let view = View {
            machine,
            metrics: &metrics,
            settings: &settings,
            settings_open,
        };
        terminal
            .draw(|frame| Renderer::new().render(frame, &view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_play_area_excludes_chrome() {
        assert_eq!(Renderer::play_area(Rect::new(0, 0, 82, 40)), (40, 32));
        assert_eq!(Renderer::play_area(Rect::new(0, 0, 1, 1)), (0, 0));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(40, 40, area), area);
    }

    #[test]
    fn test_start_screen() {
        let machine = SessionMachine::new(TickEngine::with_seed(GameConfig::small(), 1).unwrap());
        let screen = draw(&machine, false);
        assert!(screen.contains("SNAKE"));
        assert!(screen.contains("Enter"));
    }

    #[tokio::test]
    async fn test_running_and_paused_screens() {
        let mut machine = SessionMachine::new(TickEngine::with_seed(GameConfig::small(), 1).unwrap());
        machine.start();
        let running = draw(&machine, false);
        assert!(running.contains("Score: 0"));
        assert!(running.contains("██"));
        assert!(!running.contains("PAUSED"));

        machine.pause();
        assert!(draw(&machine, false).contains("PAUSED"));
    }

    #[tokio::test]
    async fn test_shrunk_terminal_shows_notice_instead_of_clipped_grid() {
        let mut machine = SessionMachine::new(TickEngine::with_seed(GameConfig::small(), 1).unwrap());
        machine.start();

        // 10x10 grid needs 22x12 cells but only 24x6 are left for it
        let running = draw_sized(&machine, false, 24, 12);
        assert!(running.contains("Terminal too small"));
        assert!(!running.contains("██"));

        machine.pause();
        assert!(draw_sized(&machine, false, 24, 12).contains("Terminal too small"));

        // Exactly enough room: 22 wide, 12 + header + footer high
        machine.resume();
        let fits = draw_sized(&machine, false, 22, 18);
        assert!(!fits.contains("Terminal too small"));
        assert!(fits.contains("██"));
    }

    #[tokio::test]
    async fn test_game_over_shows_summary() {
        let config = GameConfig::small().with_wall_mode(crate::game::WallMode::Hard);
        let mut machine = SessionMachine::new(TickEngine::with_seed(config, 1).unwrap());
        machine.start();
        while machine.state() == SessionState::Running {
            machine.on_tick();
        }

        let screen = draw(&machine, false);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("moves/s"));
    }

    #[test]
    fn test_settings_panel() {
        let machine = SessionMachine::new(TickEngine::with_seed(GameConfig::small(), 1).unwrap());
        let screen = draw(&machine, true);
        assert!(screen.contains("Settings"));
        assert!(screen.contains("Hard walls"));
    }
}
