use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{ArenaView, EpisodeSummary, Phase, SnakeId};
use crate::metrics::GameMetrics;

const EMPTY: Color = Color::Black;
const FOOD: Color = Color::Red;

/// Playback state owned by the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub paused: bool,
    pub tick_ms: u64,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn snake_color(id: SnakeId) -> Color {
        match id {
            SnakeId::First => Color::Green,
            SnakeId::Second => Color::Yellow,
        }
    }

    fn head_color(id: SnakeId) -> Color {
        match id {
            SnakeId::First => Color::LightGreen,
            SnakeId::Second => Color::LightYellow,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        view: &ArenaView,
        metrics: &GameMetrics,
        playback: &Playback,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Arena
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(view, metrics, playback);
        frame.render_widget(stats, chunks[0]);

        match view.phase {
            Phase::Terminal(summary) => {
                let game_over = self.render_game_over(&summary);
                frame.render_widget(game_over, chunks[1]);
            }
            Phase::Running | Phase::Stopped => {
                let grid = self.render_grid(view);
                frame.render_widget(grid, Self::grid_area(chunks[1], view));
            }
        }

        let controls = self.render_controls(view.phase);
        frame.render_widget(controls, chunks[2]);
    }

    /// Centre the bordered grid inside `area`
    fn grid_area(area: Rect, view: &ArenaView) -> Rect {
        let width = (view.world.width() as u16).saturating_add(2).min(area.width);
        let height = (view.world.height().div_ceil(2) as u16)
            .saturating_add(2)
            .min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Colour of every grid cell, row-major. Snakes are painted over food.
    pub fn cell_colors(view: &ArenaView) -> Vec<Color> {
        let width = view.world.width();
        let mut cells = vec![EMPTY; width * view.world.height()];
        let index = |x: i32, y: i32| y as usize * width + x as usize;

        if view.world.in_bounds(view.food) {
            cells[index(view.food.x, view.food.y)] = FOOD;
        }
        for snake in &view.snakes {
            for (i, segment) in snake.body.iter().enumerate() {
                if !view.world.in_bounds(*segment) {
                    continue;
                }
                cells[index(segment.x, segment.y)] = if i == 0 {
                    Self::head_color(snake.id)
                } else {
                    Self::snake_color(snake.id)
                };
            }
        }
        cells
    }

    /// Two grid rows per text row: the upper half block takes the top cell's
    /// colour as foreground and the bottom cell's as background
    fn render_grid(&self, view: &ArenaView) -> Paragraph<'_> {
        let width = view.world.width();
        let height = view.world.height();
        let cells = Self::cell_colors(view);

        let lines: Vec<Line> = (0..height)
            .step_by(2)
            .map(|top| {
                let spans: Vec<Span> = (0..width)
                    .map(|x| {
                        let upper = cells[top * width + x];
                        let lower = if top + 1 < height {
                            cells[(top + 1) * width + x]
                        } else {
                            Color::Reset
                        };
                        Span::styled("▀", Style::default().fg(upper).bg(lower))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Two Snake Q-Learning "),
        )
    }

    fn render_stats(
        &self,
        view: &ArenaView,
        metrics: &GameMetrics,
        playback: &Playback,
    ) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for snake in &view.snakes {
            spans.push(Span::styled(
                format!("{}: ", snake.id),
                Style::default().fg(Self::snake_color(snake.id)),
            ));
            spans.push(Span::styled(
                snake.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(
                    " (best {}, wins {})    ",
                    metrics.high_score(snake.id),
                    metrics.wins[snake.id.index()]
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.extend([
            Span::styled("Episode: ", Style::default().fg(Color::Cyan)),
            Span::styled(view.episode.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Cyan)),
            Span::styled(view.ticks.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Cyan)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(
                format!("{}ms/tick", playback.tick_ms),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        if playback.paused {
            spans.push(Span::styled(
                "  PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, summary: &EpisodeSummary) -> Paragraph<'_> {
        let cause = match summary.crashed {
            Some(id) => format!("{} hit a wall!", id),
            None => "Episode ended".to_string(),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(cause),
            Line::from(""),
            Line::from(Span::styled(
                "Final Scores:",
                Style::default().fg(Color::Gray),
            )),
        ];
        for id in SnakeId::ALL {
            text.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", id),
                    Style::default().fg(Self::snake_color(id)),
                ),
                Span::styled(
                    summary.scores[id.index()].to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to exit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'_> {
        let line = match phase {
            Phase::Terminal(_) => Line::from(vec![
                Span::styled("Enter/R", Style::default().fg(Color::Green)),
                Span::raw(" restart | "),
                Span::styled("Space", Style::default().fg(Color::Red)),
                Span::raw(" exit"),
            ]),
            Phase::Running | Phase::Stopped => Line::from(vec![
                Span::styled("+/-", Style::default().fg(Color::Cyan)),
                Span::raw(" speed | "),
                Span::styled("P", Style::default().fg(Color::Cyan)),
                Span::raw(" pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
