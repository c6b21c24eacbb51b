use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GamePhase, GameState};
use crate::metrics::GameMetrics;

use super::board::BoardRenderer;
use super::canvas::board_canvas;
use super::hud::{Hud, NoticeKind};
use super::surface::DisplayList;

/// Lays out one terminal frame: stats header, board, controls and toasts
pub struct Renderer {
    board: BoardRenderer,
    surface_size: f64,
}

impl Renderer {
    pub fn new(board: BoardRenderer, surface_size: f64) -> Self {
        Self {
            board,
            surface_size,
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &Hud, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(state, hud, metrics);
        frame.render_widget(stats, chunks[0]);

        let outer = self.board_area(chunks[1]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(self.border_color(state.phase)))
            .title(" Snake ");
        let inner = block.inner(outer);
        frame.render_widget(block, outer);

        let mut surface = DisplayList::new(self.surface_size, self.surface_size);
        self.board.render(state, &mut surface);
        let canvas = board_canvas(
            &surface,
            self.board.palette().background,
            inner.width,
            inner.height,
        );
        frame.render_widget(canvas, inner);

        // Render footer with controls, or the latest notifications
        let footer = if hud.notices().next().is_some() {
            self.render_notices(hud)
        } else {
            self.render_controls(state.phase)
        };
        frame.render_widget(footer, chunks[2]);
    }

    /// Largest centered area that shows the square board as a square
    ///
    /// Terminal cells are roughly twice as tall as they are wide.
    fn board_area(&self, area: Rect) -> Rect {
        let rows = area.height.min(area.width / 2).max(3);
        let columns = rows.saturating_mul(2).min(area.width);
        Rect {
            x: area.x + (area.width - columns) / 2,
            y: area.y + (area.height.saturating_sub(rows)) / 2,
            width: columns,
            height: rows.min(area.height),
        }
    }

    fn border_color(&self, phase: GamePhase) -> Color {
        match phase {
            GamePhase::Over => Color::Red,
            GamePhase::Won => Color::Yellow,
            GamePhase::Paused => Color::DarkGray,
            _ => Color::White,
        }
    }

    fn render_stats(&self, state: &GameState, hud: &Hud, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                hud.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(hud.high_score().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Moves: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(state.phase.label(), Style::default().fg(Color::Cyan)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_notices(&self, hud: &Hud) -> Paragraph<'_> {
        let spans: Vec<Span> = hud
            .notices()
            .flat_map(|notice| {
                let color = match notice.kind {
                    NoticeKind::GameOver => Color::Red,
                    NoticeKind::Victory | NoticeKind::NewRecord => Color::Green,
                };
                [
                    Span::styled(
                        notice.message.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("   "),
                ]
            })
            .collect();

        Paragraph::new(vec![
            Line::from(spans),
            Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ])
        .alignment(Alignment::Center)
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'_> {
        let pause_label = if phase == GamePhase::Paused {
            " to resume | "
        } else {
            " to pause | "
        };

        let text = vec![
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" / "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" or drag the mouse to move"),
            ]),
            Line::from(vec![
                Span::styled("Space", Style::default().fg(Color::Cyan)),
                Span::raw(pause_label),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}
