//! Replays a [`DisplayList`] onto a ratatui canvas
//!
//! The canvas only knows outlines, points and labels, so filled shapes are
//! drawn as stacks of horizontal lines. Translucent fills are not painted
//! themselves; they tint every shape drawn before them that they cover.

use ratatui::{
    style::{Color as TermColor, Style},
    symbols::Marker,
    text::Line as TextLine,
    widgets::canvas::{Canvas, Context, Line},
};

use super::surface::{Color, DisplayList, DrawCommand, Surface, TextAlign};

/// Axis-aligned bounds in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Bounds {
    fn contains(&self, other: &Bounds) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

fn bounds(command: &DrawCommand) -> Bounds {
    match command {
        DrawCommand::Clear {
            x,
            y,
            width,
            height,
        }
        | DrawCommand::Rect {
            x,
            y,
            width,
            height,
            ..
        } => Bounds {
            left: *x,
            top: *y,
            right: x + width,
            bottom: y + height,
        },
        DrawCommand::Circle { cx, cy, radius, .. } => Bounds {
            left: cx - radius,
            top: cy - radius,
            right: cx + radius,
            bottom: cy + radius,
        },
        DrawCommand::Line { x1, y1, x2, y2, .. } => Bounds {
            left: x1.min(*x2),
            top: y1.min(*y2),
            right: x1.max(*x2),
            bottom: y1.max(*y2),
        },
        DrawCommand::Text { x, y, .. } => Bounds {
            left: *x,
            top: *y,
            right: *x,
            bottom: *y,
        },
    }
}

fn translucent_fill(command: &DrawCommand) -> Option<Color> {
    match command {
        DrawCommand::Rect { color, .. } if !color.is_opaque() => Some(*color),
        _ => None,
    }
}

pub fn to_term_color(color: Color) -> TermColor {
    TermColor::Rgb(color.r, color.g, color.b)
}

/// Resolve the opaque color each command ends up with on screen
///
/// Returns `None` for translucent fills, which are folded into the others.
fn resolved_colors(list: &DisplayList, background: Color) -> Vec<Option<Color>> {
    let commands = list.commands();
    commands
        .iter()
        .enumerate()
        .map(|(i, command)| {
            if translucent_fill(command).is_some() {
                return None;
            }
            let own = match command {
                DrawCommand::Clear { .. } => background,
                DrawCommand::Rect { color, .. }
                | DrawCommand::Circle { color, .. }
                | DrawCommand::Line { color, .. }
                | DrawCommand::Text { color, .. } => color.over(background),
            };
            if matches!(command, DrawCommand::Text { .. }) {
                return Some(own);
            }
            let area = bounds(command);
            let tinted = commands[i + 1..]
                .iter()
                .filter_map(|later| translucent_fill(later).map(|tint| (tint, bounds(later))))
                .filter(|(_, cover)| cover.contains(&area))
                .fold(own, |color, (tint, _)| tint.over(color));
            Some(tinted)
        })
        .collect()
}

/// Horizontal line spacing, in surface pixels, for filled shapes
fn row_step(list: &DisplayList, rows: u16) -> f64 {
    // Half-block markers give two dots per terminal row
    let dots = (rows.max(1) as f64) * 2.0;
    (list.height() / dots / 2.0).max(0.5)
}

/// Build a canvas widget that paints `list` into an area of `columns` x `rows`
pub fn board_canvas<'a>(
    list: &'a DisplayList,
    background: Color,
    columns: u16,
    rows: u16,
) -> Canvas<'a, impl Fn(&mut Context<'_>) + 'a> {
    let colors = resolved_colors(list, background);
    let step = row_step(list, rows);
    let (width, height) = (list.width(), list.height());
    let px_per_column = width / columns.max(1) as f64;

    Canvas::default()
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .background_color(to_term_color(background))
        .paint(move |ctx| {
            for (command, color) in list.commands().iter().zip(colors.iter().copied()) {
                let Some(color) = color.map(to_term_color) else {
                    continue;
                };
                match command {
                    DrawCommand::Clear {
                        x,
                        y,
                        width,
                        height: h,
                    }
                    | DrawCommand::Rect {
                        x,
                        y,
                        width,
                        height: h,
                        ..
                    } => {
                        let mut py = y + step / 2.0;
                        while py < y + h {
                            ctx.draw(&Line::new(*x, height - py, x + width, height - py, color));
                            py += step;
                        }
                    }
                    DrawCommand::Circle { cx, cy, radius, .. } => {
                        let mut dy = -radius + step / 2.0;
                        while dy < *radius {
                            let half = (radius * radius - dy * dy).max(0.0).sqrt();
                            let py = height - (cy + dy);
                            ctx.draw(&Line::new(cx - half, py, cx + half, py, color));
                            dy += step;
                        }
                    }
                    DrawCommand::Line { x1, y1, x2, y2, .. } => {
                        ctx.draw(&Line::new(*x1, height - y1, *x2, height - y2, color));
                    }
                    DrawCommand::Text {
                        text, x, y, align, ..
                    } => {
                        let text_width = text.chars().count() as f64 * px_per_column;
                        let left = match align {
                            TextAlign::Left => *x,
                            TextAlign::Center => x - text_width / 2.0,
                            TextAlign::Right => x - text_width,
                        };
                        ctx.print(
                            left.max(0.0),
                            height - y,
                            TextLine::styled(text.clone(), Style::default().fg(color)),
                        );
                    }
                }
            }
        })
}
