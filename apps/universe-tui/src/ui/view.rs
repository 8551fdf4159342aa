//! Main game screen.

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use universe_game::{render_cells, Direction, GameState, Viewport};

use super::map::MapWidget;

/// Everything drawn in one frame.
pub struct GameView<'a> {
    state: &'a GameState,
    zoom: i32,
    facing: Direction,
    status: &'a str,
}

impl<'a> GameView<'a> {
    pub const fn new(state: &'a GameState, zoom: i32, facing: Direction, status: &'a str) -> Self {
        Self {
            state,
            zoom,
            facing,
            status,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: header, map, footer
        let sections = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Map
                Constraint::Length(3), // Footer
            ])
            .split(area);

        self.render_header(frame, sections[0]);
        self.render_map(frame, sections[1]);
        self.render_footer(frame, sections[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let state = self.state;
        let selected = state
            .selected_item
            .map_or_else(|| "-".to_string(), |kind| kind.name().to_string());

        let mut spans = vec![
            Span::styled(
                format!(" {} ", state.player_name),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| seed "),
            Span::styled(state.seed.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw(" | pos "),
            Span::styled(
                format!("{},{}", state.player.x, state.player.y),
                Style::default().fg(Color::White),
            ),
            Span::raw(" | chunk "),
            Span::styled(state.current_chunk.to_string(), Style::default().fg(Color::White)),
            Span::raw(format!(" | facing {:?} | holding ", self.facing)),
            Span::styled(selected, Style::default().fg(Color::Green)),
        ];
        if state.debug {
            let resident: Vec<String> = state
                .chunks
                .positions()
                .iter()
                .map(|pos| pos.x.to_string())
                .collect();
            spans.push(Span::styled(
                format!(" | resident [{}] | zoom {}", resident.join(" "), self.zoom),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(header, area);
    }

    fn render_map(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" World ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let zoomed = Viewport::for_zoom(self.zoom);
        let viewport = Viewport::with_size(
            zoomed.width.min(u32::from(inner.width)),
            zoomed.height.min(u32::from(inner.height)),
        )
        .centered_on(self.state.player);

        let cells = render_cells(self.state, &viewport);
        frame.render_widget(MapWidget::new(&cells), centered(inner, &viewport));
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let inventory: Vec<String> = self
            .state
            .inventory
            .iter()
            .enumerate()
            .map(|(slot, (kind, count))| format!("{}:{} x{count}", slot + 1, kind.name()))
            .collect();

        let mut spans = vec![
            Span::styled(" [arrows/wasd]", Style::default().fg(Color::Yellow)),
            Span::raw(" move "),
            Span::styled("[e]", Style::default().fg(Color::Yellow)),
            Span::raw(" dig "),
            Span::styled("[p]", Style::default().fg(Color::Yellow)),
            Span::raw(" place "),
            Span::styled("[+/-]", Style::default().fg(Color::Yellow)),
            Span::raw(" zoom "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw(" quit | "),
        ];
        if inventory.is_empty() {
            spans.push(Span::styled("inventory empty", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::raw(inventory.join("  ")));
        }
        if !self.status.is_empty() {
            spans.push(Span::styled(
                format!(" | {}", self.status),
                Style::default().fg(Color::Red),
            ));
        }

        let footer = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }
}

/// Sub-rectangle of `area` holding the viewport, centered.
fn centered(area: Rect, viewport: &Viewport) -> Rect {
    let width = u16::try_from(viewport.width).unwrap_or(area.width).min(area.width);
    let height = u16::try_from(viewport.height).unwrap_or(area.height).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_centered_in_area() {
        let area = Rect::new(1, 4, 40, 20);
        let rect = centered(area, &Viewport::with_size(20, 20));
        assert_eq!(rect, Rect::new(11, 4, 20, 20));

        let rect = centered(area, &Viewport::with_size(60, 10));
        assert_eq!(rect, Rect::new(1, 9, 40, 10));
    }
}
