//! Character-grid widget for render cells.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use universe_game::RenderCell;

/// Paints render cells into an area, clipping anything that does not fit.
pub struct MapWidget<'a> {
    cells: &'a [RenderCell],
}

impl<'a> MapWidget<'a> {
    pub const fn new(cells: &'a [RenderCell]) -> Self {
        Self { cells }
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for cell in self.cells {
            let (Ok(dx), Ok(dy)) = (u16::try_from(cell.screen_x), u16::try_from(cell.screen_y))
            else {
                continue;
            };
            if dx >= area.width || dy >= area.height {
                continue;
            }
            if let Some(target) = buf.cell_mut((area.x + dx, area.y + dy)) {
                target
                    .set_char(cell.symbol)
                    .set_fg(rgb(cell.fg))
                    .set_bg(rgb(cell.bg));
            }
        }
    }
}

const fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
