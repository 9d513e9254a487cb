use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::canvas::Surface;

const BRAILLE_BASE: u32 = 0x2800;
const DOT_WIDTH: u32 = 2;
const DOT_HEIGHT: u32 = 4;
/// Minimum alpha for a dot to count as inked
const INK_THRESHOLD: u8 = 64;

/// Bit of the braille pattern for dot column `dx` and row `dy` of a cell
fn dot_bit(dx: u32, dy: u32) -> u8 {
    let index = match (dx, dy) {
        (0, 0) => 0,
        (0, 1) => 1,
        (0, 2) => 2,
        (0, 3) => 6,
        (1, 0) => 3,
        (1, 1) => 4,
        (1, 2) => 5,
        (1, 3) => 7,
        _ => return 0,
    };
    1 << index
}

/// Draws a surface as braille, one logical pixel per dot
pub struct BrailleCanvas<'a> {
    surface: &'a Surface,
    ink: Color,
}

impl<'a> BrailleCanvas<'a> {
    pub fn new(surface: &'a Surface, ink: Color) -> Self {
        Self { surface, ink }
    }

    /// Dot pattern of the terminal cell at (`cx`, `cy`) within the canvas
    pub fn cell_pattern(&self, cx: u32, cy: u32) -> u8 {
        let mut dots = 0u8;
        for dy in 0..DOT_HEIGHT {
            for dx in 0..DOT_WIDTH {
                let x = cx * DOT_WIDTH + dx;
                let y = cy * DOT_HEIGHT + dy;
                if self.surface.alpha_at(x, y) >= INK_THRESHOLD {
                    dots |= dot_bit(dx, dy);
                }
            }
        }
        dots
    }
}

impl Widget for BrailleCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for cy in 0..area.height {
            for cx in 0..area.width {
                let dots = self.cell_pattern(u32::from(cx), u32::from(cy));
                if dots == 0 {
                    continue;
                }
                let ch = char::from_u32(BRAILLE_BASE + u32::from(dots)).unwrap_or(' ');
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                    cell.set_char(ch).set_fg(self.ink);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Brush, Point};

    fn surface() -> Surface {
        Surface::new(8, 8, 1.0, Brush::default())
    }

    #[test]
    fn test_blank_surface_draws_nothing() {
        let surface = surface();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        BrailleCanvas::new(&surface, Color::Black).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_vertical_line_fills_left_column() {
        let mut surface = Surface::new(8, 8, 1.0, Brush { pen_width: 1.0, blur: 0.0, ..Brush::default() });
        surface.stroke_segment(Point::new(0.5, 0.5), Point::new(0.5, 3.5));
        let canvas = BrailleCanvas::new(&surface, Color::Black);
        let pattern = canvas.cell_pattern(0, 0);
        let left = dot_bit(0, 0) | dot_bit(0, 1) | dot_bit(0, 2) | dot_bit(0, 3);
        assert_eq!(pattern & left, left);
        assert_eq!(canvas.cell_pattern(2, 1), 0);

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        canvas.render(area, &mut buf);
        assert_ne!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(3, 1)].symbol(), " ");
    }
}
