//! Paints the board onto a pixel surface.

use crate::Coords;

/// Height of the hat's brim strip in pixels.
const BRIM_HEIGHT: u32 = 3;
/// How far the brim sticks out past the cell on each side.
const BRIM_OVERHANG: u32 = 2;

/// What a pixel shows. Colours are the presenter's business.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    Empty,
    Snake,
    Food,
}

pub trait Surface {
    fn clear(&mut self);

    /// Fills a rectangle; anything outside the surface is clipped.
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, paint: Paint);
}

/// In-memory surface, row-major.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Paint>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        PixelCanvas { width, height, pixels: vec![Paint::Empty; width as usize * height as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Paint {
        if x >= self.width || y >= self.height {
            return Paint::Empty;
        }

        self.pixels[(y * self.width + x) as usize]
    }
}

impl Surface for PixelCanvas {
    fn clear(&mut self) {
        for px in self.pixels.iter_mut() {
            *px = Paint::Empty;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, paint: Paint) {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = (x + width as i32).clamp(0, self.width as i32) as u32;
        let y1 = (y + height as i32).clamp(0, self.height as i32) as u32;

        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                self.pixels[row + px as usize] = paint;
            }
        }
    }
}

/// Clears `surface` and draws the snake cells and the food hat.
pub fn render<'a, S, I>(surface: &mut S, cell_size: u32, snake: I, food: Option<Coords>)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = &'a Coords>,
{
    surface.clear();
    let cell = cell_size as i32;

    for &(x, y) in snake {
        surface.fill_rect(x as i32 * cell, y as i32 * cell, cell_size, cell_size, Paint::Snake);
    }

    if let Some((x, y)) = food {
        let (left, top) = (x as i32 * cell, y as i32 * cell);
        let crown = cell_size.saturating_sub(BRIM_HEIGHT);

        surface.fill_rect(left, top, cell_size, crown, Paint::Food);
        surface.fill_rect(
            left - BRIM_OVERHANG as i32,
            top + crown as i32,
            cell_size + 2 * BRIM_OVERHANG,
            BRIM_HEIGHT,
            Paint::Food,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(canvas: &PixelCanvas, paint: Paint) -> usize {
        canvas.pixels.iter().filter(|px| **px == paint).count()
    }

    #[test]
    fn snake_cells_are_full_squares() {
        let mut canvas = PixelCanvas::new(225, 225);
        render(&mut canvas, 15, &[(7, 7), (6, 7)], None);

        assert_eq!(count(&canvas, Paint::Snake), 2 * 15 * 15);
        assert_eq!(canvas.pixel(105, 105), Paint::Snake);
        assert_eq!(canvas.pixel(90, 119), Paint::Snake);
        assert_eq!(canvas.pixel(120, 105), Paint::Empty);
    }

    #[test]
    fn food_is_crown_plus_wider_brim() {
        let mut canvas = PixelCanvas::new(225, 225);
        render(&mut canvas, 15, &[], Some((5, 5)));

        // Crown: 15 x 12 at (75, 75).
        assert_eq!(canvas.pixel(75, 75), Paint::Food);
        assert_eq!(canvas.pixel(89, 86), Paint::Food);
        assert_eq!(canvas.pixel(74, 80), Paint::Empty);
        // Brim: 19 x 3 at (73, 87).
        assert_eq!(canvas.pixel(73, 87), Paint::Food);
        assert_eq!(canvas.pixel(91, 89), Paint::Food);
        assert_eq!(canvas.pixel(92, 88), Paint::Empty);
        assert_eq!(canvas.pixel(80, 90), Paint::Empty);

        assert_eq!(count(&canvas, Paint::Food), 15 * 12 + 19 * 3);
    }

    #[test]
    fn brim_is_clipped_at_the_edge() {
        let mut canvas = PixelCanvas::new(225, 225);
        render(&mut canvas, 15, &[], Some((0, 14)));

        assert_eq!(canvas.pixel(0, 222), Paint::Food);
        assert_eq!(count(&canvas, Paint::Food), 15 * 12 + 17 * 3);
    }

    #[test]
    fn render_clears_previous_frame() {
        let mut canvas = PixelCanvas::new(225, 225);
        render(&mut canvas, 15, &[(1, 1)], Some((3, 3)));
        render(&mut canvas, 15, &[(2, 1)], None);

        assert_eq!(canvas.pixel(20, 20), Paint::Empty);
        assert_eq!(canvas.pixel(50, 50), Paint::Empty);
        assert_eq!(canvas.pixel(35, 20), Paint::Snake);
    }
}
