use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// A position in surface-local logical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Pen,
    Eraser,
}

impl ToolMode {
    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Pen => "Pen",
            ToolMode::Eraser => "Eraser",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// Paint over existing pixels
    SourceOver,
    /// Remove existing alpha where the source covers
    DestinationOut,
}

/// Fixed brush parameters for both modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub pen_width: f32,
    pub eraser_width: f32,
    pub pen_color: Rgba<u8>,
    pub blur: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            pen_width: 2.0,
            eraser_width: 12.0,
            pen_color: Rgba([31, 41, 55, 255]),
            blur: 1.0,
        }
    }
}

/// Parameters applied to every segment, in logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingContext {
    pub line_width: f32,
    pub color: Rgba<u8>,
    pub blur: f32,
    pub composite: Composite,
    /// Logical to backing pixel factor
    pub scale: f32,
}

/// Raster drawing surface. The backing image is the logical size times the
/// pixel ratio; callers always speak logical units.
pub struct Surface {
    width: u32,
    height: u32,
    pixel_ratio: f32,
    pixels: RgbaImage,
    brush: Brush,
    mode: ToolMode,
    context: DrawingContext,
}

impl Surface {
    pub fn new(width: u32, height: u32, pixel_ratio: f32, brush: Brush) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let backing_w = ((width as f32 * pixel_ratio).ceil() as u32).max(1);
        let backing_h = ((height as f32 * pixel_ratio).ceil() as u32).max(1);
        let mode = ToolMode::default();
        Self {
            width,
            height,
            pixel_ratio,
            pixels: RgbaImage::new(backing_w, backing_h),
            brush,
            mode,
            context: Self::context_for(&brush, mode, pixel_ratio),
        }
    }

    fn context_for(brush: &Brush, mode: ToolMode, scale: f32) -> DrawingContext {
        match mode {
            ToolMode::Pen => DrawingContext {
                line_width: brush.pen_width,
                color: brush.pen_color,
                blur: brush.blur,
                composite: Composite::SourceOver,
                scale,
            },
            ToolMode::Eraser => DrawingContext {
                line_width: brush.eraser_width,
                color: Rgba([0, 0, 0, 255]),
                blur: brush.blur,
                composite: Composite::DestinationOut,
                scale,
            },
        }
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn context(&self) -> &DrawingContext {
        &self.context
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        self.apply_context();
    }

    /// Re-derive the drawing context from the brush and the current mode
    pub fn apply_context(&mut self) {
        self.context = Self::context_for(&self.brush, self.mode, self.pixel_ratio);
    }

    /// Make every pixel transparent and re-apply the drawing parameters
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.apply_context();
    }

    /// Stroke one round-capped segment between two logical points
    pub fn stroke_segment(&mut self, from: Point, to: Point) {
        let ctx = self.context;
        let scale = ctx.scale;
        let (ax, ay) = (from.x * scale, from.y * scale);
        let (bx, by) = (to.x * scale, to.y * scale);
        let half = (ctx.line_width * scale / 2.0).max(0.5);
        let feather = (ctx.blur * scale).max(1.0);
        let reach = half + feather;

        let (w, h) = self.pixels.dimensions();
        let min_x = (ax.min(bx) - reach).floor().max(0.0) as u32;
        let min_y = (ay.min(by) - reach).floor().max(0.0) as u32;
        let max_x = (ax.max(bx) + reach).ceil().min(w as f32) as u32;
        let max_y = (ay.max(by) + reach).ceil().min(h as f32) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let d = distance_to_segment(x as f32 + 0.5, y as f32 + 0.5, ax, ay, bx, by);
                let coverage = (0.5 - (d - half) / feather).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let pixel = self.pixels.get_pixel_mut(x, y);
                match ctx.composite {
                    Composite::SourceOver => blend_over(pixel, ctx.color, coverage),
                    Composite::DestinationOut => erase(pixel, coverage),
                }
            }
        }
    }

    /// Composite `image` over the surface at its logical size
    pub fn draw_image(&mut self, image: &RgbaImage) {
        let (w, h) = self.pixels.dimensions();
        let resized;
        let source = if image.dimensions() == (w, h) {
            image
        } else {
            resized = imageops::resize(image, w, h, FilterType::Triangle);
            &resized
        };
        for (dst, src) in self.pixels.pixels_mut().zip(source.pixels()) {
            blend_over(dst, *src, 1.0);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }

    /// Number of backing pixels carrying any alpha
    pub fn ink_pixels(&self) -> usize {
        self.pixels.pixels().filter(|p| p[3] > 0).count()
    }

    /// Strongest alpha inside the backing block of one logical cell
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        let (w, h) = self.pixels.dimensions();
        let x0 = (x as f32 * self.pixel_ratio).floor() as u32;
        let y0 = (y as f32 * self.pixel_ratio).floor() as u32;
        let x1 = (((x + 1) as f32 * self.pixel_ratio).ceil() as u32).min(w);
        let y1 = (((y + 1) as f32 * self.pixel_ratio).ceil() as u32).min(h);
        let mut alpha = 0;
        for py in y0..y1 {
            for px in x0..x1 {
                alpha = alpha.max(self.pixels.get_pixel(px, py)[3]);
            }
        }
        alpha
    }
}

fn distance_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Straight-alpha source-over
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Destination-out: alpha can only go down, colour channels are untouched
fn erase(dst: &mut Rgba<u8>, coverage: f32) {
    let remaining = dst[3] as f32 * (1.0 - coverage);
    dst[3] = remaining.floor().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(40, 20, 2.0, Brush::default())
    }

    #[test]
    fn test_backing_is_scaled_by_pixel_ratio() {
        let s = surface();
        assert_eq!(s.logical_size(), (40, 20));
        assert_eq!(s.backing_size(), (80, 40));
        assert_eq!(s.context().scale, 2.0);
        assert!(s.is_blank());
    }

    #[test]
    fn test_pen_stroke_paints_along_segment() {
        let mut s = surface();
        s.stroke_segment(Point::new(5.0, 10.0), Point::new(35.0, 10.0));

        assert!(!s.is_blank());
        // Middle of the line, in backing pixels
        let center = s.pixels().get_pixel(40, 20);
        assert!(center[3] > 200);
        assert!(s.alpha_at(20, 10) >= center[3]);
        // Far from the line stays clear
        assert_eq!(s.pixels().get_pixel(40, 2)[3], 0);
    }

    #[test]
    fn test_segments_outside_surface_are_clipped() {
        let mut s = surface();
        s.stroke_segment(Point::new(-30.0, -30.0), Point::new(-10.0, -10.0));
        assert!(s.is_blank());
        s.stroke_segment(Point::new(-5.0, 10.0), Point::new(100.0, 10.0));
        assert!(!s.is_blank());
    }

    #[test]
    fn test_eraser_only_lowers_alpha() {
        let mut s = surface();
        s.stroke_segment(Point::new(5.0, 5.0), Point::new(35.0, 15.0));
        let before = s.pixels().clone();

        s.set_mode(ToolMode::Eraser);
        assert_eq!(s.context().composite, Composite::DestinationOut);
        s.stroke_segment(Point::new(20.0, 0.0), Point::new(20.0, 20.0));

        let mut removed = false;
        for (old, new) in before.pixels().zip(s.pixels().pixels()) {
            assert!(new[3] <= old[3]);
            assert_eq!(&old.0[..3], &new.0[..3]);
            removed |= new[3] < old[3];
        }
        assert!(removed);
    }

    #[test]
    fn test_eraser_on_blank_surface_stays_blank() {
        let mut s = surface();
        s.set_mode(ToolMode::Eraser);
        s.stroke_segment(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
        assert!(s.is_blank());
    }

    #[test]
    fn test_mode_switch_leaves_pixels_alone() {
        let mut s = surface();
        s.stroke_segment(Point::new(5.0, 5.0), Point::new(30.0, 5.0));
        let before = s.pixels().clone();
        s.set_mode(ToolMode::Eraser);
        s.set_mode(ToolMode::Pen);
        assert_eq!(s.pixels(), &before);
        assert_eq!(s.context().line_width, Brush::default().pen_width);
    }

    #[test]
    fn test_clear_keeps_mode_and_context() {
        let mut s = surface();
        s.stroke_segment(Point::new(5.0, 5.0), Point::new(30.0, 5.0));
        s.set_mode(ToolMode::Eraser);
        s.clear();
        assert!(s.is_blank());
        assert_eq!(s.mode(), ToolMode::Eraser);
        assert_eq!(s.context().line_width, Brush::default().eraser_width);
    }

    #[test]
    fn test_draw_image_resamples_to_backing() {
        let mut s = surface();
        let mut small = RgbaImage::new(40, 20);
        for pixel in small.pixels_mut() {
            *pixel = Rgba([200, 10, 10, 255]);
        }
        s.draw_image(&small);
        assert_eq!(s.ink_pixels(), 80 * 40);
    }
}
