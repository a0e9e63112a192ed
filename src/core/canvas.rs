//=========================================================================
// Canvas
//=========================================================================
//
// Software renderer handed to scenes during `render`.
//
// Architecture:
//   Scene::render(&mut Canvas) → RGBA8 framebuffer → Window::present()
//
// The scene manager never inspects the canvas; it only passes it through.
// All drawing is clipped to the framebuffer bounds.
//
//=========================================================================

//=== Dimensions ==========================================================

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

//=== Color ===============================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle with a signed origin.
///
/// Rectangles may extend past any canvas edge; drawing clips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if the point lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let right = self.x as i64 + self.w as i64;
        let bottom = self.y as i64 + self.h as i64;
        x >= self.x && (x as i64) < right && y >= self.y && (y as i64) < bottom
    }

    /// Clips against `[0, width) x [0, height)`.
    ///
    /// Returns `(x0, y0, x1, y1)` with exclusive upper bounds, or `None`
    /// when nothing is left.
    fn clip(&self, bounds: Dimensions) -> Option<(usize, usize, usize, usize)> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.w as i64).min(bounds.width as i64);
        let y1 = (self.y as i64 + self.h as i64).min(bounds.height as i64);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

//=== Canvas ==============================================================

/// RGBA8 framebuffer, row-major, top-left origin.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: Dimensions,
    pixels: Vec<u8>,
}

impl Canvas {
    //--- Construction -----------------------------------------------------

    /// Creates a canvas filled with opaque black.
    pub fn new(size: Dimensions) -> Self {
        let mut canvas = Self {
            size,
            pixels: vec![0; size.area() * 4],
        };
        canvas.clear(Color::BLACK);
        canvas
    }

    //--- Queries ----------------------------------------------------------

    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// Raw RGBA8 bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let px = &self.pixels[offset..offset + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    //--- Drawing ----------------------------------------------------------

    /// Fills the whole canvas.
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Sets a single pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset..offset + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Fills a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = rect.clip(self.size) else {
            return;
        };

        let bytes = color.to_bytes();
        let stride = self.size.width as usize * 4;
        for row in y0..y1 {
            let start = row * stride + x0 * 4;
            let end = row * stride + x1 * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&bytes);
            }
        }
    }

    /// Draws a one-pixel outline, clipped to the canvas.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }

        let right = (rect.x as i64 + rect.w as i64 - 1).min(i32::MAX as i64) as i32;
        let bottom = (rect.y as i64 + rect.h as i64 - 1).min(i32::MAX as i64) as i32;

        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, bottom, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(right, rect.y, 1, rect.h), color);
    }

    //--- Internal Helpers -------------------------------------------------

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some((y as usize * self.size.width as usize + x as usize) * 4)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
