//! Monochrome framebuffer with change tracking.
//!
//! Pages draw into this RAM copy of the panel. After a frame is complete only
//! the bounding box of changed pixels is pushed to the SH1107.
//!
//! Pixels are packed the way the controller stores them: one byte holds a
//! vertical run of eight pixels, and byte `(y / 8) * WIDTH + x` covers
//! column `x` of page `y / 8`.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use log::debug;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

const WIDTH: usize = DISPLAY_WIDTH_PX as usize;
const HEIGHT: usize = DISPLAY_HEIGHT_PX as usize;

/// Bytes in one frame (128 x 128 / 8 = 2048)
pub const FRAME_BYTES: usize = WIDTH * HEIGHT / 8;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// 1-bit framebuffer implementing `DrawTarget<Color = BinaryColor>`.
///
/// Fits in a fixed 2 KiB array, so it can live in a `static` or on the
/// stack of the display task.
pub struct FrameBuffer {
    bytes: [u8; FRAME_BYTES],
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// All pixels off, nothing dirty
    pub const fn new() -> Self {
        Self {
            bytes: [0; FRAME_BYTES],
            dirty: None,
        }
    }

    #[inline]
    fn locate(x: usize, y: usize) -> (usize, u8) {
        ((y / 8) * WIDTH + x, 1 << (y % 8))
    }

    /// Write a single pixel, expanding the dirty rect only if it changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let (idx, mask) = Self::locate(x, y);
        let before = self.bytes[idx];
        let after = if color.is_on() {
            before | mask
        } else {
            before & !mask
        };

        if before != after {
            self.bytes[idx] = after;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Colour at `(x, y)`; off-screen coordinates read as off
    pub fn pixel(&self, x: i32, y: i32) -> BinaryColor {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return BinaryColor::Off;
        }
        let (idx, mask) = Self::locate(x as usize, y as usize);
        BinaryColor::from(self.bytes[idx] & mask != 0)
    }

    /// Number of lit pixels inside `area`
    pub fn lit_pixels_in(&self, area: &Rectangle) -> usize {
        area.points()
            .filter(|p| self.pixel(p.x, p.y).is_on())
            .count()
    }

    /// Raw page-packed frame, in controller order
    pub fn as_bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }

    /// Whether anything changed since the last flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Changed region since the last flush
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(|rect| {
            Rectangle::new(
                Point::new(rect.min_x as i32, rect.min_y as i32),
                Size::new(
                    (rect.max_x - rect.min_x + 1) as u32,
                    (rect.max_y - rect.min_y + 1) as u32,
                ),
            )
        })
    }

    /// Flush the dirty region to a display, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(area) = self.dirty_area() else {
            return Ok(());
        };

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, area.top_left.x, area.top_left.y
        );

        let frame = &*self;
        let colors = area.points().map(|p| frame.pixel(p.x, p.y));
        display.fill_contiguous(&area, colors)?;

        self.dirty = None;
        Ok(())
    }

    fn clip(area: &Rectangle) -> Option<(core::ops::Range<usize>, core::ops::Range<usize>)> {
        let screen = Rectangle::new(Point::zero(), Size::new(WIDTH as u32, HEIGHT as u32));
        let visible = area.intersection(&screen);
        let bottom_right = visible.bottom_right()?;

        Some((
            visible.top_left.x as usize..bottom_right.x as usize + 1,
            visible.top_left.y as usize..bottom_right.y as usize + 1,
        ))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < WIDTH
                && (coord.y as usize) < HEIGHT
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some((xs, ys)) = Self::clip(area) else {
            return Ok(());
        };

        for y in ys {
            for x in xs.clone() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
