//! Off-screen composition surface.
//!
//! A scroll viewport draws its children into a `Surface` sized to the
//! viewport, then blits the result onto the real draw target. Pixels that were
//! cleared and never drawn stay transparent and are skipped by the blit, so
//! whatever lies underneath the viewport shows through.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Heap-backed RGB565 render target with per-pixel transparency.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    size: Size,
    pixels: Vec<Option<Rgb565>>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(size: Size) -> Self {
        let count = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![None; count],
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear_transparent(&mut self) {
        self.pixels.fill(None);
    }

    /// Color at `point`, or `None` when transparent or outside the surface.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point).and_then(|idx| self.pixels[idx])
    }

    /// Number of pixels holding a color.
    pub fn opaque_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    #[inline]
    fn index(&self, point: Point) -> Option<usize> {
        let w = self.size.width as i32;
        let h = self.size.height as i32;
        if point.x >= 0 && point.y >= 0 && point.x < w && point.y < h {
            Some(point.y as usize * self.size.width as usize + point.x as usize)
        } else {
            None
        }
    }

    /// Copy every opaque pixel onto `target`, with the surface origin at `origin`.
    pub fn blit<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let stride = self.size.width as usize;
        if stride == 0 {
            return Ok(());
        }

        let pixels = self.pixels.iter().enumerate().filter_map(move |(idx, color)| {
            color.map(|c| {
                let offset = Point::new((idx % stride) as i32, (idx / stride) as i32);
                Pixel(origin + offset, c)
            })
        });

        target.draw_iter(pixels)
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Surface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(idx) = self.index(coord) {
                self.pixels[idx] = Some(color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                if let Some(idx) = self.index(Point::new(x, y)) {
                    self.pixels[idx] = Some(color);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(Some(color));
        Ok(())
    }
}
