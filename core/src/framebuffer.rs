use alloc::{vec, vec::Vec};
use embedded_graphics::{
    Pixel,
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions, Size},
};

/// Portrait phone panel.
pub const WIDTH: usize = 480;
pub const HEIGHT: usize = 800;

/// Pixels are stored as `0x00RRGGBB`, row major.
#[derive(Clone)]
pub struct Framebuffer {
    pixels: Vec<u32>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self { pixels: vec![0; WIDTH * HEIGHT] }
    }
}

fn pack(color: Rgb888) -> u32 {
    (u32::from(color.r()) << 16) | (u32::from(color.g()) << 8) | u32::from(color.b())
}

fn unpack(value: u32) -> Rgb888 {
    Rgb888::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

fn mix(a: u32, b: u32, weight: u32) -> u32 {
    (a * weight + b * (255 - weight)) / 255
}

impl Framebuffer {
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        Self::index(x, y).map(|i| unpack(self.pixels[i]))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if let Some(i) = Self::index(x, y) {
            self.pixels[i] = pack(color);
        }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < WIDTH && y < HEIGHT).then_some(y * WIDTH + x)
    }

    /// Mixes `other` over the current contents. `weight` 255 keeps only
    /// `other`, 0 leaves the framebuffer untouched.
    pub fn blend_from(&mut self, other: &Framebuffer, weight: u8) {
        let weight = u32::from(weight);
        for (dst, &src) in self.pixels.iter_mut().zip(other.pixels.iter()) {
            let r = mix((src >> 16) & 0xFF, (*dst >> 16) & 0xFF, weight);
            let g = mix((src >> 8) & 0xFF, (*dst >> 8) & 0xFF, weight);
            let b = mix(src & 0xFF, *dst & 0xFF, weight);
            *dst = (r << 16) | (g << 8) | b;
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(pack(color));
        Ok(())
    }
}
