use crate::foundation::core::{GrayImage, ImageSize, Luma, RgbImage};

/// Binary disc inscribed in the square canvas.
///
/// A pixel is inside when its center lies within the inscribed circle.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    size: ImageSize,
    inside: Vec<bool>,
    area: usize,
}

impl Mask {
    pub fn circle(size: ImageSize) -> Self {
        let n = size.px();
        let r = f64::from(n) / 2.0;
        let mut inside = Vec::with_capacity(size.pixel_count());
        for y in 0..n {
            let dy = f64::from(y) + 0.5 - r;
            for x in 0..n {
                let dx = f64::from(x) + 0.5 - r;
                inside.push(dx * dx + dy * dy <= r * r);
            }
        }
        let area = inside.iter().filter(|b| **b).count();
        Self { size, inside, area }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Whether `(x, y)` lies inside the disc. Out-of-canvas coordinates are outside.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x >= self.size.px() || y >= self.size.px() {
            return false;
        }
        self.inside[self.index(x, y)]
    }

    /// Number of pixels inside the disc.
    pub fn area(&self) -> usize {
        self.area
    }

    /// Largest possible per-channel intensity sum inside the disc (`255 * area`).
    pub fn normalization(&self) -> f64 {
        255.0 * self.area as f64
    }

    /// Row-major inside flags, one per pixel.
    pub fn as_slice(&self) -> &[bool] {
        &self.inside
    }

    /// Zero every pixel outside the disc.
    pub fn apply(&self, img: &mut RgbImage) {
        debug_assert!(self.size.matches(img), "mask and image sizes differ");
        let buf: &mut [u8] = img;
        for (px, inside) in buf.chunks_exact_mut(3).zip(&self.inside) {
            if !inside {
                px.fill(0);
            }
        }
    }

    /// 0/255 single-channel rendition, for debugging and export.
    pub fn as_image(&self) -> GrayImage {
        GrayImage::from_fn(self.size.px(), self.size.px(), |x, y| {
            Luma([if self.contains(x, y) { 255 } else { 0 }])
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.px() as usize + x as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/mask.rs"]
mod tests;
