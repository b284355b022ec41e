use crate::foundation::error::{MorphError, MorphResult};

pub use image::{GrayImage, Luma, Rgb, RgbImage};
pub use kurbo::{Affine, Vec2};

/// Edge length (in pixels) of the square canvas shared by every chain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ImageSize(pub u32);

impl ImageSize {
    /// Smallest accepted canvas edge.
    pub const MIN: u32 = 8;
    /// Largest accepted canvas edge.
    pub const MAX: u32 = 8192;

    /// Validate and wrap a canvas edge length.
    pub fn new(px: u32) -> MorphResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&px) {
            return Err(MorphError::validation(format!(
                "image size must be within [{}, {}], got {px}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(px))
    }

    /// Edge length in pixels.
    pub fn px(self) -> u32 {
        self.0
    }

    /// Total pixel count of the square canvas.
    pub fn pixel_count(self) -> usize {
        (self.0 as usize).saturating_mul(self.0 as usize)
    }

    /// All-background image of this size.
    pub fn blank(self) -> RgbImage {
        RgbImage::new(self.0, self.0)
    }

    /// Whether `img` is square with this edge length.
    pub fn matches(self, img: &RgbImage) -> bool {
        img.width() == self.0 && img.height() == self.0
    }
}

/// Pixel coordinate inside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Clamp into a canvas of the given size.
    pub fn clamp_to(self, size: ImageSize) -> Self {
        let max = size.px().saturating_sub(1);
        Self {
            x: self.x.min(max),
            y: self.y.min(max),
        }
    }

    /// Canvas center, used as the default selection.
    pub fn center(size: ImageSize) -> Self {
        Self {
            x: size.px() / 2,
            y: size.px() / 2,
        }
    }
}

/// Rotation and uniform scale about an anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotateScale {
    pub rotation_rad: f64,
    pub scale: f64,
    pub anchor: Vec2, // pivot in image space
}

impl RotateScale {
    pub fn to_affine(self) -> Affine {
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_scale = Affine::scale(self.scale);

        // T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_anchor * t_rotate * t_scale * t_unanchor
    }

    /// Row-major 3x3 matrix of the forward mapping.
    pub fn to_row_major(self) -> [f32; 9] {
        let [a, b, c, d, e, f] = self.to_affine().as_coeffs();
        [
            a as f32, c as f32, e as f32, b as f32, d as f32, f as f32, 0.0, 0.0, 1.0,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
