use crate::engine::mask::Mask;
use crate::foundation::core::{PixelCoord, RgbImage};

/// Per-channel 256-bin histogram, `[r, g, b]`.
pub type Histogram = [[u32; 256]; 3];

/// Snapshot of the statistics a plotting front end charts after each step.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    pub iteration: u64,
    /// Per-channel intensity sums inside the mask, scaled to `[0, 1]`.
    pub color_sums: [f64; 3],
    pub selected: PixelCoord,
    pub selected_pixel: [u8; 3],
    pub histogram: Histogram,
}

/// Per-channel intensity sum inside `mask`, divided by `255 * area`.
///
/// An empty mask yields zeros.
pub fn color_sums(img: &RgbImage, mask: &Mask) -> [f64; 3] {
    debug_assert!(mask.size().matches(img), "mask and image sizes differ");
    let mut sums = [0u64; 3];
    for (px, inside) in img.as_raw().chunks_exact(3).zip(mask.as_slice()) {
        if *inside {
            for (s, v) in sums.iter_mut().zip(px) {
                *s += u64::from(*v);
            }
        }
    }
    let norm = mask.normalization();
    if norm <= 0.0 {
        return [0.0; 3];
    }
    sums.map(|s| s as f64 / norm)
}

/// Per-channel histogram of the pixels inside `mask`.
pub fn histogram(img: &RgbImage, mask: &Mask) -> Histogram {
    debug_assert!(mask.size().matches(img), "mask and image sizes differ");
    let mut hist = [[0u32; 256]; 3];
    for (px, inside) in img.as_raw().chunks_exact(3).zip(mask.as_slice()) {
        if !*inside {
            continue;
        }
        for (c, v) in px.iter().enumerate() {
            hist[c][*v as usize] += 1;
        }
    }
    hist
}

#[cfg(test)]
#[path = "../../tests/unit/engine/stats.rs"]
mod tests;
