use rayon::prelude::*;

use crate::engine::mask::Mask;
use crate::foundation::core::RgbImage;
use crate::foundation::error::{MorphError, MorphResult};
use crate::foundation::math::saturate_u8;

/// Per-pixel `Σ weight_i × image_i` inside `mask`, zero outside, written into `dst`.
///
/// Every layer must have the same dimensions as `dst` and the mask. An empty layer list yields
/// an all-zero image.
pub fn weighted_blend(
    layers: &[(&RgbImage, f64)],
    mask: &Mask,
    dst: &mut RgbImage,
) -> MorphResult<()> {
    if !mask.size().matches(dst) {
        return Err(MorphError::evaluation(format!(
            "blend target is {}x{}, mask is {}",
            dst.width(),
            dst.height(),
            mask.size().px()
        )));
    }
    if let Some((img, _)) = layers.iter().find(|(img, _)| img.dimensions() != dst.dimensions()) {
        return Err(MorphError::evaluation(format!(
            "blend layer is {}x{}, expected {}x{}",
            img.width(),
            img.height(),
            dst.width(),
            dst.height()
        )));
    }

    let inside = mask.as_slice();
    let buf: &mut [u8] = dst;
    buf.par_chunks_exact_mut(3)
        .zip(inside.par_iter())
        .enumerate()
        .for_each(|(i, (px, inside))| {
            if !*inside {
                px.fill(0);
                return;
            }
            let base = i * 3;
            for (c, out) in px.iter_mut().enumerate() {
                let acc: f64 = layers
                    .iter()
                    .map(|(img, w)| w * f64::from(img.as_raw()[base + c]))
                    .sum();
                *out = saturate_u8(acc);
            }
        });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/engine/blend.rs"]
mod tests;
