//! Thin adapters from operation parameters to image primitives.
//!
//! The numeric work is delegated to `image` and `imageproc`; this module only converts parameter
//! values, splits and merges channels, and guards primitive preconditions so every adapter is
//! total.

use image::{DynamicImage, imageops};
use imageproc::contrast::equalize_histogram;
use imageproc::edges;
use imageproc::filter::{laplacian_filter, separable_filter_equal};
use imageproc::geometric_transformations::{Projection, warp};
use imageproc::morphology::{Mask as StructuringElement, grayscale_dilate, grayscale_erode};
use rayon::prelude::*;

use crate::foundation::core::{GrayImage, Luma, Rgb, RgbImage, RotateScale, Vec2};
use crate::foundation::math::saturate_u8;
use crate::params::options::{Interpolation, MorphShape, MorphType};

pub(crate) fn split_channels(img: &RgbImage) -> [GrayImage; 3] {
    let (w, h) = img.dimensions();
    let mut out = [GrayImage::new(w, h), GrayImage::new(w, h), GrayImage::new(w, h)];
    for (x, y, px) in img.enumerate_pixels() {
        for (c, plane) in out.iter_mut().enumerate() {
            plane.put_pixel(x, y, Luma([px.0[c]]));
        }
    }
    out
}

pub(crate) fn merge_channels(planes: &[GrayImage; 3]) -> RgbImage {
    let (w, h) = planes[0].dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            planes[0].get_pixel(x, y).0[0],
            planes[1].get_pixel(x, y).0[0],
            planes[2].get_pixel(x, y).0[0],
        ])
    })
}

fn map_planes<F>(img: &RgbImage, f: F) -> RgbImage
where
    F: Fn(&GrayImage) -> GrayImage + Sync,
{
    let planes = split_channels(img);
    let mapped: Vec<GrayImage> = planes.par_iter().map(&f).collect();
    match <[GrayImage; 3]>::try_from(mapped) {
        Ok(planes) => merge_channels(&planes),
        Err(_) => img.clone(),
    }
}

/// Per-pixel transform over the raw RGB buffer.
pub(crate) fn map_pixels<F>(img: &RgbImage, f: F) -> RgbImage
where
    F: Fn([u8; 3]) -> [u8; 3] + Sync,
{
    let mut out = img.clone();
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_exact_mut(3).for_each(|px| {
        let mapped = f([px[0], px[1], px[2]]);
        px.copy_from_slice(&mapped);
    });
    out
}

fn saturating_diff(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let (w, h) = a.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        Luma([a.get_pixel(x, y).0[0].saturating_sub(b.get_pixel(x, y).0[0])])
    })
}

pub(crate) fn rescale_intensity(img: &RgbImage, alpha: f64, beta: f64) -> RgbImage {
    map_pixels(img, |px| px.map(|c| saturate_u8(f64::from(c) * alpha + beta)))
}

/// Sigma used when the caller passes a non-positive one, derived from the window size.
pub(crate) fn sigma_for_ksize(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian taps for an odd window.
pub(crate) fn gaussian_taps(ksize: u32, sigma: f32) -> Vec<f32> {
    let r = (ksize / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let taps: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

pub(crate) fn gaussian_blur(img: &RgbImage, ksize: i32, sigma: f64) -> RgbImage {
    let ksize = ksize.max(1) as u32 | 1;
    if ksize == 1 {
        return img.clone();
    }
    let sigma = if sigma > 0.0 {
        sigma as f32
    } else {
        sigma_for_ksize(ksize)
    };
    let taps = gaussian_taps(ksize, sigma);
    // Filter in f32 so the conversion back to u8 rounds instead of truncating.
    let planar = DynamicImage::ImageRgb8(img.clone()).into_rgb32f();
    let blurred = separable_filter_equal(&planar, &taps);
    DynamicImage::ImageRgb32F(blurred).into_rgb8()
}

pub(crate) fn laplacian(img: &RgbImage, scale: f64, delta: f64, absolute: bool) -> RgbImage {
    map_planes(img, |plane| {
        let response = laplacian_filter(plane);
        let (w, h) = response.dimensions();
        GrayImage::from_fn(w, h, |x, y| {
            let v = f64::from(response.get_pixel(x, y).0[0]);
            let v = if absolute { v.abs() } else { v };
            Luma([saturate_u8(v * scale + delta)])
        })
    })
}

pub(crate) fn rotate_scale(
    img: &RgbImage,
    angle_deg: f64,
    scale: f64,
    interpolation: Interpolation,
) -> RgbImage {
    let (w, h) = img.dimensions();
    let rs = RotateScale {
        rotation_rad: angle_deg.to_radians(),
        scale,
        anchor: Vec2::new(f64::from(w) / 2.0, f64::from(h) / 2.0),
    };
    let Some(projection) = Projection::from_matrix(rs.to_row_major()) else {
        tracing::warn!(angle_deg, scale, "rotation matrix is not invertible");
        return img.clone();
    };
    warp(img, &projection, interpolation.into(), Rgb([0, 0, 0]))
}

pub(crate) fn morphology(
    img: &RgbImage,
    kind: MorphType,
    shape: MorphShape,
    radius: i32,
    iterations: i32,
) -> RgbImage {
    if radius <= 0 || iterations <= 0 {
        return img.clone();
    }
    let r = radius.min(i32::from(u8::MAX)) as u8;
    // imageproc has no plus-shaped element; the diamond is its closest 4-connected shape.
    let element = match shape {
        MorphShape::Rect => StructuringElement::square(r),
        MorphShape::Cross => StructuringElement::diamond(r),
        MorphShape::Ellipse => StructuringElement::disk(r),
    };

    let once = |g: &GrayImage| -> GrayImage {
        let erode = |g: &GrayImage| grayscale_erode(g, &element);
        let dilate = |g: &GrayImage| grayscale_dilate(g, &element);
        match kind {
            MorphType::Erode => erode(g),
            MorphType::Dilate => dilate(g),
            MorphType::Open => dilate(&erode(g)),
            MorphType::Close => erode(&dilate(g)),
            MorphType::Gradient => saturating_diff(&dilate(g), &erode(g)),
            MorphType::TopHat => saturating_diff(g, &dilate(&erode(g))),
            MorphType::BlackHat => saturating_diff(&erode(&dilate(g)), g),
        }
    };

    map_planes(img, |plane| {
        let mut cur = once(plane);
        for _ in 1..iterations {
            cur = once(&cur);
        }
        cur
    })
}

pub(crate) fn canny(img: &RgbImage, low: f64, high: f64) -> RgbImage {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let gray = imageops::grayscale(img);
    let edges = edges::canny(&gray, low as f32, high as f32);
    let (w, h) = edges.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let v = edges.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

pub(crate) fn equalize(img: &RgbImage, per_channel: bool) -> RgbImage {
    if per_channel {
        return map_planes(img, equalize_histogram);
    }
    let luma = imageops::grayscale(img);
    let eq = equalize_histogram(&luma);
    let (w, h) = img.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let l = f64::from(luma.get_pixel(x, y).0[0]);
        let e = eq.get_pixel(x, y).0[0];
        if l == 0.0 {
            return Rgb([e, e, e]);
        }
        let gain = f64::from(e) / l;
        Rgb(img.get_pixel(x, y).0.map(|c| saturate_u8(f64::from(c) * gain)))
    })
}

/// Cyclic channel mix: each output channel is `w0 * self + w1 * next + w2 * next-next`.
pub(crate) fn mix_channels(img: &RgbImage, weights: &[f64]) -> RgbImage {
    let [w0, w1, w2] = match weights {
        [a, b, c] => [*a, *b, *c],
        _ => return img.clone(),
    };
    map_pixels(img, |[r, g, b]| {
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
        [
            saturate_u8(w0 * r + w1 * g + w2 * b),
            saturate_u8(w0 * g + w1 * b + w2 * r),
            saturate_u8(w0 * b + w1 * r + w2 * g),
        ]
    })
}

pub(crate) fn convolve3x3(img: &RgbImage, kernel: &[f64]) -> RgbImage {
    if kernel.len() != 9 {
        return img.clone();
    }
    let k: Vec<f32> = kernel.iter().map(|v| *v as f32).collect();
    imageops::filter3x3(img, &k)
}

pub(crate) fn hue_shift(img: &RgbImage, degrees: i32) -> RgbImage {
    imageops::huerotate(img, degrees)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/kernels.rs"]
mod tests;
