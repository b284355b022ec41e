use super::*;
use crate::foundation::core::{ImageSize, Rgb};

fn mask() -> Mask {
    Mask::circle(ImageSize::new(16).expect("size"))
}

#[test]
fn sums_are_scaled_by_mask_area() {
    let m = mask();
    let img = RgbImage::from_pixel(16, 16, Rgb([255, 0, 51]));
    let sums = color_sums(&img, &m);
    assert!((sums[0] - 1.0).abs() < 1e-12);
    assert_eq!(sums[1], 0.0);
    assert!((sums[2] - 0.2).abs() < 1e-12);
}

#[test]
fn pixels_outside_mask_are_ignored() {
    let m = mask();
    let mut img = RgbImage::new(16, 16);
    img.put_pixel(0, 0, Rgb([255, 255, 255]));
    assert_eq!(color_sums(&img, &m), [0.0; 3]);
    let hist = histogram(&img, &m);
    assert_eq!(hist[0][255], 0);
    assert_eq!(hist[0][0] as usize, m.area());
}

#[test]
fn histogram_counts_every_inside_pixel_per_channel() {
    let m = mask();
    let img = RgbImage::from_pixel(16, 16, Rgb([1, 2, 3]));
    let hist = histogram(&img, &m);
    for (c, bin) in [1usize, 2, 3].into_iter().enumerate() {
        assert_eq!(hist[c][bin] as usize, m.area());
        assert_eq!(hist[c].iter().map(|n| *n as usize).sum::<usize>(), m.area());
    }
}
