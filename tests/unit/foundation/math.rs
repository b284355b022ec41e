use super::*;

fn sum(ws: &[f64]) -> f64 {
    ws.iter().sum()
}

#[test]
fn saturate_rounds_and_clamps() {
    assert_eq!(saturate_u8(-3.0), 0);
    assert_eq!(saturate_u8(12.5), 13);
    assert_eq!(saturate_u8(300.0), 255);
    assert_eq!(saturate_u8(f64::NAN), 0);
}

#[test]
fn renormalize_zero_sum_goes_uniform() {
    let mut ws = [0.0, 0.0, 0.0, 0.0];
    renormalize(&mut ws);
    assert_eq!(ws, [0.25; 4]);
}

#[test]
fn renormalize_divides_by_sum() {
    let mut ws = [0.2, 0.6];
    renormalize(&mut ws);
    assert!((ws[0] - 0.25).abs() < 1e-12);
    assert!((ws[1] - 0.75).abs() < 1e-12);
}

#[test]
fn pin_weight_rescales_siblings_proportionally() {
    let mut ws = [0.5, 0.3, 0.2];
    pin_weight(&mut ws, 0, 0.8);
    assert!((ws[0] - 0.8).abs() < 1e-12);
    assert!((ws[1] - 0.12).abs() < 1e-12);
    assert!((ws[2] - 0.08).abs() < 1e-12);
    assert!((sum(&ws) - 1.0).abs() < 1e-9);
}

#[test]
fn pin_weight_seeds_zero_siblings() {
    let mut ws = [1.0, 0.0, 0.0];
    pin_weight(&mut ws, 0, 0.4);
    assert!((ws[1] - 0.3).abs() < 1e-9);
    assert!((ws[2] - 0.3).abs() < 1e-9);
    assert!((sum(&ws) - 1.0).abs() < 1e-9);
}

#[test]
fn pin_weight_single_entry_stays_one() {
    let mut ws = [1.0];
    pin_weight(&mut ws, 0, 0.3);
    assert_eq!(ws, [1.0]);
}

#[test]
fn pin_weight_clamps_value() {
    let mut ws = [0.5, 0.5];
    pin_weight(&mut ws, 1, 1.7);
    assert_eq!(ws[1], 1.0);
    assert_eq!(ws[0], 0.0);
}
