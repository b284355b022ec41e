use super::*;
use crate::params::model::ParamValue;

#[test]
fn every_kind_builds_with_its_own_kind() {
    for kind in OperationKind::ALL {
        let op = Operation::new(kind);
        assert_eq!(op.kind(), kind);
        assert_eq!(op.name(), kind.name());
        assert!(op.is_enabled());
        assert!(!op.parameters().is_empty());
    }
}

#[test]
fn parameter_names_are_unique_per_operation() {
    for kind in OperationKind::ALL {
        let op = Operation::new(kind);
        let names: Vec<&str> = op.parameters().iter().map(|p| p.name()).collect();
        let unique: std::collections::HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len(), "{}", kind.name());
    }
}

#[test]
fn parameter_sets_group_by_kind() {
    let op = Operation::new(OperationKind::Morphology);
    let sets = op.parameter_sets();
    assert_eq!(sets.morph_types.len(), 1);
    assert_eq!(sets.morph_shapes.len(), 1);
    assert_eq!(sets.ints.len(), 2);
    assert!(sets.kernel.is_none());

    let op = Operation::new(OperationKind::Sharpen);
    let sets = op.parameter_sets();
    assert_eq!(sets.kernel.map(|k| k.len()), Some(9));
}

#[test]
fn parameter_mut_writes_through_validation() {
    let mut op = Operation::new(OperationKind::GaussianBlur);
    let mut ksize = op.parameter_mut("ksize").expect("ksize");
    assert!(ksize.assign(&ParamValue::Int(4)));
    assert_eq!(
        op.parameter("ksize").map(|p| p.value()),
        Some(ParamValue::Int(5))
    );

    let mut sigma = op.parameter_mut("sigma").expect("sigma");
    assert!(!sigma.assign(&ParamValue::Bool(true)));
    assert_eq!(
        op.parameter("sigma").map(|p| p.value()),
        Some(ParamValue::Double(1.0))
    );
}

#[test]
fn restore_applies_known_values_and_keeps_defaults() {
    let values: ParamValues = [
        ("angle", ParamValue::Double(45.0)),
        ("interpolation", ParamValue::Interpolation(0)),
        ("bogus", ParamValue::Int(3)),
        ("scale", ParamValue::Bool(false)),
    ]
    .into_iter()
    .collect();
    let op = Operation::restore(OperationKind::RotationScaling, false, &values);
    assert!(!op.is_enabled());
    let Transform::RotationScaling(t) = op.transform() else {
        panic!("wrong variant");
    };
    assert_eq!(t.angle.value(), 45.0);
    assert_eq!(t.scale.value(), 1.0);
    assert_eq!(t.interpolation.value(), Interpolation::Nearest);
}

#[test]
fn apply_keeps_dimensions_for_every_kind() {
    let img = RgbImage::from_fn(16, 16, |x, y| {
        crate::foundation::core::Rgb([(x * 15) as u8, (y * 15) as u8, 128])
    });
    for kind in OperationKind::ALL {
        let out = Operation::new(kind).apply(&img);
        assert_eq!(out.dimensions(), (16, 16), "{}", kind.name());
    }
}

#[test]
fn default_rescale_is_identity() {
    let img = RgbImage::from_pixel(8, 8, crate::foundation::core::Rgb([3, 100, 250]));
    assert_eq!(Operation::new(OperationKind::RescaleIntensity).apply(&img), img);
}

#[test]
fn typed_access_through_transform_mut() {
    let mut op = Operation::new(OperationKind::HueShift);
    if let Transform::HueShift(t) = op.transform_mut() {
        t.degrees.set(400);
    }
    assert_eq!(
        op.parameter("degrees").map(|p| p.value()),
        Some(ParamValue::Int(180))
    );
}
