use super::*;
use crate::foundation::core::Rgb;
use crate::params::model::ParamValue;

fn size() -> ImageSize {
    ImageSize::new(16).expect("size")
}

fn kinds(chain: &Chain) -> Vec<OperationKind> {
    chain.operations().iter().map(Operation::kind).collect()
}

fn three_op_chain() -> Chain {
    Chain::with_operations(
        size(),
        1.0,
        [
            OperationKind::GaussianBlur,
            OperationKind::Sharpen,
            OperationKind::HueShift,
        ],
    )
}

#[test]
fn insert_after_lands_at_next_position() {
    let mut chain = three_op_chain();
    let at = chain.insert(OperationKind::Canny, Some(1));
    assert_eq!(at, 2);
    assert_eq!(
        kinds(&chain),
        vec![
            OperationKind::GaussianBlur,
            OperationKind::Sharpen,
            OperationKind::Canny,
            OperationKind::HueShift,
        ]
    );
    let removed = chain.remove(2).map(|op| op.kind());
    assert_eq!(removed, Some(OperationKind::Canny));
    assert_eq!(kinds(&three_op_chain()), kinds(&chain));
}

#[test]
fn insert_into_empty_or_front() {
    let mut chain = Chain::new(size(), 1.0);
    assert_eq!(chain.insert(OperationKind::Laplacian, None), 0);
    assert_eq!(chain.insert(OperationKind::Canny, None), 0);
    assert_eq!(
        kinds(&chain),
        vec![OperationKind::Canny, OperationKind::Laplacian]
    );

    let mut empty = Chain::new(size(), 1.0);
    assert_eq!(empty.insert(OperationKind::Sharpen, Some(0)), 0);
}

#[test]
fn insert_by_catalog_index() {
    let mut chain = three_op_chain();
    let laplacian = OperationKind::Laplacian.index();
    assert_eq!(chain.insert_index(laplacian, Some(0)), Some(1));
    assert_eq!(chain.operation(1).map(Operation::kind), Some(OperationKind::Laplacian));
    assert_eq!(chain.insert_index(OperationKind::ALL.len(), Some(0)), None);
    assert_eq!(chain.len(), 4);
}

#[test]
fn inserted_operation_has_defaults() {
    let mut chain = Chain::new(size(), 1.0);
    chain.insert(OperationKind::HueShift, None);
    let op = chain.operation(0).expect("op");
    assert_eq!(op, &Operation::new(OperationKind::HueShift));
}

#[test]
fn swap_moves_and_shifts() {
    let mut chain = three_op_chain();
    chain.swap(0, 2);
    assert_eq!(
        kinds(&chain),
        vec![
            OperationKind::Sharpen,
            OperationKind::HueShift,
            OperationKind::GaussianBlur,
        ]
    );
    chain.swap(2, 0);
    assert_eq!(kinds(&chain), kinds(&three_op_chain()));
    chain.swap(1, 1);
    assert_eq!(kinds(&chain), kinds(&three_op_chain()));
}

#[test]
#[should_panic]
fn swap_out_of_range_asserts() {
    let mut chain = three_op_chain();
    chain.swap(0, 3);
}

#[test]
fn iterate_skips_disabled_operations() {
    let mut chain = Chain::from_image(RgbImage::from_pixel(16, 16, Rgb([10, 10, 10])), 1.0);
    chain.insert(OperationKind::RescaleIntensity, None);
    if let Some(op) = chain.operation_mut(0) {
        for mut p in op.parameters_mut() {
            if p.name() == "beta" {
                p.assign(&ParamValue::Double(20.0));
            }
        }
        op.set_enabled(false);
    }
    chain.iterate();
    assert_eq!(chain.image().get_pixel(3, 3).0, [10, 10, 10]);

    if let Some(op) = chain.operation_mut(0) {
        op.set_enabled(true);
    }
    chain.iterate();
    assert_eq!(chain.image().get_pixel(3, 3).0, [30, 30, 30]);
    assert_eq!(chain.len(), 1);
}

#[test]
fn load_operation_skips_unknown_names() {
    let mut chain = Chain::new(size(), 1.0);
    assert!(!chain.load_operation("Nope", true, &ParamValues::new()));
    assert!(chain.is_empty());

    let values: ParamValues = [("degrees", ParamValue::Int(-30))].into_iter().collect();
    assert!(chain.load_operation("Hue shift", false, &values));
    let op = chain.operation(0).expect("op");
    assert!(!op.is_enabled());
    assert_eq!(
        op.parameter("degrees").map(|p| p.value()),
        Some(ParamValue::Int(-30))
    );
}
