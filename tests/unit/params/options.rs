use super::*;

fn codes_are_unique<T: OptionCode>() -> bool {
    let mut seen = std::collections::HashSet::new();
    T::OPTIONS.iter().all(|(_, v)| seen.insert(v.code()))
}

#[test]
fn codes_roundtrip_for_every_option() {
    for (_, v) in MorphType::OPTIONS {
        assert_eq!(MorphType::from_code(v.code()), Some(*v));
    }
    for (_, v) in MorphShape::OPTIONS {
        assert_eq!(MorphShape::from_code(v.code()), Some(*v));
    }
    for (_, v) in Interpolation::OPTIONS {
        assert_eq!(Interpolation::from_code(v.code()), Some(*v));
    }
    assert!(codes_are_unique::<MorphType>());
    assert!(codes_are_unique::<MorphShape>());
    assert!(codes_are_unique::<Interpolation>());
}

#[test]
fn codes_are_stable() {
    assert_eq!(MorphType::Open.code(), 2);
    assert_eq!(MorphType::BlackHat.code(), 6);
    assert_eq!(MorphShape::Ellipse.code(), 2);
    assert_eq!(Interpolation::Bicubic.code(), 2);
}

#[test]
fn unknown_code_is_none() {
    assert_eq!(MorphType::from_code(42), None);
    assert_eq!(MorphShape::from_code(-1), None);
}

#[test]
fn name_lookup_is_case_insensitive() {
    assert_eq!(MorphType::from_name("top HAT"), Some(MorphType::TopHat));
    assert_eq!(Interpolation::from_name(" linear "), Some(Interpolation::Bilinear));
    assert_eq!(MorphShape::Cross.display_name(), "Cross");
}
