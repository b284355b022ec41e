use super::*;
use crate::display::port::InMemoryDisplay;

fn opts(size: u32) -> GeneratorOpts {
    GeneratorOpts {
        size,
        seed: 7,
        ..GeneratorOpts::default()
    }
}

fn generator(size: u32) -> Generator {
    Generator::new(opts(size)).expect("generator")
}

fn assert_unit_sum(g: &Generator) {
    let sum: f64 = g.weights().iter().sum();
    assert!((sum - 1.0).abs() <= 1e-9, "weights {:?}", g.weights());
}

#[test]
fn starts_with_default_chain_set() {
    let g = generator(32);
    assert_eq!(g.chains().len(), 2);
    assert_eq!(g.weights(), vec![0.5, 0.5]);
    assert_eq!(g.iteration(), 0);
    let names: Vec<&str> = g.chains()[0].operations().iter().map(|o| o.name()).collect();
    assert_eq!(names, vec!["Gaussian blur", "Sharpen", "Hue shift"]);
}

#[test]
fn seed_is_reproducible_and_masked() {
    let a = generator(32);
    let b = generator(32);
    assert_eq!(a.chains()[0].image(), b.chains()[0].image());
    assert_ne!(a.chains()[0].image(), a.chains()[1].image());
    for chain in a.chains() {
        for (x, y, px) in chain.image().enumerate_pixels() {
            if !a.mask().contains(x, y) {
                assert_eq!(px.0, [0, 0, 0]);
            }
        }
    }
}

#[test]
fn grayscale_seed_has_equal_channels() {
    let mut g = generator(16);
    g.seed(true).expect("seed");
    for chain in g.chains() {
        assert!(chain.image().pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }
}

#[test]
fn seed_output_is_blend_of_seeded_chains() {
    let g = generator(16);
    let mut want = g.size().blank();
    let layers: Vec<(&RgbImage, f64)> =
        g.chains().iter().map(|c| (c.image(), c.weight())).collect();
    weighted_blend(&layers, g.mask(), &mut want).expect("blend");
    assert_eq!(g.output(), &want);
}

#[test]
fn step_feeds_output_back_to_every_chain() {
    let mut g = generator(24);
    g.step().expect("step");
    assert_eq!(g.iteration(), 1);
    for chain in g.chains() {
        assert_eq!(chain.image(), g.output());
    }
    g.step().expect("step");
    assert_eq!(g.iteration(), 2);
    g.seed(false).expect("seed");
    assert_eq!(g.iteration(), 0);
}

#[test]
fn parallel_step_matches_sequential() {
    let mut seq = generator(24);
    let mut par = Generator::new(GeneratorOpts {
        parallel: true,
        threads: Some(2),
        ..opts(24)
    })
    .expect("generator");
    for _ in 0..3 {
        seq.step().expect("step");
        par.step().expect("step");
    }
    assert_eq!(seq.output(), par.output());
}

#[test]
fn weight_edits_keep_unit_sum() {
    let mut g = generator(16);
    g.set_chain_weight(0, 0.8);
    assert!((g.weights()[1] - 0.2).abs() < 1e-12);
    assert_unit_sum(&g);

    g.set_chain_weight(1, 1.0);
    assert_eq!(g.weights()[0], 0.0);
    g.set_chain_weight(1, 0.5);
    assert!((g.weights()[0] - 0.5).abs() < 1e-12);
    assert_unit_sum(&g);

    g.set_chain_weight(0, f64::NAN);
    assert_unit_sum(&g);
    g.set_chain_weight(0, 7.0);
    assert_eq!(g.weights(), vec![1.0, 0.0]);
}

#[test]
fn single_chain_keeps_full_weight() {
    let mut g = generator(16);
    g.remove_chain(0);
    assert_eq!(g.weights(), vec![1.0]);
    g.set_chain_weight(0, 0.3);
    assert_eq!(g.weights(), vec![1.0]);
}

#[test]
fn removing_last_chain_leaves_black_output() {
    let mut g = generator(16);
    g.remove_chain(1);
    g.remove_chain(0);
    assert!(g.chains().is_empty());
    g.step().expect("step");
    assert!(g.output().pixels().all(|p| p.0 == [0, 0, 0]));
    assert_eq!(g.add_chain(), 0);
    assert_eq!(g.weights(), vec![1.0]);
}

#[test]
fn added_chain_starts_from_output() {
    let mut g = generator(16);
    g.step().expect("step");
    let idx = g.add_chain();
    assert_eq!(idx, 2);
    let chain = g.chain(idx).expect("chain");
    assert_eq!(chain.image(), g.output());
    assert!(chain.is_empty());
    assert_eq!(chain.weight(), 0.0);
    assert_unit_sum(&g);
}

#[test]
fn resize_rescales_every_buffer() {
    let mut g = generator(32);
    g.on_pointer_down(30, 30);
    g.resize(ImageSize::new(16).expect("size"));
    assert_eq!(g.size().px(), 16);
    assert_eq!(g.output().dimensions(), (16, 16));
    assert_eq!(g.mask().size().px(), 16);
    for chain in g.chains() {
        assert_eq!(chain.image().dimensions(), (16, 16));
    }
    assert_eq!(g.selected(), PixelCoord::new(15, 15));
    assert!(!g.output().get_pixel(0, 0).0.iter().any(|c| *c != 0));
    g.step().expect("step");
}

#[test]
fn pointer_selection_is_clamped_and_reported() {
    let mut g = generator(16);
    g.on_pointer_down(100, 3);
    assert_eq!(g.selected(), PixelCoord::new(15, 3));
    let stats = g.stats();
    assert_eq!(stats.selected_pixel, g.output().get_pixel(15, 3).0);
    assert_eq!(stats.iteration, 0);
    let inside: u32 = stats.histogram[0].iter().sum();
    assert_eq!(inside as usize, g.mask().area());
    assert!(stats.color_sums.iter().all(|s| (0.0..=1.0).contains(s)));
}

#[test]
fn present_sends_output_and_cursor() {
    let mut g = generator(16);
    g.step().expect("step");
    let mut display = InMemoryDisplay::new();
    g.present(&mut display).expect("present");
    let (iteration, frame, cursor) = display.last().expect("frame");
    assert_eq!(*iteration, 1);
    assert_eq!(frame, g.output());
    assert_eq!(*cursor, g.selected());
}

#[test]
fn config_string_roundtrips_through_load() {
    let mut g = generator(16);
    g.set_chain_weight(0, 0.75);
    if let Some(chain) = g.chain_mut(1) {
        chain.swap(0, 2);
        if let Some(op) = chain.operation_mut(0) {
            op.set_enabled(false);
        }
    }
    let xml = g.to_config_string().expect("write");

    let mut other = generator(16);
    other.load_config_str(&xml).expect("load");
    assert_eq!(other.weights(), g.weights());
    for (a, b) in other.chains().iter().zip(g.chains()) {
        assert_eq!(a.operations(), b.operations());
        assert_eq!(a.image(), other.output());
    }
}

#[test]
fn loaded_weights_are_renormalized() {
    let mut g = generator(16);
    let xml = r#"<pipelines>
        <pipeline blendfactor="0.2"/>
        <pipeline blendfactor="0.6"/>
    </pipelines>"#;
    g.load_config_str(xml).expect("load");
    assert_eq!(g.chains().len(), 2);
    assert!((g.weights()[0] - 0.25).abs() < 1e-12);
    assert_unit_sum(&g);
}

#[test]
fn syntax_error_leaves_generator_unchanged() {
    let mut g = generator(16);
    let before = g.to_config_string().expect("write");
    assert!(g.load_config_str("<pipelines><oops></pipelines>").is_err());
    assert_eq!(g.to_config_string().expect("write"), before);
}

#[test]
fn invalid_opts_are_rejected() {
    assert!(Generator::new(opts(2)).is_err());
    let err = Generator::new(GeneratorOpts {
        parallel: true,
        threads: Some(0),
        ..opts(16)
    })
    .unwrap_err();
    assert!(matches!(err, MorphError::Validation(_)));
}

#[test]
fn write_chain_image_rejects_bad_index() {
    let g = generator(16);
    let path = std::env::temp_dir().join("morphogen_never_written.png");
    assert!(g.write_chain_image(9, &path).is_err());
}
