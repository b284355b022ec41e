use super::*;
use crate::config::opts::GeneratorOpts;
use crate::display::port::InMemoryDisplay;

fn generator() -> Generator {
    Generator::new(GeneratorOpts {
        size: 16,
        ..GeneratorOpts::default()
    })
    .expect("generator")
}

#[test]
fn presents_every_nth_step_and_the_last() {
    let mut g = generator();
    let mut display = InMemoryDisplay::new();
    let stats = run_steps(&mut g, 5, 2, &mut display).expect("run");
    assert_eq!(stats.steps, 5);
    assert_eq!(stats.final_iteration, 5);
    assert_eq!(stats.frames_presented, 3);
    let iterations: Vec<u64> = display.frames.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(iterations, vec![2, 4, 5]);
}

#[test]
fn exact_multiple_is_not_presented_twice() {
    let mut g = generator();
    let mut display = InMemoryDisplay::new();
    let stats = run_steps(&mut g, 4, 2, &mut display).expect("run");
    assert_eq!(stats.frames_presented, 2);
}

#[test]
fn zero_steps_present_nothing() {
    let mut g = generator();
    let mut display = InMemoryDisplay::new();
    let stats = run_steps(&mut g, 0, 1, &mut display).expect("run");
    assert_eq!(stats.frames_presented, 0);
    assert!(display.frames.is_empty());
}

#[test]
fn zero_interval_is_rejected() {
    let mut g = generator();
    let mut display = InMemoryDisplay::new();
    let err = run_steps(&mut g, 3, 0, &mut display).unwrap_err();
    assert!(matches!(err, MorphError::Validation(_)));
    assert_eq!(g.iteration(), 0);
}
