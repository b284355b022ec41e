use std::time::{Duration, Instant};

use crate::display::port::DisplayPort;
use crate::engine::generator::Generator;
use crate::foundation::error::{MorphError, MorphResult};

/// Summary of a [`run_steps`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunStats {
    pub steps: u64,
    pub frames_presented: u64,
    pub final_iteration: u64,
    pub elapsed: Duration,
}

/// Run `steps` steps, presenting after every `present_every`-th one.
///
/// The final frame is always presented when at least one step ran, so a display never misses
/// the end state. `present_every` must be at least 1.
pub fn run_steps(
    generator: &mut Generator,
    steps: u64,
    present_every: u64,
    display: &mut dyn DisplayPort,
) -> MorphResult<RunStats> {
    if present_every == 0 {
        return Err(MorphError::validation("'present_every' must be >= 1"));
    }

    let started = Instant::now();
    let mut presented = 0u64;
    let mut last_presented = None;
    for n in 1..=steps {
        generator.step()?;
        if n % present_every == 0 {
            generator.present(display)?;
            presented += 1;
            last_presented = Some(n);
        }
    }
    if steps > 0 && last_presented != Some(steps) {
        generator.present(display)?;
        presented += 1;
    }

    let stats = RunStats {
        steps,
        frames_presented: presented,
        final_iteration: generator.iteration(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        steps,
        frames = presented,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "run finished"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/driver.rs"]
mod tests;
