use std::path::Path;

use image::imageops::{self, FilterType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::codec::{ChainConfig, read_config, write_config};
use crate::config::opts::{GeneratorOpts, build_thread_pool};
use crate::display::port::DisplayPort;
use crate::engine::blend::weighted_blend;
use crate::engine::chain::Chain;
use crate::engine::mask::Mask;
use crate::engine::stats::{self, FrameStats, Histogram};
use crate::foundation::core::{ImageSize, PixelCoord, Rgb, RgbImage};
use crate::foundation::error::{MorphError, MorphResult};
use crate::foundation::math::{WEIGHT_EPSILON, pin_weight, renormalize, uniform};
use crate::ops::catalog::OperationKind;

/// The fixed chain set every generator starts with.
pub fn default_chain_set(size: ImageSize) -> Vec<Chain> {
    vec![
        Chain::with_operations(
            size,
            0.5,
            [
                OperationKind::GaussianBlur,
                OperationKind::Sharpen,
                OperationKind::HueShift,
            ],
        ),
        Chain::with_operations(
            size,
            0.5,
            [
                OperationKind::RotationScaling,
                OperationKind::Morphology,
                OperationKind::EqualizeHistogram,
            ],
        ),
    ]
}

/// Multi-chain feedback engine.
///
/// One [`Generator::step`] iterates every chain on its own image, blends the results inside
/// the mask into the output canvas, and feeds that canvas back to every chain. Chain weights
/// always sum to 1 once at least one chain exists.
#[derive(Debug)]
pub struct Generator {
    opts: GeneratorOpts,
    size: ImageSize,
    chains: Vec<Chain>,
    mask: Mask,
    output: RgbImage,
    iteration: u64,
    rng: StdRng,
    selected: PixelCoord,
    pool: Option<rayon::ThreadPool>,
}

impl Generator {
    /// Build the default chain set and seed it from `opts.seed`.
    pub fn new(opts: GeneratorOpts) -> MorphResult<Self> {
        let rng = StdRng::seed_from_u64(opts.seed);
        Self::with_rng(opts, rng)
    }

    /// Like [`Generator::new`] with an injected random source.
    pub fn with_rng(opts: GeneratorOpts, rng: StdRng) -> MorphResult<Self> {
        opts.validate()?;
        let size = opts.image_size()?;
        let pool = match (opts.parallel, opts.threads) {
            (true, Some(_)) => Some(build_thread_pool(opts.threads)?),
            _ => None,
        };
        let mut generator = Self {
            size,
            chains: default_chain_set(size),
            mask: Mask::circle(size),
            output: size.blank(),
            iteration: 0,
            rng,
            selected: PixelCoord::center(size),
            pool,
            opts,
        };
        generator.seed(generator.opts.grayscale_seed)?;
        Ok(generator)
    }

    pub fn opts(&self) -> &GeneratorOpts {
        &self.opts
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn output(&self) -> &RgbImage {
        &self.output
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, idx: usize) -> Option<&Chain> {
        self.chains.get(idx)
    }

    /// Mutable access for operation edits (`insert`, `remove`, `swap`, parameter changes).
    pub fn chain_mut(&mut self, idx: usize) -> Option<&mut Chain> {
        self.chains.get_mut(idx)
    }

    /// Reset every chain to a fresh masked random field and restart the counter.
    #[tracing::instrument(skip(self))]
    pub fn seed(&mut self, grayscale: bool) -> MorphResult<()> {
        for chain in &mut self.chains {
            let field = random_field(&mut self.rng, self.size, grayscale, &self.mask);
            chain.set_image(field);
        }
        self.iteration = 0;
        self.blend()
    }

    /// Advance the simulation by one iterate/blend/feedback round.
    #[tracing::instrument(skip(self), fields(iteration = self.iteration))]
    pub fn step(&mut self) -> MorphResult<()> {
        if let Some(pool) = &self.pool {
            pool.install(|| self.chains.par_iter_mut().for_each(Chain::iterate));
        } else if self.opts.parallel {
            self.chains.par_iter_mut().for_each(Chain::iterate);
        } else {
            self.chains.iter_mut().for_each(Chain::iterate);
        }

        for chain in &mut self.chains {
            if !self.size.matches(chain.image()) {
                tracing::warn!(
                    width = chain.image().width(),
                    height = chain.image().height(),
                    "chain produced a mis-sized image; rescaling"
                );
                let fixed = rescale(chain.image(), self.size);
                chain.set_image(fixed);
            }
        }

        self.blend()?;
        for chain in &mut self.chains {
            chain.image_mut().clone_from(&self.output);
        }
        self.iteration += 1;
        Ok(())
    }

    fn blend(&mut self) -> MorphResult<()> {
        let layers: Vec<(&RgbImage, f64)> = self
            .chains
            .iter()
            .map(|c| (c.image(), c.weight()))
            .collect();
        weighted_blend(&layers, &self.mask, &mut self.output)
    }

    /// Change the canvas size: rescale every image, recompute the mask, clip to it.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, size: ImageSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.opts.size = size.px();
        self.mask = Mask::circle(size);
        for chain in &mut self.chains {
            let mut img = rescale(chain.image(), size);
            self.mask.apply(&mut img);
            chain.set_image(img);
        }
        self.output = rescale(&self.output, size);
        self.mask.apply(&mut self.output);
        self.selected = self.selected.clamp_to(size);
    }

    /// Save the blended canvas; the format follows the file extension.
    pub fn write_output_image(&self, path: impl AsRef<Path>) -> MorphResult<()> {
        save_image(&self.output, path.as_ref())
    }

    /// Save one chain's current image.
    pub fn write_chain_image(&self, idx: usize, path: impl AsRef<Path>) -> MorphResult<()> {
        let chain = self.chains.get(idx).ok_or_else(|| {
            MorphError::validation(format!(
                "chain index {idx} out of range ({} chains)",
                self.chains.len()
            ))
        })?;
        save_image(chain.image(), path.as_ref())
    }

    /// Append an empty chain starting from the output canvas, with weight 0.
    ///
    /// A chain added to an empty generator takes weight 1. Returns the new chain's index.
    pub fn add_chain(&mut self) -> usize {
        let weight = if self.chains.is_empty() { 1.0 } else { 0.0 };
        self.chains.push(Chain::from_image(self.output.clone(), weight));
        self.chains.len() - 1
    }

    /// Remove chain `idx` and renormalize the remaining weights.
    ///
    /// Precondition: `idx < self.chains().len()`.
    pub fn remove_chain(&mut self, idx: usize) -> Option<Chain> {
        debug_assert!(
            idx < self.chains.len(),
            "remove_chain({idx}) with {} chains",
            self.chains.len()
        );
        if idx >= self.chains.len() {
            return None;
        }
        let removed = self.chains.remove(idx);
        self.update_weights(renormalize);
        Some(removed)
    }

    /// Pin chain `idx` to `weight` (clamped to `[0, 1]`) and rescale the others so the total
    /// stays 1. Non-finite weights are ignored.
    ///
    /// Precondition: `idx < self.chains().len()`.
    pub fn set_chain_weight(&mut self, idx: usize, weight: f64) {
        debug_assert!(
            idx < self.chains.len(),
            "set_chain_weight({idx}) with {} chains",
            self.chains.len()
        );
        if idx >= self.chains.len() {
            return;
        }
        if !weight.is_finite() {
            tracing::warn!(idx, weight, "non-finite chain weight ignored");
            return;
        }
        let others_zero = self
            .chains
            .iter()
            .enumerate()
            .all(|(i, c)| i == idx || c.weight() == 0.0);
        if others_zero && self.chains.len() > 1 {
            tracing::debug!(idx, epsilon = WEIGHT_EPSILON, "seeding zero sibling weights");
        }
        self.update_weights(|ws| pin_weight(ws, idx, weight));
    }

    pub fn chain_weight(&self, idx: usize) -> Option<f64> {
        self.chains.get(idx).map(Chain::weight)
    }

    /// Give every chain the same weight `1 / N`.
    pub fn equalize_weights(&mut self) {
        self.update_weights(uniform);
    }

    /// Chain weights in chain order.
    pub fn weights(&self) -> Vec<f64> {
        self.chains.iter().map(Chain::weight).collect()
    }

    fn update_weights(&mut self, f: impl FnOnce(&mut [f64])) {
        let mut ws = self.weights();
        f(&mut ws);
        for (chain, w) in self.chains.iter_mut().zip(ws) {
            chain.set_weight(w);
        }
    }

    /// Select the statistics pixel, clamped into the canvas.
    pub fn on_pointer_down(&mut self, x: u32, y: u32) {
        self.selected = PixelCoord::new(x, y).clamp_to(self.size);
    }

    pub fn selected(&self) -> PixelCoord {
        self.selected
    }

    /// Per-channel intensity sums of the output inside the mask, in `[0, 1]`.
    pub fn color_sums(&self) -> [f64; 3] {
        stats::color_sums(&self.output, &self.mask)
    }

    /// Output value at the selected pixel.
    pub fn pixel_value(&self) -> [u8; 3] {
        self.output.get_pixel(self.selected.x, self.selected.y).0
    }

    pub fn histogram(&self) -> Histogram {
        stats::histogram(&self.output, &self.mask)
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            iteration: self.iteration,
            color_sums: self.color_sums(),
            selected: self.selected,
            selected_pixel: self.pixel_value(),
            histogram: self.histogram(),
        }
    }

    /// Hand the output canvas and cursor to a display.
    pub fn present(&self, display: &mut dyn DisplayPort) -> MorphResult<()> {
        display.show_frame(self.iteration, &self.output, self.selected)
    }

    /// Serialize the chain set to the XML configuration format.
    pub fn to_config_string(&self) -> MorphResult<String> {
        let configs: Vec<ChainConfig> = self.chains.iter().map(ChainConfig::capture).collect();
        write_config(&configs)
    }

    /// Replace the chain set from an XML configuration.
    ///
    /// New chains start from the current output canvas. Weights that do not sum to 1 are
    /// renormalized. On a syntax error the generator is left unchanged.
    pub fn load_config_str(&mut self, xml: &str) -> MorphResult<()> {
        let configs = read_config(xml)?;
        self.apply_configs(configs);
        Ok(())
    }

    pub fn save_config(&self, path: impl AsRef<Path>) -> MorphResult<()> {
        let path = path.as_ref();
        let xml = self.to_config_string()?;
        std::fs::write(path, xml).map_err(|e| {
            MorphError::evaluation(format!("write configuration '{}': {e}", path.display()))
        })
    }

    pub fn load_config(&mut self, path: impl AsRef<Path>) -> MorphResult<()> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| {
            MorphError::validation(format!("read configuration '{}': {e}", path.display()))
        })?;
        self.load_config_str(&xml)
    }

    fn apply_configs(&mut self, configs: Vec<ChainConfig>) {
        self.chains = configs
            .into_iter()
            .map(|cfg| {
                let weight = if cfg.weight.is_finite() {
                    cfg.weight.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let mut chain = Chain::from_image(self.output.clone(), weight);
                for op in &cfg.operations {
                    chain.load_operation(&op.name, op.enabled, &op.values);
                }
                chain
            })
            .collect();

        let sum: f64 = self.chains.iter().map(Chain::weight).sum();
        if !self.chains.is_empty() && (sum - 1.0).abs() > 1e-9 {
            tracing::warn!(sum, "loaded chain weights do not sum to 1; renormalizing");
            self.update_weights(renormalize);
        }
    }
}

fn random_field(rng: &mut StdRng, size: ImageSize, grayscale: bool, mask: &Mask) -> RgbImage {
    let mut img = size.blank();
    {
        let buf: &mut [u8] = &mut img;
        rng.fill(buf);
    }
    if grayscale {
        let luma = imageops::grayscale(&img);
        img = RgbImage::from_fn(size.px(), size.px(), |x, y| {
            let v = luma.get_pixel(x, y).0[0];
            Rgb([v, v, v])
        });
    }
    mask.apply(&mut img);
    img
}

fn rescale(img: &RgbImage, size: ImageSize) -> RgbImage {
    imageops::resize(img, size.px(), size.px(), FilterType::Triangle)
}

fn save_image(img: &RgbImage, path: &Path) -> MorphResult<()> {
    img.save(path)
        .map_err(|e| MorphError::evaluation(format!("write image '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/generator.rs"]
mod tests;
