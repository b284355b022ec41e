//! morphogen runs a feedback-driven "morphogenesis" simulation over images.
//!
//! Several independent transform chains repeatedly reprocess their own copy of a square canvas.
//! After every step the chain images are blended by weight inside a circular mask, and the
//! blended canvas is fed back to every chain as the input of the next step.
//!
//! # Pipeline overview
//!
//! 1. **Seed**: every chain starts from a masked random field ([`Generator::seed`]).
//! 2. **Iterate**: each chain applies its enabled [`Operation`]s in order ([`Chain::iterate`]).
//! 3. **Blend**: `Σ weight_i × image_i` inside the [`Mask`] becomes the output canvas.
//! 4. **Feedback**: every chain image is replaced by the output canvas.
//!
//! Chain weights always sum to 1 under structural edits ([`Generator::add_chain`],
//! [`Generator::remove_chain`], [`Generator::set_chain_weight`]). The chain set persists as XML
//! through [`write_config`] / [`read_config`].
//!
//! The numeric kernels come from `image` and `imageproc`; this crate owns the parameter model,
//! the chain and weight bookkeeping, and the configuration format.
#![forbid(unsafe_code)]

mod config;
mod display;
mod engine;
mod foundation;
mod ops;
mod params;

pub use config::codec::{ChainConfig, OperationConfig, read_config, write_config};
pub use config::opts::GeneratorOpts;
pub use display::port::{DisplayPort, InMemoryDisplay, PngSequenceDisplay};
pub use engine::blend::weighted_blend;
pub use engine::chain::Chain;
pub use engine::driver::{RunStats, run_steps};
pub use engine::generator::{Generator, default_chain_set};
pub use engine::mask::Mask;
pub use engine::stats::{FrameStats, Histogram, color_sums, histogram};
pub use foundation::core::{ImageSize, PixelCoord, Rgb, RgbImage, RotateScale};
pub use foundation::error::{MorphError, MorphResult};
pub use ops::catalog::{OperationKind, catalog_names};
pub use ops::operation::{
    Canny, EqualizeHistogram, GaussianBlur, HueShift, Laplacian, MixChannels, Morphology,
    Operation, RescaleIntensity, RotationScaling, Sharpen, Transform,
};
pub use params::model::{
    BoolParam, DoubleParam, IntParam, KernelParam, OptionsParam, ParamMut, ParamRef, ParamValue,
    ParamValues, ParameterSets,
};
pub use params::options::{Interpolation, MorphShape, MorphType, OptionCode};
