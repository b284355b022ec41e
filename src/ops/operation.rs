use crate::foundation::core::RgbImage;
use crate::ops::catalog::OperationKind;
use crate::ops::kernels;
use crate::params::model::{
    BoolParam, DoubleParam, IntParam, KernelParam, OptionsParam, ParamMut, ParamRef, ParamValues,
    ParameterSets,
};
use crate::params::options::{Interpolation, MorphShape, MorphType};

/// `alpha * v + beta` on every channel.
#[derive(Clone, Debug, PartialEq)]
pub struct RescaleIntensity {
    pub alpha: DoubleParam,
    pub beta: DoubleParam,
}

impl Default for RescaleIntensity {
    fn default() -> Self {
        Self {
            alpha: DoubleParam::new("alpha", 1.0, -10.0, 10.0),
            beta: DoubleParam::new("beta", 0.0, -255.0, 255.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GaussianBlur {
    pub ksize: IntParam,
    /// `0` derives sigma from the window size.
    pub sigma: DoubleParam,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self {
            ksize: IntParam::odd("ksize", 3, 1, 51),
            sigma: DoubleParam::new("sigma", 1.0, 0.0, 50.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Laplacian {
    pub scale: DoubleParam,
    pub delta: DoubleParam,
    pub absolute: BoolParam,
}

impl Default for Laplacian {
    fn default() -> Self {
        Self {
            scale: DoubleParam::new("scale", 1.0, 0.0, 100.0),
            delta: DoubleParam::new("delta", 0.0, -255.0, 255.0),
            absolute: BoolParam::new("absolute", true),
        }
    }
}

/// Rotation (degrees) and uniform scale about the canvas center.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationScaling {
    pub angle: DoubleParam,
    pub scale: DoubleParam,
    pub interpolation: OptionsParam<Interpolation>,
}

impl Default for RotationScaling {
    fn default() -> Self {
        Self {
            angle: DoubleParam::new("angle", 0.5, -180.0, 180.0),
            scale: DoubleParam::new("scale", 1.0, 0.1, 10.0),
            interpolation: OptionsParam::new("interpolation", Interpolation::Bilinear),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Morphology {
    pub kind: OptionsParam<MorphType>,
    pub shape: OptionsParam<MorphShape>,
    pub radius: IntParam,
    pub iterations: IntParam,
}

impl Default for Morphology {
    fn default() -> Self {
        Self {
            kind: OptionsParam::new("type", MorphType::Open),
            shape: OptionsParam::new("shape", MorphShape::Ellipse),
            radius: IntParam::new("radius", 1, 0, 20),
            iterations: IntParam::new("iterations", 1, 1, 10),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Canny {
    pub low: DoubleParam,
    pub high: DoubleParam,
}

impl Default for Canny {
    fn default() -> Self {
        Self {
            low: DoubleParam::new("low", 50.0, 0.0, 1000.0),
            high: DoubleParam::new("high", 100.0, 0.0, 1000.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EqualizeHistogram {
    /// Equalize each channel independently instead of the luminance.
    pub per_channel: BoolParam,
}

impl Default for EqualizeHistogram {
    fn default() -> Self {
        Self {
            per_channel: BoolParam::new("per channel", true),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MixChannels {
    pub weights: KernelParam,
}

impl Default for MixChannels {
    fn default() -> Self {
        Self {
            weights: KernelParam::new("weights", vec![1.0, 0.0, 0.0], -2.0, 2.0),
        }
    }
}

/// 3x3 convolution, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Sharpen {
    pub kernel: KernelParam,
}

impl Default for Sharpen {
    fn default() -> Self {
        Self {
            kernel: KernelParam::new(
                "kernel",
                vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
                -10.0,
                10.0,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HueShift {
    pub degrees: IntParam,
}

impl Default for HueShift {
    fn default() -> Self {
        Self {
            degrees: IntParam::new("degrees", 5, -180, 180),
        }
    }
}

/// Catalog variant together with its live parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Transform {
    RescaleIntensity(RescaleIntensity),
    GaussianBlur(GaussianBlur),
    Laplacian(Laplacian),
    RotationScaling(RotationScaling),
    Morphology(Morphology),
    Canny(Canny),
    EqualizeHistogram(EqualizeHistogram),
    MixChannels(MixChannels),
    Sharpen(Sharpen),
    HueShift(HueShift),
}

impl Transform {
    /// Fresh variant with catalog defaults.
    pub fn with_defaults(kind: OperationKind) -> Self {
        match kind {
            OperationKind::RescaleIntensity => Self::RescaleIntensity(Default::default()),
            OperationKind::GaussianBlur => Self::GaussianBlur(Default::default()),
            OperationKind::Laplacian => Self::Laplacian(Default::default()),
            OperationKind::RotationScaling => Self::RotationScaling(Default::default()),
            OperationKind::Morphology => Self::Morphology(Default::default()),
            OperationKind::Canny => Self::Canny(Default::default()),
            OperationKind::EqualizeHistogram => Self::EqualizeHistogram(Default::default()),
            OperationKind::MixChannels => Self::MixChannels(Default::default()),
            OperationKind::Sharpen => Self::Sharpen(Default::default()),
            OperationKind::HueShift => Self::HueShift(Default::default()),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::RescaleIntensity(_) => OperationKind::RescaleIntensity,
            Self::GaussianBlur(_) => OperationKind::GaussianBlur,
            Self::Laplacian(_) => OperationKind::Laplacian,
            Self::RotationScaling(_) => OperationKind::RotationScaling,
            Self::Morphology(_) => OperationKind::Morphology,
            Self::Canny(_) => OperationKind::Canny,
            Self::EqualizeHistogram(_) => OperationKind::EqualizeHistogram,
            Self::MixChannels(_) => OperationKind::MixChannels,
            Self::Sharpen(_) => OperationKind::Sharpen,
            Self::HueShift(_) => OperationKind::HueShift,
        }
    }

    fn parameters(&self) -> Vec<ParamRef<'_>> {
        match self {
            Self::RescaleIntensity(op) => {
                vec![ParamRef::Double(&op.alpha), ParamRef::Double(&op.beta)]
            }
            Self::GaussianBlur(op) => vec![ParamRef::Int(&op.ksize), ParamRef::Double(&op.sigma)],
            Self::Laplacian(op) => vec![
                ParamRef::Double(&op.scale),
                ParamRef::Double(&op.delta),
                ParamRef::Bool(&op.absolute),
            ],
            Self::RotationScaling(op) => vec![
                ParamRef::Double(&op.angle),
                ParamRef::Double(&op.scale),
                ParamRef::Interpolation(&op.interpolation),
            ],
            Self::Morphology(op) => vec![
                ParamRef::MorphType(&op.kind),
                ParamRef::MorphShape(&op.shape),
                ParamRef::Int(&op.radius),
                ParamRef::Int(&op.iterations),
            ],
            Self::Canny(op) => vec![ParamRef::Double(&op.low), ParamRef::Double(&op.high)],
            Self::EqualizeHistogram(op) => vec![ParamRef::Bool(&op.per_channel)],
            Self::MixChannels(op) => vec![ParamRef::Kernel(&op.weights)],
            Self::Sharpen(op) => vec![ParamRef::Kernel(&op.kernel)],
            Self::HueShift(op) => vec![ParamRef::Int(&op.degrees)],
        }
    }

    fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        match self {
            Self::RescaleIntensity(op) => {
                vec![ParamMut::Double(&mut op.alpha), ParamMut::Double(&mut op.beta)]
            }
            Self::GaussianBlur(op) => {
                vec![ParamMut::Int(&mut op.ksize), ParamMut::Double(&mut op.sigma)]
            }
            Self::Laplacian(op) => vec![
                ParamMut::Double(&mut op.scale),
                ParamMut::Double(&mut op.delta),
                ParamMut::Bool(&mut op.absolute),
            ],
            Self::RotationScaling(op) => vec![
                ParamMut::Double(&mut op.angle),
                ParamMut::Double(&mut op.scale),
                ParamMut::Interpolation(&mut op.interpolation),
            ],
            Self::Morphology(op) => vec![
                ParamMut::MorphType(&mut op.kind),
                ParamMut::MorphShape(&mut op.shape),
                ParamMut::Int(&mut op.radius),
                ParamMut::Int(&mut op.iterations),
            ],
            Self::Canny(op) => vec![ParamMut::Double(&mut op.low), ParamMut::Double(&mut op.high)],
            Self::EqualizeHistogram(op) => vec![ParamMut::Bool(&mut op.per_channel)],
            Self::MixChannels(op) => vec![ParamMut::Kernel(&mut op.weights)],
            Self::Sharpen(op) => vec![ParamMut::Kernel(&mut op.kernel)],
            Self::HueShift(op) => vec![ParamMut::Int(&mut op.degrees)],
        }
    }

    fn apply(&self, image: &RgbImage) -> RgbImage {
        match self {
            Self::RescaleIntensity(op) => {
                kernels::rescale_intensity(image, op.alpha.value(), op.beta.value())
            }
            Self::GaussianBlur(op) => {
                kernels::gaussian_blur(image, op.ksize.value(), op.sigma.value())
            }
            Self::Laplacian(op) => kernels::laplacian(
                image,
                op.scale.value(),
                op.delta.value(),
                op.absolute.value(),
            ),
            Self::RotationScaling(op) => kernels::rotate_scale(
                image,
                op.angle.value(),
                op.scale.value(),
                op.interpolation.value(),
            ),
            Self::Morphology(op) => kernels::morphology(
                image,
                op.kind.value(),
                op.shape.value(),
                op.radius.value(),
                op.iterations.value(),
            ),
            Self::Canny(op) => kernels::canny(image, op.low.value(), op.high.value()),
            Self::EqualizeHistogram(op) => kernels::equalize(image, op.per_channel.value()),
            Self::MixChannels(op) => kernels::mix_channels(image, op.weights.values()),
            Self::Sharpen(op) => kernels::convolve3x3(image, op.kernel.values()),
            Self::HueShift(op) => kernels::hue_shift(image, op.degrees.value()),
        }
    }
}

/// One enable-flagged, parameterized transform in a chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    transform: Transform,
    enabled: bool,
}

impl Operation {
    /// Enabled operation with catalog defaults.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            transform: Transform::with_defaults(kind),
            enabled: true,
        }
    }

    /// Rebuild an operation from persisted values.
    ///
    /// Values whose name or kind does not match a parameter of `kind` are ignored; parameters
    /// without a value keep their catalog default.
    pub fn restore(kind: OperationKind, enabled: bool, values: &ParamValues) -> Self {
        let mut op = Self::new(kind);
        op.enabled = enabled;
        for mut p in op.transform.parameters_mut() {
            let Some(v) = values.get(p.name()) else {
                tracing::debug!(operation = kind.name(), parameter = p.name(), "using default");
                continue;
            };
            if !p.assign(v) {
                tracing::warn!(
                    operation = kind.name(),
                    parameter = p.name(),
                    found = v.type_tag(),
                    "parameter value does not fit; keeping default"
                );
            }
        }
        op
    }

    pub fn kind(&self) -> OperationKind {
        self.transform.kind()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Typed access to the variant.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Live parameters in declaration order.
    pub fn parameters(&self) -> Vec<ParamRef<'_>> {
        self.transform.parameters()
    }

    pub fn parameters_mut(&mut self) -> Vec<ParamMut<'_>> {
        self.transform.parameters_mut()
    }

    /// Live parameters grouped by kind.
    pub fn parameter_sets(&self) -> ParameterSets<'_> {
        self.parameters().into_iter().collect()
    }

    pub fn parameter(&self, name: &str) -> Option<ParamRef<'_>> {
        self.parameters().into_iter().find(|p| p.name() == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<ParamMut<'_>> {
        self.parameters_mut().into_iter().find(|p| p.name() == name)
    }

    /// Transform `image` with the current parameter values.
    ///
    /// Pure: reads only `image` and `self`. Chains call this only for enabled operations.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        self.transform.apply(image)
    }
}

impl From<OperationKind> for Operation {
    fn from(kind: OperationKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/operation.rs"]
mod tests;
