/// Fixed catalog of operation types.
///
/// The catalog index (position in [`OperationKind::ALL`]) is what insert menus use; the name is
/// the stable identifier persisted in configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    RescaleIntensity,
    GaussianBlur,
    Laplacian,
    RotationScaling,
    Morphology,
    Canny,
    EqualizeHistogram,
    MixChannels,
    Sharpen,
    HueShift,
}

impl OperationKind {
    /// Every catalog entry in catalog-index order.
    pub const ALL: [OperationKind; 10] = [
        Self::RescaleIntensity,
        Self::GaussianBlur,
        Self::Laplacian,
        Self::RotationScaling,
        Self::Morphology,
        Self::Canny,
        Self::EqualizeHistogram,
        Self::MixChannels,
        Self::Sharpen,
        Self::HueShift,
    ];

    /// Stable catalog identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::RescaleIntensity => "Rescale intensity",
            Self::GaussianBlur => "Gaussian blur",
            Self::Laplacian => "Laplacian",
            Self::RotationScaling => "Rotation & scaling",
            Self::Morphology => "Morphology",
            Self::Canny => "Canny",
            Self::EqualizeHistogram => "Equalize histogram",
            Self::MixChannels => "Mix channels",
            Self::Sharpen => "Sharpen",
            Self::HueShift => "Hue shift",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Catalog names in catalog-index order.
pub fn catalog_names() -> impl Iterator<Item = &'static str> {
    OperationKind::ALL.into_iter().map(OperationKind::name)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/catalog.rs"]
mod tests;
