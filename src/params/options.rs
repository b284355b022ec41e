//! Enumerated option types used by operation parameters.
//!
//! Every option type carries a name↔value table and a stable integer code. The code is what the
//! configuration codec persists, so codes must never be renumbered.

/// An enumerated parameter value with a stable integer code.
pub trait OptionCode: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Type tag written to the configuration format.
    const TYPE_TAG: &'static str;
    /// Display name ↔ value table, in presentation order.
    const OPTIONS: &'static [(&'static str, Self)];

    /// Stable integer code.
    fn code(self) -> i32;

    /// Look up a value by its integer code.
    fn from_code(code: i32) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .find(|(_, v)| v.code() == code)
            .map(|(_, v)| *v)
    }

    /// Look up a value by its display name (case-insensitive).
    fn from_name(name: &str) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(_, v)| *v)
    }

    /// Display name of this value.
    fn display_name(self) -> &'static str {
        Self::OPTIONS
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }
}

/// Morphological operation family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MorphType {
    Erode = 0,
    Dilate = 1,
    Open = 2,
    Close = 3,
    Gradient = 4,
    TopHat = 5,
    BlackHat = 6,
}

impl OptionCode for MorphType {
    const TYPE_TAG: &'static str = "morphtype";
    const OPTIONS: &'static [(&'static str, Self)] = &[
        ("Erode", Self::Erode),
        ("Dilate", Self::Dilate),
        ("Open", Self::Open),
        ("Close", Self::Close),
        ("Gradient", Self::Gradient),
        ("Top hat", Self::TopHat),
        ("Black hat", Self::BlackHat),
    ];

    fn code(self) -> i32 {
        self as i32
    }
}

/// Structuring element shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MorphShape {
    Rect = 0,
    Cross = 1,
    Ellipse = 2,
}

impl OptionCode for MorphShape {
    const TYPE_TAG: &'static str = "morphshape";
    const OPTIONS: &'static [(&'static str, Self)] = &[
        ("Rectangle", Self::Rect),
        ("Cross", Self::Cross),
        ("Ellipse", Self::Ellipse),
    ];

    fn code(self) -> i32 {
        self as i32
    }
}

/// Resampling filter for geometric transforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Nearest = 0,
    Bilinear = 1,
    Bicubic = 2,
}

impl OptionCode for Interpolation {
    const TYPE_TAG: &'static str = "interpolationflag";
    const OPTIONS: &'static [(&'static str, Self)] = &[
        ("Nearest", Self::Nearest),
        ("Linear", Self::Bilinear),
        ("Cubic", Self::Bicubic),
    ];

    fn code(self) -> i32 {
        self as i32
    }
}

impl From<Interpolation> for imageproc::geometric_transformations::Interpolation {
    fn from(v: Interpolation) -> Self {
        match v {
            Interpolation::Nearest => Self::Nearest,
            Interpolation::Bilinear => Self::Bilinear,
            Interpolation::Bicubic => Self::Bicubic,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/options.rs"]
mod tests;
