use crate::params::options::{Interpolation, MorphShape, MorphType, OptionCode};

/// Named boolean switch.
#[derive(Clone, Debug, PartialEq)]
pub struct BoolParam {
    name: &'static str,
    value: bool,
}

impl BoolParam {
    pub fn new(name: &'static str, value: bool) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn set(&mut self, value: bool) {
        self.value = value;
    }
}

/// Named integer bounded to `[min, max]`, optionally restricted to odd values.
#[derive(Clone, Debug, PartialEq)]
pub struct IntParam {
    name: &'static str,
    value: i32,
    min: i32,
    max: i32,
    odd_only: bool,
}

impl IntParam {
    pub fn new(name: &'static str, value: i32, min: i32, max: i32) -> Self {
        debug_assert!(min <= max, "IntParam '{name}' has min > max");
        let mut p = Self {
            name,
            value: min,
            min,
            max,
            odd_only: false,
        };
        p.set(value);
        p
    }

    /// Integer that only admits odd values (kernel sizes).
    pub fn odd(name: &'static str, value: i32, min: i32, max: i32) -> Self {
        debug_assert!(min <= max, "IntParam '{name}' has min > max");
        let mut p = Self {
            name,
            value: min,
            min,
            max,
            odd_only: true,
        };
        p.set(value);
        p
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_odd_only(&self) -> bool {
        self.odd_only
    }

    /// Clamp and store `value`, returning what was stored.
    ///
    /// Even values on an odd-only parameter move up to the next odd value, or down when that
    /// would leave the range.
    pub fn set(&mut self, value: i32) -> i32 {
        let mut v = value.clamp(self.min, self.max);
        if self.odd_only && v % 2 == 0 {
            v = if v < self.max { v + 1 } else { v - 1 };
        }
        self.value = v;
        v
    }
}

/// Named floating point value bounded to `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleParam {
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
}

impl DoubleParam {
    pub fn new(name: &'static str, value: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "DoubleParam '{name}' has min > max");
        let mut p = Self {
            name,
            value: min,
            min,
            max,
        };
        p.set(value);
        p
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp and store `value`. Non-finite input is ignored.
    pub fn set(&mut self, value: f64) -> f64 {
        if value.is_finite() {
            self.value = value.clamp(self.min, self.max);
        }
        self.value
    }
}

/// Named choice from an enumerated option table.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsParam<T: OptionCode> {
    name: &'static str,
    value: T,
}

impl<T: OptionCode> OptionsParam<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Name ↔ value lookup table for editors.
    pub fn options(&self) -> &'static [(&'static str, T)] {
        T::OPTIONS
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Select by integer code; unknown codes leave the value unchanged and return `false`.
    pub fn set_code(&mut self, code: i32) -> bool {
        match T::from_code(code) {
            Some(v) => {
                self.value = v;
                true
            }
            None => false,
        }
    }

    /// Select by display name; unknown names leave the value unchanged and return `false`.
    pub fn select(&mut self, name: &str) -> bool {
        match T::from_name(name) {
            Some(v) => {
                self.value = v;
                true
            }
            None => false,
        }
    }
}

/// Fixed-length vector of bounded floats.
///
/// The element count is fixed at construction; only values change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelParam {
    name: &'static str,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl KernelParam {
    pub fn new(name: &'static str, values: Vec<f64>, min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "KernelParam '{name}' has min > max");
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(min, max) } else { 0.0 })
            .collect();
        Self {
            name,
            values,
            min,
            max,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Clamp and store one element.
    ///
    /// Precondition: `idx < self.len()`.
    pub fn set(&mut self, idx: usize, value: f64) {
        debug_assert!(idx < self.values.len(), "kernel index {idx} out of range");
        if let Some(slot) = self.values.get_mut(idx)
            && value.is_finite()
        {
            *slot = value.clamp(self.min, self.max);
        }
    }

    /// Overwrite elements from `values`; extra input is ignored, missing input keeps the
    /// current element.
    pub fn assign(&mut self, values: &[f64]) {
        for (i, v) in values.iter().take(self.values.len()).enumerate() {
            self.set(i, *v);
        }
    }

    /// Rescale so the elements sum to 1.
    ///
    /// Returns `false` and leaves the kernel untouched when the sum is zero or not finite, or
    /// when any rescaled element would fall outside `[min, max]`.
    pub fn normalize(&mut self) -> bool {
        let sum = self.sum();
        if sum == 0.0 || !sum.is_finite() {
            return false;
        }
        let in_bounds = self
            .values
            .iter()
            .map(|v| v / sum)
            .all(|v| (self.min..=self.max).contains(&v));
        if !in_bounds {
            return false;
        }
        self.values.iter_mut().for_each(|v| *v /= sum);
        true
    }
}

/// Serializable value of one parameter, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Double(f64),
    MorphType(i32),
    MorphShape(i32),
    Interpolation(i32),
    Kernel(Vec<f64>),
}

impl ParamValue {
    /// Type tag as written to the configuration format.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::MorphType(_) => MorphType::TYPE_TAG,
            Self::MorphShape(_) => MorphShape::TYPE_TAG,
            Self::Interpolation(_) => Interpolation::TYPE_TAG,
            Self::Kernel(_) => "kernel",
        }
    }
}

/// Shared view of one parameter of an operation.
#[derive(Clone, Copy, Debug)]
pub enum ParamRef<'a> {
    Bool(&'a BoolParam),
    Int(&'a IntParam),
    Double(&'a DoubleParam),
    MorphType(&'a OptionsParam<MorphType>),
    MorphShape(&'a OptionsParam<MorphShape>),
    Interpolation(&'a OptionsParam<Interpolation>),
    Kernel(&'a KernelParam),
}

impl ParamRef<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool(p) => p.name(),
            Self::Int(p) => p.name(),
            Self::Double(p) => p.name(),
            Self::MorphType(p) => p.name(),
            Self::MorphShape(p) => p.name(),
            Self::Interpolation(p) => p.name(),
            Self::Kernel(p) => p.name(),
        }
    }

    pub fn value(&self) -> ParamValue {
        match self {
            Self::Bool(p) => ParamValue::Bool(p.value()),
            Self::Int(p) => ParamValue::Int(p.value()),
            Self::Double(p) => ParamValue::Double(p.value()),
            Self::MorphType(p) => ParamValue::MorphType(p.value().code()),
            Self::MorphShape(p) => ParamValue::MorphShape(p.value().code()),
            Self::Interpolation(p) => ParamValue::Interpolation(p.value().code()),
            Self::Kernel(p) => ParamValue::Kernel(p.values().to_vec()),
        }
    }
}

/// Mutable view of one parameter of an operation.
#[derive(Debug)]
pub enum ParamMut<'a> {
    Bool(&'a mut BoolParam),
    Int(&'a mut IntParam),
    Double(&'a mut DoubleParam),
    MorphType(&'a mut OptionsParam<MorphType>),
    MorphShape(&'a mut OptionsParam<MorphShape>),
    Interpolation(&'a mut OptionsParam<Interpolation>),
    Kernel(&'a mut KernelParam),
}

impl ParamMut<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool(p) => p.name(),
            Self::Int(p) => p.name(),
            Self::Double(p) => p.name(),
            Self::MorphType(p) => p.name(),
            Self::MorphShape(p) => p.name(),
            Self::Interpolation(p) => p.name(),
            Self::Kernel(p) => p.name(),
        }
    }

    /// Write a tagged value through the parameter's own validation.
    ///
    /// Returns `false` when the value kind does not match the parameter kind or an option code
    /// is unknown; the parameter keeps its current value in that case.
    pub fn assign(&mut self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Bool(p), ParamValue::Bool(v)) => {
                p.set(*v);
                true
            }
            (Self::Int(p), ParamValue::Int(v)) => {
                p.set(*v);
                true
            }
            (Self::Double(p), ParamValue::Double(v)) => {
                p.set(*v);
                true
            }
            (Self::MorphType(p), ParamValue::MorphType(c)) => p.set_code(*c),
            (Self::MorphShape(p), ParamValue::MorphShape(c)) => p.set_code(*c),
            (Self::Interpolation(p), ParamValue::Interpolation(c)) => p.set_code(*c),
            (Self::Kernel(p), ParamValue::Kernel(vs)) => {
                p.assign(vs);
                true
            }
            _ => false,
        }
    }
}

/// Parameters of one operation grouped by kind, for editors that build one widget list per
/// kind.
#[derive(Clone, Debug, Default)]
pub struct ParameterSets<'a> {
    pub bools: Vec<&'a BoolParam>,
    pub ints: Vec<&'a IntParam>,
    pub doubles: Vec<&'a DoubleParam>,
    pub morph_types: Vec<&'a OptionsParam<MorphType>>,
    pub morph_shapes: Vec<&'a OptionsParam<MorphShape>>,
    pub interpolations: Vec<&'a OptionsParam<Interpolation>>,
    pub kernel: Option<&'a KernelParam>,
}

impl<'a> FromIterator<ParamRef<'a>> for ParameterSets<'a> {
    fn from_iter<I: IntoIterator<Item = ParamRef<'a>>>(iter: I) -> Self {
        let mut sets = Self::default();
        for p in iter {
            match p {
                ParamRef::Bool(p) => sets.bools.push(p),
                ParamRef::Int(p) => sets.ints.push(p),
                ParamRef::Double(p) => sets.doubles.push(p),
                ParamRef::MorphType(p) => sets.morph_types.push(p),
                ParamRef::MorphShape(p) => sets.morph_shapes.push(p),
                ParamRef::Interpolation(p) => sets.interpolations.push(p),
                ParamRef::Kernel(p) => {
                    debug_assert!(sets.kernel.is_none(), "operation has two kernels");
                    sets.kernel = Some(p);
                }
            }
        }
        sets
    }
}

/// Ordered `(name, value)` pairs read back from a configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamValues {
    entries: Vec<(String, ParamValue)>,
}

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: ParamValue) {
        self.entries.push((name.into(), value));
    }

    /// Last value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ParamValue)> for ParamValues {
    fn from_iter<I: IntoIterator<Item = (S, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/model.rs"]
mod tests;
