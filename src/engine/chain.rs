use crate::foundation::core::{ImageSize, RgbImage};
use crate::ops::catalog::OperationKind;
use crate::ops::operation::Operation;
use crate::params::model::ParamValues;

/// Ordered operations applied to the chain's own image, plus its blend weight.
#[derive(Clone, Debug)]
pub struct Chain {
    operations: Vec<Operation>,
    image: RgbImage,
    weight: f64,
}

impl Chain {
    /// Empty chain with a blank image.
    pub fn new(size: ImageSize, weight: f64) -> Self {
        Self::from_image(size.blank(), weight)
    }

    /// Empty chain starting from a copy of `image`.
    pub fn from_image(image: RgbImage, weight: f64) -> Self {
        Self {
            operations: Vec::new(),
            image,
            weight,
        }
    }

    /// Chain with default operations for the given kinds, in order.
    pub fn with_operations(
        size: ImageSize,
        weight: f64,
        kinds: impl IntoIterator<Item = OperationKind>,
    ) -> Self {
        let mut chain = Self::new(size, weight);
        chain.operations = kinds.into_iter().map(Operation::new).collect();
        chain
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&self, idx: usize) -> Option<&Operation> {
        self.operations.get(idx)
    }

    pub fn operation_mut(&mut self, idx: usize) -> Option<&mut Operation> {
        self.operations.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub(crate) fn set_image(&mut self, image: RgbImage) {
        self.image = image;
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// Run every enabled operation in order, replacing the image after each one.
    pub fn iterate(&mut self) {
        for op in self.operations.iter().filter(|op| op.is_enabled()) {
            self.image = op.apply(&self.image);
        }
    }

    /// Move the operation at `from` to position `to`, shifting the ones in between.
    ///
    /// Precondition: both indices are `< self.len()`.
    pub fn swap(&mut self, from: usize, to: usize) {
        debug_assert!(
            from < self.operations.len() && to < self.operations.len(),
            "swap({from}, {to}) on a chain of {}",
            self.operations.len()
        );
        if from >= self.operations.len() || to >= self.operations.len() || from == to {
            return;
        }
        let op = self.operations.remove(from);
        self.operations.insert(to, op);
    }

    /// Remove and return the operation at `idx`.
    ///
    /// Precondition: `idx < self.len()`.
    pub fn remove(&mut self, idx: usize) -> Option<Operation> {
        debug_assert!(
            idx < self.operations.len(),
            "remove({idx}) on a chain of {}",
            self.operations.len()
        );
        (idx < self.operations.len()).then(|| self.operations.remove(idx))
    }

    /// Insert a default operation right after `after`, or at the front when `after` is `None`.
    ///
    /// An empty chain always receives it at position 0. Returns the position of the new
    /// operation. Precondition: `after < self.len()`.
    pub fn insert(&mut self, kind: OperationKind, after: Option<usize>) -> usize {
        let at = match after {
            _ if self.operations.is_empty() => 0,
            Some(i) => {
                debug_assert!(
                    i < self.operations.len(),
                    "insert after {i} on a chain of {}",
                    self.operations.len()
                );
                (i + 1).min(self.operations.len())
            }
            None => 0,
        };
        self.operations.insert(at, Operation::new(kind));
        at
    }

    /// [`Chain::insert`] by position in [`OperationKind::ALL`], as insert menus list it.
    ///
    /// Returns `None` and leaves the chain alone for an index past the catalog.
    pub fn insert_index(&mut self, catalog_idx: usize, after: Option<usize>) -> Option<usize> {
        let kind = OperationKind::from_index(catalog_idx)?;
        Some(self.insert(kind, after))
    }

    /// Append an operation.
    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Append an operation rebuilt from persisted values.
    ///
    /// Unknown catalog names are skipped and reported with `false`.
    pub fn load_operation(&mut self, name: &str, enabled: bool, values: &ParamValues) -> bool {
        let Some(kind) = OperationKind::from_name(name) else {
            tracing::warn!(name, "unknown operation skipped");
            return false;
        };
        self.operations.push(Operation::restore(kind, enabled, values));
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/chain.rs"]
mod tests;
