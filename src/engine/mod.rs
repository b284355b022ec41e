pub(crate) mod blend;
pub(crate) mod chain;
pub(crate) mod driver;
pub(crate) mod generator;
pub(crate) mod mask;
pub(crate) mod stats;
