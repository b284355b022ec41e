pub(crate) mod catalog;
pub(crate) mod kernels;
pub(crate) mod operation;
