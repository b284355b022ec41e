pub(crate) mod port;
