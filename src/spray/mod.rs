pub(crate) mod emitter;
pub(crate) mod rng;
pub(crate) mod sweep;
