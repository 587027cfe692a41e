pub(crate) mod fill;
pub(crate) mod scheduler;
