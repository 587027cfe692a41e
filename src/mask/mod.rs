pub(crate) mod compositor;
pub(crate) mod spec;
pub(crate) mod text;
