pub(crate) mod config;
pub(crate) mod layout;
pub(crate) mod sizing;
pub(crate) mod svg;
pub(crate) mod text;
