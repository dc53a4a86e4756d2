pub(crate) mod branding;
pub mod global;
pub(crate) mod remote;
pub(crate) mod store;
