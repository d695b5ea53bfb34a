//! Command handlers grouped by concern.

pub(crate) mod cards;
pub(crate) mod profile;
pub(crate) mod session;
