//! Shared helpers.

pub mod hash;
pub mod mime;
pub mod path;
