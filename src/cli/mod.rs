//! Command-line interface module.

mod args;
pub mod serve;
pub mod sizes;
pub mod url;

pub use args::{Cli, Commands};
