//! `[sizes.<name>]` tables: custom image sizes.
//!
//! ```toml
//! [sizes.card]
//! width = 640
//! height = 360
//! crop = true
//!
//! [sizes.medium]   # overrides the built-in size
//! width = 400
//! ```
//!
//! A zero (or missing) dimension is unconstrained.

use serde::{Deserialize, Serialize};

use crate::sizes::SizeDefinition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    pub width: u32,
    pub height: u32,
    pub crop: bool,
}

impl SizeConfig {
    pub fn to_definition(self, name: &str) -> SizeDefinition {
        SizeDefinition::new(name, self.width, self.height, self.crop)
    }
}
