//! Configuration options for picking.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for the pick render target and pick renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickOptions {
    /// Width of the off-screen pick target in texels.
    pub target_width: u32,

    /// Height of the off-screen pick target in texels.
    pub target_height: u32,

    /// Background color of normal (non-pick) renders. Pick renders always
    /// clear to black, the reserved background encoding.
    pub background_color: Vec3,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            target_width: 1024,
            target_height: 1024,
            background_color: Vec3::new(0.10, 0.11, 0.13),
        }
    }
}

impl PickOptions {
    /// Loads options from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes options to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
