use serde::{Deserialize, Serialize};

/// Per-load settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Write texture coordinates as `(u, 1 - v)`, for targets whose texture
    /// origin is the top-left corner.
    pub flip_texture_v: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            flip_texture_v: true,
        }
    }
}
