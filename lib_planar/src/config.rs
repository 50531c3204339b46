//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NAME, PALETTE_SLOTS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::planar::bitplane::planes_for_slots;

/// Parameters for one encoding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Hardware palette slots the quantized palette is padded to
    #[serde(default = "default_slots")]
    pub slots: usize,

    /// Bitplanes to emit; derived from `slots` when absent
    #[serde(default)]
    pub planes: Option<u8>,

    /// Required image width, if any
    #[serde(default)]
    pub width: Option<u32>,

    /// Required image height, if any
    #[serde(default)]
    pub height: Option<u32>,

    /// Prefix for array names in the source text rendering
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            planes: None,
            width: None,
            height: None,
            name: default_name(),
        }
    }
}

impl CodecConfig {
    /// The 320x256, 32-color splash screen layout.
    pub fn splash() -> Self {
        Self {
            width: Some(SCREEN_WIDTH),
            height: Some(SCREEN_HEIGHT),
            ..Self::default()
        }
    }

    pub fn plane_count(&self) -> u8 {
        self.planes.unwrap_or_else(|| planes_for_slots(self.slots))
    }

    /// The required size when both dimensions are pinned.
    pub fn expected_size(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

fn default_slots() -> usize {
    PALETTE_SLOTS
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plane_count() {
        let config = CodecConfig::default();
        assert_eq!(config.slots, 32);
        assert_eq!(config.plane_count(), 5);
        assert_eq!(config.expected_size(), None);
    }

    #[test]
    fn test_explicit_plane_count() {
        let config = CodecConfig {
            slots: 16,
            planes: Some(6),
            ..CodecConfig::default()
        };
        assert_eq!(config.plane_count(), 6);

        let config = CodecConfig {
            slots: 16,
            ..CodecConfig::default()
        };
        assert_eq!(config.plane_count(), 4);
    }

    #[test]
    fn test_splash_layout() {
        let config = CodecConfig::splash();
        assert_eq!(config.expected_size(), Some((320, 256)));
        assert_eq!(config.name, "splash");
    }
}
