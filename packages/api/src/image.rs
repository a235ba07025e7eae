//! Image types: metadata, dimensions, tile addressing, rendering settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Extra;

/// Image metadata as returned by `GET /image/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub uuid: String,

    #[serde(default)]
    pub name: String,

    /// UUID of the fileset the image was extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fileset: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Pixel extents of an image, `GET /image/{id}/dimensions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageDimensions {
    pub width: u64,
    pub height: u64,

    /// Number of pyramid levels available for tiling.
    #[serde(default)]
    pub levels: u32,

    /// Edge length of a square tile, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Position of a single tile in an image pyramid.
///
/// `z` (focal plane) and `t` (timepoint) default to `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub t: u32,
    pub level: u32,
}

impl TileCoord {
    pub fn new(level: u32, x: u32, y: u32) -> Self {
        Self {
            level,
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_plane(mut self, z: u32, t: u32) -> Self {
        self.z = z;
        self.t = t;
        self
    }

    /// `{x}/{y}/{z}/{t}/{level}`: the order the tile routes expect.
    pub fn path_segment(&self) -> String {
        format!("{}/{}/{}/{}/{}", self.x, self.y, self.z, self.t, self.level)
    }
}

/// Per-channel rendering parameters in the tile route's
/// `{index},{colour},{min},{max}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelParams {
    pub index: u32,
    /// Hex RGB colour without a leading `#`, e.g. `"FFFFFF"`.
    pub color: String,
    pub min: u32,
    pub max: u32,
}

impl Default for ChannelParams {
    /// Channel 0, white, full intensity window: `0,FFFFFF,0,1`.
    fn default() -> Self {
        Self {
            index: 0,
            color: "FFFFFF".into(),
            min: 0,
            max: 1,
        }
    }
}

impl fmt::Display for ChannelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.index, self.color, self.min, self.max)
    }
}

/// A stored set of rendering settings, returned by
/// `POST /image/{id}/rendering_settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderingSettings {
    pub uuid: String,

    #[serde(flatten)]
    pub extra: Extra,
}
