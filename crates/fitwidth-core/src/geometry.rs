#![forbid(unsafe_code)]

//! Geometry primitives.
//!
//! Only the horizontal axis matters here: the host computes the actual
//! layout and this crate reads back a single non-negative pixel quantity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative width in pixels, as read back from the host after layout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Width(u32);

impl Width {
    /// Zero width. A probe in a collapsed container measures this.
    pub const ZERO: Self = Self(0);

    /// Create a width from a pixel count.
    #[inline]
    #[must_use]
    pub const fn px(pixels: u32) -> Self {
        Self(pixels)
    }

    /// Pixel count.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Width {
    fn from(pixels: u32) -> Self {
        Self(pixels)
    }
}

impl From<Width> for u32 {
    fn from(width: Width) -> Self {
        width.0
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}
