//! Geometry: normalized field rectangles and pixel conversions.
//!
//! Field geometry is stored as fractions of the page size (0..1) so it is
//! independent of zoom and render resolution. Pixels exist only at two
//! boundaries: pointer input (converted in as soon as it arrives) and the
//! wire format (converted out at save time). Legacy server records may
//! carry either unit; [`Rect::to_normalized`] detects and converts.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_FIELD_SIZE;

/// A point in overlay (CSS pixel) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered page dimensions in pixels.
///
/// Live values come from the PDF display collaborator and change on
/// container resize, page navigation, or initial load. The default is the
/// historical wire fallback used when no page ever rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: crate::consts::DEFAULT_PAGE_WIDTH_PX,
            height: crate::consts::DEFAULT_PAGE_HEIGHT_PX,
        }
    }
}

impl PageSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle, in either normalized page fractions or
/// pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether every coordinate already lies in the normalized range.
    ///
    /// A rect with any coordinate above 1 must have been stored in pixels;
    /// one entirely within [0,1] is taken as already normalized. A field
    /// sitting exactly at x=1.0 in pixel units is indistinguishable from a
    /// normalized one — accepted ambiguity in the stored format.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.x <= 1.0 && self.y <= 1.0 && self.width <= 1.0 && self.height <= 1.0
    }

    /// Convert to normalized page fractions.
    ///
    /// Pixel-valued rects divide x/width by the page width and y/height by
    /// the page height; rects already in [0,1] pass through unchanged.
    #[must_use]
    pub fn to_normalized(self, page: PageSize) -> Self {
        if self.is_normalized() {
            return self;
        }
        Self {
            x: self.x / page.width,
            y: self.y / page.height,
            width: self.width / page.width,
            height: self.height / page.height,
        }
    }

    /// Convert a normalized rect to pixels for the given page size.
    #[must_use]
    pub fn to_pixels(self, page: PageSize) -> Self {
        Self {
            x: self.x * page.width,
            y: self.y * page.height,
            width: self.width * page.width,
            height: self.height * page.height,
        }
    }

    /// Clamp a normalized rect to legal bounds: size in
    /// [`MIN_FIELD_SIZE`, 1] and position such that the rect stays on the
    /// page. Returns the clamped rect and whether any value changed, so
    /// callers can report corrections of corrupt stored geometry.
    #[must_use]
    pub fn clamped(self) -> (Self, bool) {
        let width = self.width.clamp(MIN_FIELD_SIZE, 1.0);
        let height = self.height.clamp(MIN_FIELD_SIZE, 1.0);
        let x = self.x.clamp(0.0, 1.0 - width);
        let y = self.y.clamp(0.0, 1.0 - height);
        let clamped = Self { x, y, width, height };
        let changed = clamped != self;
        (clamped, changed)
    }
}
