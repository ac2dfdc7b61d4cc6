//! Single-line text layout: padding, content box and baseline.

use crate::config::Margins;
use crate::monitor::Point;

/// Measured size of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extents {
    pub width: u32,
    /// Font ascent above the baseline.
    pub ascent: u32,
    /// Font descent below the baseline.
    pub descent: u32,
}

impl Extents {
    pub fn height(&self) -> u32 {
        self.ascent + self.descent
    }
}

/// Resolved padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Padding {
    /// `tab` is the measured extents of a single tab character and is only
    /// consulted for [`Margins::FontRelative`].
    pub fn resolve(margins: Margins, text: Extents, tab: Extents) -> Self {
        match margins {
            Margins::Fixed {
                horizontal,
                vertical,
            } => Self {
                horizontal,
                vertical,
            },
            Margins::FontRelative => Self {
                horizontal: tab.width,
                vertical: text.height() / 2,
            },
        }
    }
}

/// Size of the popup and where its text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Start of the baseline, relative to the popup origin.
    pub baseline: Point,
}

impl Frame {
    pub fn new(text: Extents, padding: Padding) -> Self {
        Self {
            width: text.width + 2 * padding.horizontal,
            height: text.height() + 2 * padding.vertical,
            baseline: Point {
                x: padding.horizontal as i32,
                y: (padding.vertical + text.ascent) as i32,
            },
        }
    }
}
