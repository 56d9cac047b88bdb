//! Surface kinds and field geometry
//!
//! Every screen the core renders has three informational fields: a title,
//! a detail block (menu position or mode detail), and a navigation hint.
//! Each surface places them differently.

/// A position in a surface's native units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Where the three fields go on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSlots {
    /// Title line
    pub title: Point,
    /// First detail line; further lines step down by `line_pitch`
    pub detail: Point,
    /// Distance between detail lines
    pub line_pitch: u16,
    /// Maximum number of detail lines
    pub detail_lines: usize,
    /// Navigation hint line
    pub hint: Point,
}

/// The closed set of output surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceKind {
    /// 128x64 monochrome pixel display, 6x10 font
    Pixel,
    /// 20x4 character display
    Text,
}

/// Pixel surface width in pixels
pub const PIXEL_WIDTH: u16 = 128;

/// Pixel surface height in pixels
pub const PIXEL_HEIGHT: u16 = 64;

/// Pixel surface glyph cell size
pub const PIXEL_GLYPH: (u16, u16) = (6, 10);

/// Text surface columns
pub const TEXT_COLS: u16 = 20;

/// Text surface rows
pub const TEXT_ROWS: u16 = 4;

impl SurfaceKind {
    /// Short name for logs
    pub const fn name(self) -> &'static str {
        match self {
            SurfaceKind::Pixel => "pixel",
            SurfaceKind::Text => "text",
        }
    }

    /// Characters that fit on one line
    pub const fn columns(self) -> usize {
        match self {
            SurfaceKind::Pixel => (PIXEL_WIDTH / PIXEL_GLYPH.0) as usize,
            SurfaceKind::Text => TEXT_COLS as usize,
        }
    }

    /// Field placement for this surface
    pub const fn slots(self) -> FieldSlots {
        match self {
            SurfaceKind::Pixel => FieldSlots {
                title: Point::new(0, 0),
                detail: Point::new(0, 12),
                line_pitch: PIXEL_GLYPH.1,
                detail_lines: 4,
                hint: Point::new(0, PIXEL_HEIGHT - PIXEL_GLYPH.1),
            },
            SurfaceKind::Text => FieldSlots {
                title: Point::new(0, 0),
                detail: Point::new(0, 1),
                line_pitch: 1,
                detail_lines: 2,
                hint: Point::new(0, TEXT_ROWS - 1),
            },
        }
    }
}
