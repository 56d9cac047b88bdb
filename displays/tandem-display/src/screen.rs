//! Screen buffer types
//!
//! Provides a character-based screen buffer that implements `RenderTarget`.
//! Pixel-addressed writes are mapped onto character cells, so the same
//! buffer can stand in for either surface.

use core::str;

use crate::backend::{DisplayError, RenderTarget};
use crate::surface::{SurfaceKind, PIXEL_GLYPH, PIXEL_HEIGHT, TEXT_COLS, TEXT_ROWS};

/// Character-cell screen buffer
#[derive(Clone)]
pub struct Screen<const COLS: usize, const ROWS: usize> {
    /// Current display content, space padded
    cells: [[u8; COLS]; ROWS],
    /// Which surface this buffer emulates
    kind: SurfaceKind,
    /// Native units per character cell (x, y)
    cell_size: (u16, u16),
    /// Cursor in character cells (col, row)
    cursor: (usize, usize),
    /// Whether `init` has been called
    initialized: bool,
    /// Whether the buffer changed since the last flush
    dirty: bool,
    /// Number of flushes performed
    flushes: u32,
}

/// Buffer shaped like the 20x4 character LCD
pub type TextScreen = Screen<{ TEXT_COLS as usize }, { TEXT_ROWS as usize }>;

/// Buffer shaped like the 128x64 OLED in 6x10 cells
pub type PixelScreen = Screen<21, { (PIXEL_HEIGHT / PIXEL_GLYPH.1) as usize }>;

impl TextScreen {
    /// Create a buffer that emulates the text surface
    pub const fn text() -> Self {
        Self::new(SurfaceKind::Text, (1, 1))
    }
}

impl PixelScreen {
    /// Create a buffer that emulates the pixel surface
    pub const fn pixel() -> Self {
        Self::new(SurfaceKind::Pixel, PIXEL_GLYPH)
    }
}

impl<const COLS: usize, const ROWS: usize> Screen<COLS, ROWS> {
    /// Create a new empty screen
    pub const fn new(kind: SurfaceKind, cell_size: (u16, u16)) -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
            kind,
            cell_size,
            cursor: (0, 0),
            initialized: false,
            dirty: true,
            flushes: 0,
        }
    }

    /// Get the content of a specific row, trailing spaces removed
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|line| str::from_utf8(line).ok())
            .map(|s| s.trim_end())
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..ROWS).filter_map(move |row| self.get_line(row))
    }

    /// Check whether any row contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    /// Check if screen has unflushed changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of completed flushes
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }

    /// Whether `init` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get number of rows
    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Get number of columns
    pub const fn cols(&self) -> usize {
        COLS
    }

    fn put(&mut self, text: &str) {
        let (mut col, row) = self.cursor;
        if row >= ROWS {
            return;
        }
        for ch in text.chars() {
            if col >= COLS {
                break;
            }
            self.cells[row][col] = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
            col += 1;
        }
        self.cursor.0 = col;
        self.dirty = true;
    }
}

impl<const COLS: usize, const ROWS: usize> RenderTarget for Screen<COLS, ROWS> {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.initialized = true;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        for line in &mut self.cells {
            line.fill(b' ');
        }
        self.cursor = (0, 0);
        self.dirty = true;
        Ok(())
    }

    async fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        let col = (x / self.cell_size.0) as usize;
        let row = (y / self.cell_size.1) as usize;
        if col >= COLS || row >= ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.cursor = (col, row);
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.put(text);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.dirty = false;
        self.flushes = self.flushes.wrapping_add(1);
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<const COLS: usize, const ROWS: usize> defmt::Format for Screen<COLS, ROWS> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line);
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_write_requires_init() {
        let mut screen = TextScreen::text();
        assert_eq!(
            block_on(screen.write_text("hi")),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_write_at_cursor() {
        let mut screen = TextScreen::text();
        block_on(async {
            screen.init().await.unwrap();
            screen.set_cursor(2, 1).await.unwrap();
            screen.write_text("Menu").await.unwrap();
            screen.write_text("!").await.unwrap();
        });
        assert_eq!(screen.get_line(1), Some("  Menu!"));
        assert_eq!(screen.get_line(0), Some(""));
    }

    #[test]
    fn test_truncates_long_lines() {
        let mut screen = TextScreen::text();
        block_on(async {
            screen.init().await.unwrap();
            screen.write_text("abcdefghijklmnopqrstuvwxyz").await.unwrap();
        });
        assert_eq!(screen.get_line(0), Some("abcdefghijklmnopqrst"));
    }

    #[test]
    fn test_pixel_mapping() {
        let mut screen = PixelScreen::pixel();
        block_on(async {
            screen.init().await.unwrap();
            screen.set_cursor(0, 54).await.unwrap();
            screen.write_text("hint").await.unwrap();
        });
        assert_eq!(screen.get_line(5), Some("hint"));
    }

    #[test]
    fn test_out_of_range_cursor() {
        let mut screen = TextScreen::text();
        block_on(screen.init()).unwrap();
        assert_eq!(
            block_on(screen.set_cursor(0, 4)),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_shutdown_clears_and_flushes() {
        let mut screen = TextScreen::text();
        block_on(async {
            screen.init().await.unwrap();
            screen.write_text("bye").await.unwrap();
            screen.shutdown().await.unwrap();
        });
        assert!(!screen.contains("bye"));
        assert_eq!(screen.flush_count(), 1);
        assert!(!screen.is_dirty());
    }
}
