//! Render target trait
//!
//! Defines the interface every physical display exposes to the core.

use crate::surface::SurfaceKind;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Buffer overflow
    BufferOverflow,
}

/// Render target trait
///
/// Provides a hardware-agnostic interface for putting text on a display.
/// Implementations handle the specifics of OLED, LCD, or other display types.
///
/// Coordinates are in the target's native units: pixels for
/// [`SurfaceKind::Pixel`], character cells for [`SurfaceKind::Text`].
#[allow(async_fn_in_trait)]
pub trait RenderTarget {
    /// Which concrete surface this target is
    fn kind(&self) -> SurfaceKind;

    /// Bring the hardware up
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the entire display
    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the text cursor
    async fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError>;

    /// Write text at the cursor, advancing it
    async fn write_text(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    ///
    /// For displays with internal buffers, this sends the buffer to the hardware.
    async fn flush(&mut self) -> Result<(), DisplayError>;

    /// Leave the display blank before the owning task exits
    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.clear().await?;
        self.flush().await
    }
}

impl<T: RenderTarget> RenderTarget for &mut T {
    fn kind(&self) -> SurfaceKind {
        (**self).kind()
    }

    async fn init(&mut self) -> Result<(), DisplayError> {
        (**self).init().await
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear().await
    }

    async fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        (**self).set_cursor(x, y).await
    }

    async fn write_text(&mut self, text: &str) -> Result<(), DisplayError> {
        (**self).write_text(text).await
    }

    async fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush().await
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        (**self).shutdown().await
    }
}
