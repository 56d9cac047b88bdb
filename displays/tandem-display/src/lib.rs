//! Display abstraction traits and shared components for Tandem
//!
//! This crate provides:
//! - `RenderTarget` trait, the only capability the navigation core needs
//!   from a physical display (clear, position, write text, flush)
//! - `SurfaceKind`, the closed set of surfaces the firmware drives, with the
//!   field geometry each one uses
//! - `Screen`, a character buffer that implements `RenderTarget` for headless
//!   use and tests
//!
//! # Supported Surfaces
//!
//! - **Pixel** (128x64 monochrome OLED): cursor positions are pixels, text is
//!   drawn with a 6x10 monospace font.
//! - **Text** (20x4 character LCD): cursor positions are character cells.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;
pub mod surface;

// Re-export key types
pub use backend::{DisplayError, RenderTarget};
pub use screen::{PixelScreen, Screen, TextScreen};
pub use surface::{FieldSlots, Point, SurfaceKind};
