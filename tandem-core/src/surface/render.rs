//! Per-mode render routines
//!
//! Every screen shows three fields: a title, detail lines (the menu
//! position or fixed information), and a navigation hint. Layout positions
//! come from the surface's [`FieldSlots`](tandem_display::FieldSlots).

use core::fmt::Write;

use heapless::{String, Vec};
use tandem_display::{DisplayError, RenderTarget, SurfaceKind};

use crate::config::{MENU_COUNT, MENU_ITEMS, VERSION};
use crate::nav::{AppMode, MenuItem};
use crate::state::NavigationState;

/// Longest line on any surface
pub const LINE_LEN: usize = 21;

/// Most detail lines on any surface
pub const MAX_DETAIL: usize = 4;

/// Splash text shown while starting
pub const SPLASH: &str = "System Starting...";

/// One line of text, clipped to the widest surface
pub type Line = String<LINE_LEN>;

/// Text for one screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub title: Line,
    pub detail: Vec<Line, MAX_DETAIL>,
    pub hint: Line,
}

impl Panel {
    fn new(kind: SurfaceKind, title: &str, hint: &str) -> Self {
        Self {
            title: clip(kind, title),
            detail: Vec::new(),
            hint: clip(kind, hint),
        }
    }

    fn line(mut self, kind: SurfaceKind, text: &str) -> Self {
        let _ = self.detail.push(clip(kind, text));
        self
    }
}

/// Copy `text`, dropping whatever does not fit on one line of `kind`
fn clip(kind: SurfaceKind, text: &str) -> Line {
    let mut line = Line::new();
    for ch in text.chars().take(kind.columns().min(LINE_LEN)) {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

/// Build the panel for the current state
pub fn compose(kind: SurfaceKind, view: &NavigationState) -> Panel {
    match view.mode {
        AppMode::Menu => menu(kind, view),
        AppMode::Settings => settings(kind),
        AppMode::About => about(kind),
        AppMode::ConfirmExit => confirm_exit(kind),
    }
}

fn menu(kind: SurfaceKind, view: &NavigationState) -> Panel {
    match kind {
        SurfaceKind::Pixel => {
            let mut panel = Panel::new(kind, "Main Menu", "UP/DN:Move SEL:Pick");
            for (i, label) in MENU_ITEMS.iter().enumerate() {
                let marker = if i == view.menu_index { "> " } else { "  " };
                let mut line = Line::new();
                let _ = write!(line, "{marker}{label}");
                panel = panel.line(kind, &line);
            }
            panel
        }
        SurfaceKind::Text => {
            let mut title = Line::new();
            let _ = write!(title, "Menu [{}/{}]", view.menu_index + 1, MENU_COUNT);
            let label = MenuItem::from_index(view.menu_index).map_or("?", MenuItem::label);
            let mut line = Line::new();
            let _ = write!(line, "> {} {}", label, view.cached_time.time_string());
            Panel::new(kind, &title, "UP/DN  SEL1:Pick").line(kind, &line)
        }
    }
}

fn settings(kind: SurfaceKind) -> Panel {
    let mut version = Line::new();
    let _ = write!(version, "Version: {VERSION}");
    match kind {
        SurfaceKind::Pixel => Panel::new(kind, "Settings", "LEFT/SEL2: Back")
            .line(kind, "System Configuration")
            .line(kind, "")
            .line(kind, &version),
        SurfaceKind::Text => {
            Panel::new(kind, "Settings", "LEFT/SEL2:Back").line(kind, "Configure System")
        }
    }
}

fn about(kind: SurfaceKind) -> Panel {
    match kind {
        SurfaceKind::Pixel => Panel::new(kind, "About", "LEFT/SEL2: Back")
            .line(kind, "Tandem Menu System")
            .line(kind, "")
            .line(kind, "Dual Display"),
        SurfaceKind::Text => {
            let mut line = Line::new();
            let _ = write!(line, "Tandem v{VERSION}");
            Panel::new(kind, "About", "LEFT/SEL2:Back").line(kind, &line)
        }
    }
}

fn confirm_exit(kind: SurfaceKind) -> Panel {
    match kind {
        SurfaceKind::Pixel => Panel::new(kind, "Confirm Exit", "SEL1:Yes LEFT:No")
            .line(kind, "")
            .line(kind, "EXIT?"),
        SurfaceKind::Text => Panel::new(kind, "Exit System?", "SEL1:Yes SEL2:No"),
    }
}

/// Put a panel on a target and flush it
pub async fn draw<T: RenderTarget>(target: &mut T, panel: &Panel) -> Result<(), DisplayError> {
    let slots = target.kind().slots();
    target.clear().await?;

    target.set_cursor(slots.title.x, slots.title.y).await?;
    target.write_text(&panel.title).await?;

    for (i, line) in panel.detail.iter().take(slots.detail_lines).enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = slots.detail.y + i as u16 * slots.line_pitch;
        target.set_cursor(slots.detail.x, y).await?;
        target.write_text(line).await?;
    }

    target.set_cursor(slots.hint.x, slots.hint.y).await?;
    target.write_text(&panel.hint).await?;
    target.flush().await
}

/// Show the startup splash
pub async fn splash<T: RenderTarget>(target: &mut T) -> Result<(), DisplayError> {
    target.clear().await?;
    target.set_cursor(0, 0).await?;
    target.write_text(SPLASH).await?;
    target.flush().await
}
