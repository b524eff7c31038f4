//! Screens for the 128x128 monochrome panel
//!
//! - [`summary`] - numeric readout of the latest reading and history stats
//! - [`graph`] - stacked current and energy graphs
//! - [`render_connecting`] - boot screen while the station associates

pub mod graph;
pub mod summary;

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

pub use graph::render_graphs;
pub use summary::{NetworkStatus, render_summary};

/// Panel width in pixels
pub const DISPLAY_WIDTH_PX: u32 = 128;

/// Panel height in pixels
pub const DISPLAY_HEIGHT_PX: u32 = 128;

/// Body text: 21 columns, 12 rows
pub const TEXT_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

/// Axis labels: 32 columns
pub const SMALL_TEXT_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&FONT_4X6, BinaryColor::On);

/// Row pitch of [`TEXT_STYLE`]
pub const LINE_HEIGHT_PX: i32 = 10;

/// Longest line a screen composes
pub const MAX_LINE_LENGTH: usize = 32;

/// One composed line of screen text
pub type Line = String<MAX_LINE_LENGTH>;

/// Draw `text` with its top-left corner at `position`
pub(crate) fn draw_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    style: MonoTextStyle<'static, BinaryColor>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(text, position, style, Baseline::Top).draw(display)?;
    Ok(())
}

/// Shown while the station is associating with `ssid`
pub fn render_connecting<D>(display: &mut D, ssid: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display.clear(BinaryColor::Off)?;

    let mut line = Line::new();
    let _ = write!(line, "connecting to {}", ssid);
    draw_text(display, &line, Point::zero(), TEXT_STYLE)
}
