//! Constants for graph rendering
//!
//! Layout is for the 128x128 panel split into two stacked 64 px panels.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::DISPLAY_WIDTH_PX;

/// mA per A; the current graph is drawn in A
pub const MILLIAMPS_PER_AMP: f32 = 1000.0;

/// Ws per Wh; the energy graph is drawn in Wh
pub const WATT_SECONDS_PER_WATT_HOUR: f32 = 3600.0;

/// Digit budget of the y-axis labels
pub const AXIS_LABEL_DIGITS: u8 = 4;

/// Height of one graph panel
pub const PANEL_HEIGHT_PX: u32 = 64;

/// Current graph, top half
pub const CURRENT_PANEL: Rectangle = Rectangle::new(
    Point::new(0, 0),
    Size::new(DISPLAY_WIDTH_PX, PANEL_HEIGHT_PX),
);

/// Energy graph, bottom half
pub const ENERGY_PANEL: Rectangle = Rectangle::new(
    Point::new(0, PANEL_HEIGHT_PX as i32),
    Size::new(DISPLAY_WIDTH_PX, PANEL_HEIGHT_PX),
);

/// Label row above the plot (FONT_4X6 plus a 1 px gap)
pub const TOP_LABEL_ROW_PX: u32 = 7;

/// Label row below the plot
pub const BOTTOM_LABEL_ROW_PX: u32 = 7;

/// Series line width in pixels
pub const SERIES_LINE_WIDTH_PX: u32 = 1;

/// Plot frame stroke width in pixels
pub const FRAME_STROKE_WIDTH_PX: u32 = 1;
