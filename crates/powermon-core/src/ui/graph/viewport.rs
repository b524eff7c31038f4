//! Viewport and coordinate transformation
//!
//! Maps plot-space points (unit square, y up) onto the pixel rectangle left
//! after the label rows are taken off a panel.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::constants::{BOTTOM_LABEL_ROW_PX, TOP_LABEL_ROW_PX};
use super::plot::PlotPoint;

/// Padding around the plot area for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportPadding {
    /// Top padding in pixels
    pub top: u32,
    /// Bottom padding in pixels
    pub bottom: u32,
}

impl Default for ViewportPadding {
    fn default() -> Self {
        Self {
            top: TOP_LABEL_ROW_PX,
            bottom: BOTTOM_LABEL_ROW_PX,
        }
    }
}

/// Screen region of one graph panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Full panel including label rows
    screen_bounds: Rectangle,
    padding: ViewportPadding,
}

impl Viewport {
    pub fn new(screen_bounds: Rectangle) -> Self {
        Self {
            screen_bounds,
            padding: ViewportPadding::default(),
        }
    }

    /// Panel bounds minus the label rows
    pub fn plot_area(&self) -> Rectangle {
        let top_left = Point::new(
            self.screen_bounds.top_left.x,
            self.screen_bounds.top_left.y + self.padding.top as i32,
        );
        let height = self
            .screen_bounds
            .size
            .height
            .saturating_sub(self.padding.top + self.padding.bottom);

        Rectangle::new(top_left, Size::new(self.screen_bounds.size.width, height))
    }

    /// Transform a plot-space point to a pixel inside the plot area
    ///
    /// Screen y grows downward, so plot y is inverted. Returns `None` for a
    /// non-finite point or an empty plot area.
    pub fn to_screen(&self, point: PlotPoint) -> Option<Point> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }

        let area = self.plot_area();
        let bottom_right = area.bottom_right()?;
        let max_dx = (area.size.width - 1) as f32;
        let max_dy = (area.size.height - 1) as f32;

        let dx = libm::roundf(point.x.clamp(0.0, 1.0) * max_dx) as i32;
        let dy = libm::roundf((1.0 - point.y.clamp(0.0, 1.0)) * max_dy) as i32;

        let screen = area.top_left + Point::new(dx, dy);
        debug_assert!(screen.x <= bottom_right.x && screen.y <= bottom_right.y);
        Some(screen)
    }

    /// Full panel bounds
    pub fn screen_bounds(&self) -> Rectangle {
        self.screen_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Rectangle::new(Point::new(0, 64), Size::new(128, 64)))
    }

    #[test]
    fn test_plot_area_drops_label_rows() {
        assert_eq!(
            viewport().plot_area(),
            Rectangle::new(Point::new(0, 71), Size::new(128, 50))
        );
    }

    #[test]
    fn test_corners_map_to_plot_corners() {
        let vp = viewport();

        assert_eq!(
            vp.to_screen(PlotPoint { x: 0.0, y: 0.0 }),
            Some(Point::new(0, 120))
        );
        assert_eq!(
            vp.to_screen(PlotPoint { x: 1.0, y: 1.0 }),
            Some(Point::new(127, 71))
        );
    }

    #[test]
    fn test_out_of_range_points_are_clamped() {
        let vp = viewport();

        assert_eq!(
            vp.to_screen(PlotPoint { x: 2.0, y: -1.0 }),
            Some(Point::new(127, 120))
        );
        assert_eq!(vp.to_screen(PlotPoint { x: f32::NAN, y: 0.5 }), None);
    }

    #[test]
    fn test_empty_plot_area() {
        let vp = Viewport::new(Rectangle::new(Point::zero(), Size::new(128, 10)));
        assert_eq!(vp.to_screen(PlotPoint { x: 0.5, y: 0.5 }), None);
    }
}
