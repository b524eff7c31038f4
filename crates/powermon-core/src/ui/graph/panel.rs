//! One labelled graph panel

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Polyline, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::Vec;
use log::trace;

use crate::history::HISTORY_CAPACITY;
use crate::scale::DisplayRange;
use crate::ui::{Line, SMALL_TEXT_STYLE, draw_text};

use super::constants::{AXIS_LABEL_DIGITS, FRAME_STROKE_WIDTH_PX, SERIES_LINE_WIDTH_PX};
use super::plot::{AxisLabels, normalize_series};
use super::viewport::Viewport;

/// Shown in the plot area before the first sample
const NO_DATA_TEXT: &str = "no data";

/// Graph of one series with its title, range labels and window span
#[derive(Debug, Clone, Copy)]
pub struct GraphPanel<'a> {
    viewport: Viewport,
    title: &'a str,
    unit: &'a str,
    digits: u8,
}

impl<'a> GraphPanel<'a> {
    /// Panel covering `bounds`, labelled with `title` and values in `unit`
    pub fn new(bounds: Rectangle, title: &'a str, unit: &'a str) -> Self {
        Self {
            viewport: Viewport::new(bounds),
            title,
            unit,
            digits: AXIS_LABEL_DIGITS,
        }
    }

    /// Digit budget for the range labels
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Draw the panel for a window of samples.
    ///
    /// `range` is `None` until the series' estimator has seen data; the plot
    /// area then shows a placeholder.
    pub fn draw<D>(
        &self,
        display: &mut D,
        timestamps: &[f32],
        values: &[f32],
        range: Option<DisplayRange>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let bounds = self.viewport.screen_bounds();
        let plot_area = self.viewport.plot_area();

        plot_area
            .into_styled(PrimitiveStyle::with_stroke(
                BinaryColor::On,
                FRAME_STROKE_WIDTH_PX,
            ))
            .draw(display)?;

        let Some(range) = range.filter(|_| !values.is_empty()) else {
            draw_text(display, self.title, bounds.top_left, SMALL_TEXT_STYLE)?;
            return draw_text(
                display,
                NO_DATA_TEXT,
                plot_area.top_left + Point::new(2, 2),
                SMALL_TEXT_STYLE,
            );
        };

        let labels = AxisLabels::new(&range, self.unit, self.digits, timestamps);

        let mut header = Line::new();
        let _ = write!(header, "{} {}", self.title, labels.top);
        draw_text(display, &header, bounds.top_left, SMALL_TEXT_STYLE)?;

        let footer_y = plot_area.top_left.y + plot_area.size.height as i32 + 1;
        draw_text(
            display,
            &labels.bottom,
            Point::new(bounds.top_left.x, footer_y),
            SMALL_TEXT_STYLE,
        )?;

        let right_aligned = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(
            &labels.span,
            Point::new(
                bounds.top_left.x + bounds.size.width as i32 - 1,
                footer_y,
            ),
            SMALL_TEXT_STYLE,
            right_aligned,
        )
        .draw(display)?;

        self.draw_series(display, timestamps, values, &range)
    }

    fn draw_series<D>(
        &self,
        display: &mut D,
        timestamps: &[f32],
        values: &[f32],
        range: &DisplayRange,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let mut screen_points: Vec<Point, HISTORY_CAPACITY> = Vec::new();
        for point in normalize_series(timestamps, values, range) {
            if let Some(p) = self.viewport.to_screen(point) {
                let _ = screen_points.push(p);
            }
        }

        trace!("{}: plotting {} points", self.title, screen_points.len());

        match screen_points.as_slice() {
            [] => Ok(()),
            [single] => Pixel(*single, BinaryColor::On).draw(display),
            points => Polyline::new(points)
                .into_styled(PrimitiveStyle::with_stroke(
                    BinaryColor::On,
                    SERIES_LINE_WIDTH_PX,
                ))
                .draw(display),
        }
    }
}
