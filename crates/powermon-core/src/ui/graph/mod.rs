//! Graph screen
//!
//! Two stacked panels: current (A) on top, cumulative energy (Wh) below.
//! Each frame copies the whole history window, converts it to display
//! units, feeds it through that series' scale estimator and draws the
//! result. The estimators are the only state carried between frames.

pub mod constants;
mod panel;
pub mod plot;
pub mod viewport;

pub use panel::GraphPanel;
pub use plot::{AxisLabels, PlotPoint, PlotPoints, normalize_series};
pub use viewport::{Viewport, ViewportPadding};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::debug;

use crate::app_state::AppState;
use crate::history::HISTORY_CAPACITY;

use constants::{CURRENT_PANEL, ENERGY_PANEL, MILLIAMPS_PER_AMP, WATT_SECONDS_PER_WATT_HOUR};

/// One frame's copy of the history in display units
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    timestamps: [f32; HISTORY_CAPACITY],
    current_a: [f32; HISTORY_CAPACITY],
    energy_wh: [f32; HISTORY_CAPACITY],
    len: usize,
}

impl SeriesWindow {
    /// Copy the retained samples out of `app`'s history
    pub fn capture(app: &AppState) -> Self {
        let history = app.history();
        let mut window = Self {
            timestamps: [0.0; HISTORY_CAPACITY],
            current_a: [0.0; HISTORY_CAPACITY],
            energy_wh: [0.0; HISTORY_CAPACITY],
            len: 0,
        };

        window.len = history.copy_timestamps(&mut window.timestamps);
        history.copy_currents(&mut window.current_a);
        history.copy_energy(&mut window.energy_wh);

        for value in &mut window.current_a[..window.len] {
            *value /= MILLIAMPS_PER_AMP;
        }
        for value in &mut window.energy_wh[..window.len] {
            *value /= WATT_SECONDS_PER_WATT_HOUR;
        }

        window
    }

    pub fn timestamps(&self) -> &[f32] {
        &self.timestamps[..self.len]
    }

    /// Current in A
    pub fn current_a(&self) -> &[f32] {
        &self.current_a[..self.len]
    }

    /// Cumulative energy in Wh
    pub fn energy_wh(&self) -> &[f32] {
        &self.energy_wh[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Update both scale estimators and draw the graph screen.
///
/// Call once per rendered frame.
pub fn render_graphs<D>(app: &mut AppState, display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let window = SeriesWindow::capture(app);
    let digits = app.display_config();
    let (current_digits, energy_digits) = (digits.current_digits, digits.energy_digits);

    let (_, current_scale, energy_scale) = app.graph_parts();
    current_scale.update_with_history(window.current_a());
    energy_scale.update_with_history(window.energy_wh());

    let current_range = current_scale.display_range();
    let energy_range = energy_scale.display_range();
    debug!(
        "Graph frame: {} samples, current {:?}, energy {:?}",
        window.len(),
        current_range,
        energy_range
    );

    display.clear(BinaryColor::Off)?;

    GraphPanel::new(CURRENT_PANEL, "I", "A")
        .with_digits(axis_digits(current_digits))
        .draw(display, window.timestamps(), window.current_a(), current_range)?;

    GraphPanel::new(ENERGY_PANEL, "E", "Wh")
        .with_digits(axis_digits(energy_digits))
        .draw(display, window.timestamps(), window.energy_wh(), energy_range)
}

/// The axis labels share a row with the window span, so they never use
/// more than the label budget.
fn axis_digits(configured: u8) -> u8 {
    configured.min(constants::AXIS_LABEL_DIGITS)
}
