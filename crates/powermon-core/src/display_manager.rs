//! Display manager for frame pacing and screen selection
//!
//! Owns the draw target and decides when a frame is due: after new samples,
//! a mode change, a network status change or an explicit redraw request.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, error};

use crate::app_state::{AppState, DisplayMode};
use crate::ui::{NetworkStatus, render_connecting, render_graphs, render_summary};

/// Display manager that owns the display and renders the selected screen
pub struct DisplayManager<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display: D,
    network: NetworkStatus,
    needs_redraw: bool,
    last_mode: Option<DisplayMode>,
    last_sample: u32,
    frames: u32,
}

impl<D> DisplayManager<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    /// Create a new display manager with the given display
    pub fn new(display: D) -> Self {
        Self {
            display,
            network: NetworkStatus::Disconnected,
            needs_redraw: true,
            last_mode: None,
            last_sample: 0,
            frames: 0,
        }
    }

    /// Force the next [`render`](Self::render) to draw
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn set_network(&mut self, network: NetworkStatus) {
        if network != self.network {
            debug!("Network status changed: {:?}", network);
            self.network = network;
            self.needs_redraw = true;
        }
    }

    pub fn network(&self) -> NetworkStatus {
        self.network
    }

    /// Show the association screen; the next `render` replaces it
    pub fn show_connecting(&mut self, ssid: &str) -> Result<(), D::Error> {
        render_connecting(&mut self.display, ssid)?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Whether `app` has changed since the last frame
    pub fn is_due(&self, app: &AppState) -> bool {
        self.needs_redraw
            || self.last_mode != Some(app.mode())
            || self.last_sample != app.samples_recorded()
    }

    /// Draw a frame of the active screen if one is due.
    ///
    /// Returns whether a frame was drawn. The graph screen updates the scale
    /// estimators, so each drawn graph frame advances their hold counters.
    pub fn render(&mut self, app: &mut AppState) -> Result<bool, D::Error> {
        if !self.is_due(app) {
            return Ok(false);
        }

        let mode = app.mode();
        debug!("Rendering {:?} frame #{}", mode, self.frames);

        match mode {
            DisplayMode::Summary => render_summary(app, &mut self.display, self.network)?,
            DisplayMode::Graph => render_graphs(app, &mut self.display)?,
        }

        self.last_mode = Some(mode);
        self.last_sample = app.samples_recorded();
        self.needs_redraw = false;
        self.frames = self.frames.wrapping_add(1);
        Ok(true)
    }

    /// [`render`](Self::render), logging instead of returning draw failures
    pub fn tick(&mut self, app: &mut AppState) -> bool
    where
        D::Error: core::fmt::Debug,
    {
        match self.render(app) {
            Ok(drawn) => drawn,
            Err(e) => {
                error!("Display render error: {:?}", e);
                false
            }
        }
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn into_inner(self) -> D {
        self.display
    }
}
