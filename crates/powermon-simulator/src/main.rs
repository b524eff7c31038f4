//! Desktop simulator for the powermon battery monitor.
//!
//! Feeds a synthetic battery discharge through the same sample trigger,
//! application context and display manager the firmware uses, renders into
//! an in-memory framebuffer and prints the final frame as text.
//!
//! ```text
//! powermon-simulator --samples 240 --mode graph --spike-every 25 --html status.html
//! ```
//!
//! Every drawn frame is flushed through a byte-counting stand-in for the
//! SH1107 link, so the log shows what partial updates would cost on the bus.
//!
//! Set `RUST_LOG=debug` to trace every sample and frame.

use std::error::Error;
use std::fs;
use std::net::Ipv4Addr;
use std::convert::Infallible;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info, warn};

use powermon_core::app_state::{AppState, DisplayMode, ServiceOutcome};
use powermon_core::config::MonitorConfig;
use powermon_core::display_manager::DisplayManager;
use powermon_core::framebuffer::{FRAME_BYTES, FrameBuffer};
use powermon_core::sensors::{PowerReading, PowerSensor, SensorError};
use powermon_core::status_page::StatusPage;
use powermon_core::trigger::SampleTrigger;
use powermon_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, NetworkStatus};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Summary,
    Graph,
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Summary => DisplayMode::Summary,
            ModeArg::Graph => DisplayMode::Graph,
        }
    }
}

#[derive(Parser)]
#[command(about = "Run the powermon core against a synthetic battery")]
struct Args {
    /// Number of sensor conversions to simulate
    #[arg(short = 'n', long, default_value_t = 240)]
    samples: u32,

    /// Screen to render; overrides the config's start mode
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Inject a single-sample current spike every K conversions (0 = never)
    #[arg(short, long, default_value_t = 25)]
    spike_every: u32,

    /// Fail every K-th sensor read (0 = never); failures alternate between
    /// a missed conversion and a bus error
    #[arg(long, default_value_t = 0)]
    fail_every: u32,

    /// Write the HTML status page here after the run
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write the final frame as raw page-packed controller bytes
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Load a postcard-encoded device config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective config as postcard bytes
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Pretend the station got this address
    #[arg(long)]
    ip: Option<Ipv4Addr>,
}

// ---------------------------------------------------------------------------
// Mock sensor
// ---------------------------------------------------------------------------

/// Shunt resistor of the reference board, in ohms
const SHUNT_OHMS: f32 = 0.015;

/// Li-ion cell voltage at full charge and at cutoff
const CELL_FULL_V: f32 = 4.2;
const CELL_EMPTY_V: f32 = 3.3;

/// Simulated time for a full discharge, in seconds
const DISCHARGE_S: f32 = 3600.0;

/// Current multiplier of an injected spike
const SPIKE_FACTOR: f32 = 8.0;

/// Synthetic INA228: a cell discharging into a load with ripple and spikes.
struct MockPowerSensor {
    interval_s: f32,
    spike_every: u32,
    fail_every: u32,
    conversions: u32,
    elapsed_s: f32,
    energy_ws: f32,
}

impl MockPowerSensor {
    fn new(interval_s: f32, spike_every: u32, fail_every: u32) -> Self {
        Self {
            interval_s,
            spike_every,
            fail_every,
            conversions: 0,
            elapsed_s: 0.0,
            energy_ws: 0.0,
        }
    }
}

impl PowerSensor for MockPowerSensor {
    fn read(&mut self) -> Result<PowerReading, SensorError> {
        self.conversions += 1;
        self.elapsed_s += self.interval_s;
        let t = self.elapsed_s;

        if self.fail_every > 0 && self.conversions % self.fail_every == 0 {
            // Odd failures: the alert fired before the conversion landed
            if (self.conversions / self.fail_every) % 2 == 1 {
                return Err(SensorError::NotReady);
            }
            return Err(SensorError::ReadFailed {
                sensor: "INA228",
                details: "simulated bus timeout",
            });
        }

        let depth = (t / DISCHARGE_S).min(1.0);
        let bus_voltage_v = CELL_FULL_V - (CELL_FULL_V - CELL_EMPTY_V) * depth;

        let mut current_ma = 120.0 + 15.0 * (t / 20.0).sin() + 4.0 * (t / 3.0).cos();
        if self.spike_every > 0 && self.conversions % self.spike_every == 0 {
            current_ma *= SPIKE_FACTOR;
        }

        self.energy_ws += bus_voltage_v * current_ma / 1000.0 * self.interval_s;

        Ok(PowerReading {
            bus_voltage_v,
            shunt_voltage_v: current_ma / 1000.0 * SHUNT_OHMS,
            die_temperature_c: 24.0 + 6.0 * depth,
            current_ma,
            energy_ws: self.energy_ws,
        })
    }
}

// ---------------------------------------------------------------------------
// Panel link
// ---------------------------------------------------------------------------

/// Rows per SH1107 page; transfers are whole page columns
const PAGE_HEIGHT_PX: i32 = 8;

/// Stand-in for the SH1107 bus that counts what a flush would send.
#[derive(Debug, Default)]
struct PanelLink {
    flushes: u32,
    bytes_sent: usize,
    largest_flush: usize,
}

impl PanelLink {
    fn record(&mut self, bytes: usize) {
        self.flushes += 1;
        self.bytes_sent += bytes;
        self.largest_flush = self.largest_flush.max(bytes);
    }

    fn average_flush(&self) -> usize {
        if self.flushes == 0 {
            0
        } else {
            self.bytes_sent / self.flushes as usize
        }
    }
}

impl OriginDimensions for PanelLink {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
    }
}

impl DrawTarget for PanelLink {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let count = pixels.into_iter().count();
        self.record(count.div_ceil(PAGE_HEIGHT_PX as usize));
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, _colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // A partial update still writes every page the area touches
        let bytes = match area.bottom_right() {
            Some(bottom_right) => {
                let pages = bottom_right.y / PAGE_HEIGHT_PX - area.top_left.y / PAGE_HEIGHT_PX + 1;
                pages as usize * area.size.width as usize
            }
            None => 0,
        };
        self.record(bytes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Print the frame with two pixel rows per text line.
fn print_frame(frame: &FrameBuffer) {
    let width = DISPLAY_WIDTH_PX as i32;
    let height = DISPLAY_HEIGHT_PX as i32;

    println!("+{}+", "-".repeat(width as usize));
    for y in (0..height).step_by(2) {
        let row: String = (0..width)
            .map(|x| {
                match (frame.pixel(x, y).is_on(), frame.pixel(x, y + 1).is_on()) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                }
            })
            .collect();
        println!("|{}|", row);
    }
    println!("+{}+", "-".repeat(width as usize));
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting powermon simulator");
    info!(
        "Display: {}×{}, {} samples, spike every {}",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, args.samples, args.spike_every
    );

    // Decoded strings borrow from these bytes
    let config_bytes = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            fs::read(path)?
        }
        None => Vec::new(),
    };
    let mut config = if args.config.is_some() {
        MonitorConfig::from_bytes(&config_bytes).map_err(|e| format!("invalid config: {e}"))?
    } else {
        MonitorConfig::default()
    };
    if let Some(mode) = args.mode {
        config.display.start_mode = mode.into();
    }
    config.validate().map_err(|e| format!("invalid config: {e}"))?;

    if let Some(path) = &args.save_config {
        let bytes = config.to_vec().map_err(|e| format!("{e}"))?;
        fs::write(path, bytes)?;
        info!("Wrote config to {}", path.display());
    }

    let sample_interval_ms = config.sampling.sample_interval_ms;
    let render_interval_ms = config.sampling.render_interval_ms;

    let trigger = SampleTrigger::new();
    let mut sensor = MockPowerSensor::new(
        sample_interval_ms as f32 / 1000.0,
        args.spike_every,
        args.fail_every,
    );
    let mut app = AppState::new(&config);
    let mut manager = DisplayManager::new(FrameBuffer::new());
    let mut link = PanelLink::default();

    let network = match args.ip {
        Some(ip) => NetworkStatus::Connected(ip),
        None => NetworkStatus::Disconnected,
    };
    if config.internet.is_configured()
        && let Err(e) = manager.show_connecting(config.internet.ssid)
    {
        warn!("Connecting screen failed: {:?}", e);
    }
    manager.set_network(network);
    manager.display_mut().flush(&mut link)?;

    // -----------------------------------------------------------------------
    // Main loop, stepped in simulated milliseconds
    // -----------------------------------------------------------------------
    let mut now_ms: u64 = 0;
    let mut next_render_ms: u64 = 0;
    let mut failures = 0u32;

    for _ in 0..args.samples {
        now_ms += u64::from(sample_interval_ms);

        // Alert pin fires once per finished conversion
        trigger.notify();

        match app.service(&trigger, &mut sensor, now_ms as f32 / 1000.0) {
            ServiceOutcome::SensorFailed(_) => failures += 1,
            ServiceOutcome::Recorded(_) | ServiceOutcome::Idle => {}
        }

        if now_ms >= next_render_ms {
            if manager.tick(&mut app) {
                manager.display_mut().flush(&mut link)?;
            }
            next_render_ms = now_ms + u64::from(render_interval_ms);
        }
    }

    // Final frame reflects the last sample even off the render cadence
    if manager.tick(&mut app) {
        manager.display_mut().flush(&mut link)?;
    }
    debug!("Panel link: {:?}", link);

    let stats = app.current_stats();
    info!(
        "Recorded {} samples ({} failed reads), {} frames",
        app.samples_recorded(),
        failures,
        manager.frames()
    );
    info!(
        "Current: min {:.2} mA, max {:.2} mA, mean {:.2} mA, σ {:.2} mA",
        stats.min, stats.max, stats.mean, stats.std_deviation
    );
    info!(
        "Panel link: {} flushes, {} bytes (avg {}, max {} of {})",
        link.flushes,
        link.bytes_sent,
        link.average_flush(),
        link.largest_flush,
        FRAME_BYTES
    );
    if let Some(range) = app.current_scale().display_range() {
        info!("Current graph range: {:.4} A .. {:.4} A", range.min, range.max);
    }

    print_frame(manager.display());

    if let Some(path) = &args.html {
        let page = StatusPage::new(&app, args.ip);
        fs::write(path, page.render())?;
        info!("Wrote status page to {}", path.display());
    }

    if let Some(path) = &args.raw {
        fs::write(path, manager.display().as_bytes())?;
        info!("Wrote raw frame to {}", path.display());
    }

    Ok(())
}
