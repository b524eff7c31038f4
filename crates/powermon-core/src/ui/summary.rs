//! Numeric summary screen
//!
//! Latest sensor values, current statistics over the history window, total
//! energy and elapsed time, with the network status on the bottom row.

use core::fmt::Write;
use core::net::Ipv4Addr;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::app_state::{AppRunState, AppState};
use crate::format::{format_time, format_value};
use crate::ui::graph::constants::MILLIAMPS_PER_AMP;
use crate::ui::{DISPLAY_HEIGHT_PX, LINE_HEIGHT_PX, Line, TEXT_STYLE, draw_text};

/// Station state shown on the bottom row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Connected(Ipv4Addr),
    Disconnected,
}

impl NetworkStatus {
    /// Bottom-row text, e.g. `"IP: 192.168.1.20"`
    pub fn status_line(&self) -> Line {
        let mut line = Line::new();
        match self {
            Self::Connected(ip) => {
                let _ = write!(line, "IP: {}", ip);
            }
            Self::Disconnected => {
                let _ = write!(line, "IP: Not connected");
            }
        }
        line
    }
}

/// Compose the summary rows, top to bottom
pub fn summary_lines(app: &AppState) -> heapless::Vec<Line, 11> {
    let mut lines = heapless::Vec::new();
    let mut push = |args: core::fmt::Arguments<'_>| {
        let mut line = Line::new();
        let _ = line.write_fmt(args);
        let _ = lines.push(line);
    };

    let reading = match (app.run_state, app.last_reading()) {
        (AppRunState::SensorFault, _) => {
            push(format_args!("INA228 error"));
            return lines;
        }
        (_, None) => {
            push(format_args!("Waiting for data"));
            return lines;
        }
        (_, Some(reading)) => *reading,
    };

    let config = app.display_config();
    let stats = app.current_stats();
    let amps = |ma: f32| format_value(ma / MILLIAMPS_PER_AMP, "A", config.current_digits);

    push(format_args!("INA228 values"));
    push(format_args!("Vbus : {:.2} V", reading.bus_voltage_v));
    push(format_args!("Vshunt: {:.4} V", reading.shunt_voltage_v));
    push(format_args!("Temp : {:.1} C", reading.die_temperature_c));
    push(format_args!("Ishunt: {:.2} mA", reading.current_ma));
    push(format_args!("Min {}", amps(stats.min)));
    push(format_args!("Max {}", amps(stats.max)));
    push(format_args!("Avg {}", amps(stats.mean)));
    push(format_args!("Std {}", amps(stats.std_deviation)));
    push(format_args!(
        "E {}",
        format_value(app.total_energy_wh(), "Wh", config.energy_digits)
    ));
    push(format_args!("T {}", format_time(app.elapsed_s())));

    lines
}

/// Draw the summary screen
pub fn render_summary<D>(
    app: &AppState,
    display: &mut D,
    network: NetworkStatus,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display.clear(BinaryColor::Off)?;

    for (row, line) in summary_lines(app).iter().enumerate() {
        draw_text(
            display,
            line,
            Point::new(0, row as i32 * LINE_HEIGHT_PX),
            TEXT_STYLE,
        )?;
    }

    draw_text(
        display,
        &network.status_line(),
        Point::new(0, DISPLAY_HEIGHT_PX as i32 - LINE_HEIGHT_PX),
        TEXT_STYLE,
    )
}
