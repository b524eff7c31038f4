//! HTML status page
//!
//! Builds the document the web interface serves at `/`. The page refreshes
//! itself every second; serving it is left to the network stack.

use alloc::string::String;
use core::fmt::Write;
use core::net::Ipv4Addr;

use crate::app_state::AppState;
use crate::format::format_value;
use crate::ui::graph::constants::MILLIAMPS_PER_AMP;

const HEAD: &str = "<!DOCTYPE html><html><head><meta charset='utf-8'>\
<meta http-equiv='refresh' content='1'><title>Power Meter</title>\
<style>body{font-family:sans-serif;margin:1.5em;}h1{font-size:1.5em;}\
table{border-collapse:collapse;margin-bottom:1em;}\
td,th{padding:0.25em 0.5em;border:1px solid #ccc;}\
th{text-align:left;background:#f7f7f7;}td:last-child{text-align:right;}</style>\
</head><body>";

const TAIL: &str = "</body></html>";

/// Snapshot of the values the page shows
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPage {
    body: String,
    ip: Option<Ipv4Addr>,
}

impl StatusPage {
    /// Capture the latest measurement from `app`
    pub fn new(app: &AppState, ip: Option<Ipv4Addr>) -> Self {
        let mut body = String::with_capacity(512);
        let _ = body.write_str("<h1>Power Meter</h1>");

        match app.last_reading() {
            None => {
                let _ = body.write_str("<p>No measurements yet.</p>");
            }
            Some(reading) => {
                let digits = app.display_config();

                let _ = body.write_str("<table><tr><th colspan='2'>Last measurement</th></tr>");
                push_row(
                    &mut body,
                    "Current",
                    format_args!(
                        "{}",
                        format_value(
                            reading.current_ma / MILLIAMPS_PER_AMP,
                            "A",
                            digits.current_digits
                        )
                    ),
                );
                push_row(
                    &mut body,
                    "Energy",
                    format_args!(
                        "{}",
                        format_value(app.energy_delta_wh(), "Wh", digits.energy_digits)
                    ),
                );
                push_row(
                    &mut body,
                    "Vbus",
                    format_args!(
                        "{}",
                        format_value(reading.bus_voltage_v, "V", digits.voltage_digits)
                    ),
                );
                push_row(
                    &mut body,
                    "Temp",
                    format_args!("{:.1} C", reading.die_temperature_c),
                );
                let _ = body.write_str("</table>");

                let _ = body.write_str("<table><tr><th colspan='2'>Total energy</th></tr>");
                push_row(
                    &mut body,
                    "Energy",
                    format_args!(
                        "{}",
                        format_value(app.total_energy_wh(), "Wh", digits.energy_digits)
                    ),
                );
                let _ = body.write_str("</table>");
            }
        }

        Self { body, ip }
    }

    /// Full HTML document
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(HEAD.len() + self.body.len() + TAIL.len() + 32);
        html.push_str(HEAD);
        html.push_str(&self.body);
        if let Some(ip) = self.ip {
            let _ = write!(html, "<p>IP: {}</p>", ip);
        }
        html.push_str(TAIL);
        html
    }
}

fn push_row(body: &mut String, label: &str, value: core::fmt::Arguments<'_>) {
    let _ = write!(body, "<tr><td>{}</td><td>{}</td></tr>", label, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::PowerReading;

    fn reading(current_ma: f32, energy_ws: f32) -> PowerReading {
        PowerReading {
            bus_voltage_v: 12.5,
            shunt_voltage_v: 0.001,
            die_temperature_c: 31.04,
            current_ma,
            energy_ws,
        }
    }

    #[test]
    fn test_page_without_measurements() {
        let app = AppState::default();
        let html = StatusPage::new(&app, None).render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("content='1'"));
        assert!(html.contains("<p>No measurements yet.</p>"));
        assert!(!html.contains("IP:"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_page_rows() {
        let mut app = AppState::default();
        app.record(reading(2.5, 3600.0), 0.0);
        app.record(reading(2.5, 10800.0), 1.0);

        let html = StatusPage::new(&app, Some(Ipv4Addr::new(10, 0, 0, 7))).render();

        assert!(html.contains("<tr><td>Current</td><td>2.5000 mA </td></tr>"));
        assert!(html.contains("<tr><td>Energy</td><td>2.0000 Wh </td></tr>"));
        assert!(html.contains("<tr><td>Vbus</td><td>12.50 V  </td></tr>"));
        assert!(html.contains("<tr><td>Temp</td><td>31.0 C</td></tr>"));
        assert!(html.contains("<th colspan='2'>Total energy</th></tr><tr><td>Energy</td><td>3.0000 Wh </td></tr>"));
        assert!(html.contains("<p>IP: 10.0.0.7</p>"));
    }

    #[test]
    fn test_counter_reset_shows_zero_delta() {
        let mut app = AppState::default();
        app.record(reading(1.0, 7200.0), 0.0);
        app.record(reading(1.0, 0.0), 1.0);

        let html = StatusPage::new(&app, None).render();
        assert!(html.contains("<tr><td>Energy</td><td>0.0000 Wh </td></tr>"));
    }
}
