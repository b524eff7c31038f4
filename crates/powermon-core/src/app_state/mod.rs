//! Application context for the power monitor
//!
//! One [`AppState`] owns the measurement history and the two per-series
//! scale estimators. The main loop passes it by reference to the sampling
//! and rendering code; nothing here is a global.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DisplayConfig, MonitorConfig};
use crate::history::{CurrentStats, MeasurementHistory};
use crate::scale::GraphScaleState;
use crate::sensors::{PowerReading, PowerSensor, SensorError};
use crate::trigger::SampleTrigger;

/// Seconds per hour, for Ws → Wh
const SECONDS_PER_HOUR: f32 = 3600.0;

/// Screen selected by the mode button
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Numeric readout
    #[default]
    Summary,
    /// Current and energy graphs
    Graph,
}

impl DisplayMode {
    /// The other screen
    pub const fn toggled(self) -> Self {
        match self {
            Self::Summary => Self::Graph,
            Self::Graph => Self::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRunState {
    /// No reading accepted yet
    Starting,
    /// Last sensor read succeeded
    Running,
    /// Last sensor read failed
    SensorFault,
}

/// Result of one [`AppState::service`] pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceOutcome {
    /// No conversion was pending
    Idle,
    /// A reading was added to the history
    Recorded(PowerReading),
    /// A conversion was pending but the read failed
    SensorFailed(SensorError),
}

/// Main application state container
pub struct AppState {
    pub run_state: AppRunState,
    history: MeasurementHistory,
    current_scale: GraphScaleState,
    energy_scale: GraphScaleState,
    mode: DisplayMode,
    display: DisplayConfig,
    last_reading: Option<PowerReading>,
    previous_energy_ws: Option<f32>,
    first_timestamp_s: Option<f32>,
    last_timestamp_s: f32,
    samples_recorded: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl AppState {
    /// Create an empty context using the display settings from `config`
    pub fn new(config: &MonitorConfig<'_>) -> Self {
        info!(
            "Monitor context created, starting in {:?} mode",
            config.display.start_mode
        );

        Self {
            run_state: AppRunState::Starting,
            history: MeasurementHistory::new(),
            current_scale: GraphScaleState::new(),
            energy_scale: GraphScaleState::new(),
            mode: config.display.start_mode,
            display: config.display,
            last_reading: None,
            previous_energy_ws: None,
            first_timestamp_s: None,
            last_timestamp_s: 0.0,
            samples_recorded: 0,
        }
    }

    /// Drain the sample-ready counter and, if anything was pending, read the
    /// sensor once and record the result.
    ///
    /// Several pending ticks collapse into one read; the sensor only holds
    /// its latest conversion anyway.
    pub fn service<S: PowerSensor>(
        &mut self,
        trigger: &SampleTrigger,
        sensor: &mut S,
        timestamp_s: f32,
    ) -> ServiceOutcome {
        let pending = trigger.take();
        if pending == 0 {
            return ServiceOutcome::Idle;
        }
        if pending > 1 {
            warn!("{} sample-ready ticks coalesced into one read", pending);
        }

        match sensor.read() {
            Ok(reading) => {
                self.record(reading, timestamp_s);
                ServiceOutcome::Recorded(reading)
            }
            Err(e) => {
                warn!("Sensor read failed: {}", e);
                self.run_state = AppRunState::SensorFault;
                ServiceOutcome::SensorFailed(e)
            }
        }
    }

    /// Add an accepted reading to the history
    pub fn record(&mut self, reading: PowerReading, timestamp_s: f32) {
        self.history
            .add_measurement(reading.current_ma, reading.energy_ws, timestamp_s);

        self.previous_energy_ws = self.last_reading.map(|r| r.energy_ws);
        self.last_reading = Some(reading);
        self.first_timestamp_s.get_or_insert(timestamp_s);
        self.last_timestamp_s = timestamp_s;
        self.samples_recorded = self.samples_recorded.saturating_add(1);
        self.run_state = AppRunState::Running;

        debug!(
            "Sample #{}: {} mA, {} Ws at {} s",
            self.samples_recorded, reading.current_ma, reading.energy_ws, timestamp_s
        );
    }

    /// Energy used between the two most recent samples, in Wh.
    ///
    /// Never negative: a counter reset or a NaN reads as 0, as does having
    /// fewer than two samples.
    pub fn energy_delta_wh(&self) -> f32 {
        let (Some(previous), Some(last)) = (self.previous_energy_ws, self.last_reading) else {
            return 0.0;
        };

        let delta = (last.energy_ws - previous) / SECONDS_PER_HOUR;
        if delta.is_nan() { 0.0 } else { delta.max(0.0) }
    }

    /// Cumulative energy of the last reading, in Wh
    pub fn total_energy_wh(&self) -> f32 {
        self.last_reading
            .map_or(0.0, |r| r.energy_ws / SECONDS_PER_HOUR)
    }

    /// Seconds between the first and the latest recorded sample
    pub fn elapsed_s(&self) -> f32 {
        self.first_timestamp_s
            .map_or(0.0, |first| (self.last_timestamp_s - first).max(0.0))
    }

    /// Switch between the summary and graph screens
    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if mode != self.mode {
            info!("Display mode changed to {:?}", mode);
            self.mode = mode;
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    pub fn current_stats(&self) -> CurrentStats {
        self.history.current_stats()
    }

    pub fn last_reading(&self) -> Option<&PowerReading> {
        self.last_reading.as_ref()
    }

    pub fn samples_recorded(&self) -> u32 {
        self.samples_recorded
    }

    pub fn current_scale(&self) -> &GraphScaleState {
        &self.current_scale
    }

    pub fn energy_scale(&self) -> &GraphScaleState {
        &self.energy_scale
    }

    /// History plus both estimators, borrowed together for a graph render
    pub fn graph_parts(
        &mut self,
    ) -> (&MeasurementHistory, &mut GraphScaleState, &mut GraphScaleState) {
        (
            &self.history,
            &mut self.current_scale,
            &mut self.energy_scale,
        )
    }
}
