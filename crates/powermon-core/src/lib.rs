//! Hardware-independent core library for the powermon battery monitor
//!
//! This crate contains the platform-agnostic logic of the device: the
//! measurement history with its statistics, the adaptive graph scale, value
//! formatting, the summary and graph screens, the HTML status page and the
//! sensor trait the firmware implements.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both the
//! embedded target and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod config;
pub mod display_manager;
pub mod format;
pub mod framebuffer;
pub mod history;
pub mod scale;
pub mod sensors;
pub mod status_page;
pub mod trigger;
pub mod ui;
