//! Soil irrigation controller for ESP32.
//!
//! The control core (`controller`, `sensors`, `board::buttons`,
//! `board::pump`) talks to hardware through small traits so it builds and
//! tests on the host. Everything that touches ESP-IDF is behind
//! `#[cfg(target_os = "espidf")]`.

pub mod board;
pub mod configuration;
pub mod controller;
pub mod display;
pub mod error;
pub mod sensors;
pub mod string_error;
