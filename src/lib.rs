//! # cctv-ptz Library
//!
//! Drive Pelco-D pan-tilt-zoom camera heads with a game controller.
//!
//! This library provides the core functionality: the Pelco-D frame codec,
//! controller input normalization and mapping, the live control loop, and
//! the timed record/replay engine.

pub mod config;
pub mod error;
pub mod joystick;
pub mod pelco;
pub mod serial;
pub mod session;
