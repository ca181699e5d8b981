//! # Pelco-D Protocol Module
//!
//! Implementation of the Pelco-D serial protocol for PTZ camera control.
//!
//! This module handles:
//! - Frame construction, addressing, and checksum calculation
//! - Hex encoding/decoding of the 7-byte wire frame

pub mod frame;

pub use frame::PelcoFrame;
