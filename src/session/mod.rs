//! # Session Module
//!
//! The live control loop and the timed record/replay engine.
//!
//! This module handles:
//! - Merging the controller sample feed with the termination feed
//! - Rate-limited address changes and duplicate-frame suppression
//! - Timestamping frames against a resettable session clock
//! - The `pelco-d <hex> <millis>` record stream, writer and reader side
//! - Delay-accurate replay with per-frame drift reporting

pub mod clock;
pub mod limiter;
pub mod live;
pub mod record;
pub mod replay;
