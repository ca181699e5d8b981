//! # Live Control Loop
//!
//! Merges the periodic controller-state feed with the termination feed,
//! applies rate-limited address changes, suppresses duplicate frames,
//! timestamps each frame against the session clock, and fans emitted
//! frames out to the console, the record sink, and the serial sink.
//!
//! ## Event sources
//!
//! The loop blocks only on "next event from either source". The sample
//! feed is the bounded channel filled by the joystick poll task; the stop
//! feed fires on the first complete line (or end of stream) on standard
//! input. Ctrl+C is honored as a third way out.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use crate::error::Result;
use crate::joystick::layout::PtzBindings;
use crate::joystick::mapper;
use crate::joystick::state::ControllerState;
use crate::pelco::PelcoFrame;
use crate::serial::PelcoSerial;

use super::clock::SessionClock;
use super::limiter::AddressRateLimiter;
use super::record::{frame_line, Recorder};

/// Normalized trigger travel beyond which a mark fires.
pub const MARK_THRESHOLD: f32 = 0.5;

/// State of one interactive control session.
#[derive(Debug)]
pub struct LiveSession {
    address: u8,
    max_speed: u8,
    verbose: bool,
    bindings: PtzBindings,
    clock: SessionClock,
    limiter: AddressRateLimiter,
    last_frame: Option<PelcoFrame>,
}

impl LiveSession {
    /// Creates a session starting at the configured address and speed
    /// ceiling.
    #[must_use]
    pub fn new(address: u8, max_speed: u8, verbose: bool, bindings: PtzBindings) -> Self {
        Self {
            address,
            max_speed,
            verbose,
            bindings,
            clock: SessionClock::new(),
            limiter: AddressRateLimiter::default(),
            last_frame: None,
        }
    }

    /// The current Pelco-D address.
    #[must_use]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Processes one controller snapshot.
    ///
    /// Applies address changes, timer resets, and mark comments, then
    /// builds the frame for this snapshot. When the frame differs from the
    /// previously emitted one, the record line is appended and the frame is
    /// returned with its elapsed-millis value for the caller to print and
    /// transmit. An identical frame produces nothing.
    pub fn handle_sample(
        &mut self,
        state: &ControllerState,
        recorder: &mut Recorder,
    ) -> Result<Option<(PelcoFrame, u64)>> {
        // address buttons, one change per limiter permit
        if state.is_pressed(self.bindings.dec_address) {
            if self.limiter.try_change() {
                self.address = self.address.wrapping_sub(1);
            }
        } else if state.is_pressed(self.bindings.inc_address) {
            if self.limiter.try_change() {
                self.address = self.address.wrapping_add(1);
            }
        }

        if state.is_pressed(self.bindings.reset_timer) {
            self.clock.reset();
        }

        // marks go to the record sink only, with no protocol effect
        if self.bindings.mark_left.sample(state) > MARK_THRESHOLD {
            recorder.mark("Mark Left")?;
        }
        if self.bindings.mark_right.sample(state) > MARK_THRESHOLD {
            recorder.mark("Mark Right")?;
        }

        let frame = mapper::apply_state(
            PelcoFrame::new().with_address(self.address),
            state,
            &self.bindings,
            self.max_speed,
        )
        .with_checksum();

        if self.last_frame == Some(frame) {
            return Ok(None);
        }

        let millis = self.clock.mark();
        recorder.frame(&frame, millis)?;
        self.last_frame = Some(frame);

        Ok(Some((frame, millis)))
    }

    /// Runs the control loop until a stop event arrives.
    ///
    /// # Errors
    ///
    /// Record-sink failures and enabled-serial-sink failures are fatal and
    /// end the session.
    pub async fn run(
        mut self,
        mut samples: mpsc::Receiver<ControllerState>,
        mut stop: mpsc::Receiver<()>,
        mut recorder: Recorder,
        mut serial: Option<PelcoSerial>,
    ) -> Result<()> {
        let mut input_done = false;

        loop {
            tokio::select! {
                _ = stop.recv() => {
                    info!("stop requested, shutting down");
                    return Ok(());
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("received Ctrl+C, shutting down");
                    return Ok(());
                }

                sample = samples.recv(), if !input_done => {
                    let Some(state) = sample else {
                        input_done = true;
                        continue;
                    };

                    if let Some((frame, millis)) = self.handle_sample(&state, &mut recorder)? {
                        let line = frame_line(&frame, millis);
                        if self.verbose {
                            println!("{line}");
                        } else {
                            // single overwritten status line
                            eprint!("\x1b[K{line}\r");
                        }

                        if let Some(port) = serial.as_mut() {
                            port.send_frame(&frame).await?;
                        }
                    }
                }
            }
        }
    }
}

/// Spawns the termination feed: the first complete line on standard input,
/// or end of stream, signals the live loop to stop.
pub fn spawn_stop_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        match lines.next_line().await {
            Ok(Some(_)) => {
                let _ = tx.send(()).await;
            }
            // EOF or read error: dropping the sender closes the channel,
            // which the loop also treats as a stop
            Ok(None) | Err(_) => {}
        }
    });

    rx
}
