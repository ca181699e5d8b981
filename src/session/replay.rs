//! # Record Replay Engine
//!
//! Parses a line-oriented record of `(frame, delay)` pairs and replays
//! them to the serial sink with the recorded inter-message spacing.
//!
//! ## Pacing discipline
//!
//! The first frame is sent immediately with zero wait. Each subsequent
//! frame waits its associated delay, measured from when the previous frame
//! finished sending. Observed drift is reported in verbose mode but never
//! compensated: the protocol is open-loop, and dead-reckoning playback
//! accumulates error by design.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};

use crate::error::{CctvPtzError, Result};
use crate::pelco::PelcoFrame;
use crate::serial::PelcoSerial;

use super::record::PROTOCOL_TAG;

/// One parsed record line: the frame and the wait before sending it,
/// relative to the previous frame. Consumed exactly once by the pacing
/// loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedFrame {
    pub frame: PelcoFrame,
    pub delay: Duration,
}

/// Parses one non-blank record line.
///
/// Returns `Ok(None)` for comment lines. Malformed lines are reported as
/// [`CctvPtzError::MalformedLine`] carrying `line` for diagnostics; the
/// caller logs and skips them.
pub fn parse_line(text: &str, line: usize) -> Result<Option<DelayedFrame>> {
    let text = text.trim();

    if text.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() < 3 {
        return Err(CctvPtzError::MalformedLine {
            line,
            reason: format!("too few fields: {text:?}"),
        });
    }

    if words[0] != PROTOCOL_TAG {
        return Err(CctvPtzError::MalformedLine {
            line,
            reason: format!("invalid protocol {:?}", words[0]),
        });
    }

    let frame = PelcoFrame::decode_hex(words[1]).map_err(|e| CctvPtzError::MalformedLine {
        line,
        reason: format!("invalid frame: {e}"),
    })?;

    let millis: u64 = words[2]
        .parse()
        .map_err(|e| CctvPtzError::MalformedLine {
            line,
            reason: format!("invalid duration: {e}"),
        })?;

    Ok(Some(DelayedFrame {
        frame,
        delay: Duration::from_millis(millis),
    }))
}

/// Replays a record stream to the serial sink.
///
/// Blank lines are skipped; comment lines are skipped without consuming a
/// line number; malformed lines are logged and skipped without disturbing
/// the pacing of subsequent valid lines. An absent sink replays into the
/// void, which still exercises the timing path.
pub async fn replay<R>(reader: R, serial: Option<PelcoSerial>, verbose: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, rx) = mpsc::channel::<DelayedFrame>(1);
    let sender = tokio::spawn(send_delayed_frames(rx, serial, verbose));

    let mut lines = reader.lines();
    let mut line_count = 0usize;

    while let Some(text) = lines.next_line().await? {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed, line_count + 1) {
            Ok(Some(delayed)) => {
                line_count += 1;
                if verbose {
                    info!("{trimmed}");
                }
                if tx.send(delayed).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                line_count += 1;
                warn!("{e}");
            }
        }
    }

    drop(tx);
    let _ = sender.await;

    Ok(())
}

/// The pacing loop: a single sequential consumer preserving order exactly.
async fn send_delayed_frames(
    mut rx: mpsc::Receiver<DelayedFrame>,
    mut serial: Option<PelcoSerial>,
    verbose: bool,
) {
    // first frame goes out with zero wait
    let Some(first) = rx.recv().await else {
        return;
    };
    send_to_port(&mut serial, &first.frame).await;
    let mut last_sent = Instant::now();

    // every other frame is delayed with respect to its predecessor
    while let Some(delayed) = rx.recv().await {
        sleep(delayed.delay).await;
        send_to_port(&mut serial, &delayed.frame).await;

        if verbose {
            let actual = last_sent.elapsed().as_millis() as i64;
            let target = delayed.delay.as_millis() as i64;
            info!(
                "sent {} after {actual} millis, target {target} millis, offset {} millis",
                delayed.frame.encode_hex(),
                actual - target
            );
        }

        last_sent = Instant::now();
    }
}

async fn send_to_port(serial: &mut Option<PelcoSerial>, frame: &PelcoFrame) {
    if let Some(port) = serial.as_mut() {
        if let Err(e) = port.send_frame(frame).await {
            warn!("{e}");
        }
    }
}
