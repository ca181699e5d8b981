//! # Session Record Sink
//!
//! Writer side of the record stream. The format is bit-exact:
//!
//! ```text
//! pelco-d <14-hex-chars> <unsigned-decimal-millis>\n
//! # <comment text>\n
//! ```
//!
//! Lines are written straight through with no buffering so a session file
//! is usable even after an abrupt exit.

use std::io::{self, Write};

use crate::pelco::PelcoFrame;

/// Protocol tag leading every frame line.
pub const PROTOCOL_TAG: &str = "pelco-d";

/// Record path that routes record lines to standard output.
pub const STDOUT_PATH: &str = "-";

/// Formats one frame line, without the trailing newline.
#[must_use]
pub fn frame_line(frame: &PelcoFrame, millis: u64) -> String {
    format!("{PROTOCOL_TAG} {} {millis}", frame.encode_hex())
}

/// Appends frame and comment lines to a record sink.
pub struct Recorder {
    sink: Box<dyn Write + Send>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder").finish_non_exhaustive()
    }
}

impl Recorder {
    /// Wraps an open sink.
    #[must_use]
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    /// Creates the record file at `path`, or wraps standard output when
    /// `path` is `-`.
    pub fn create(path: &str) -> io::Result<Self> {
        if path == STDOUT_PATH {
            return Ok(Self::new(Box::new(io::stdout())));
        }

        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Appends one frame line.
    pub fn frame(&mut self, frame: &PelcoFrame, millis: u64) -> io::Result<()> {
        writeln!(self.sink, "{}", frame_line(frame, millis))
    }

    /// Appends one comment line.
    pub fn mark(&mut self, label: &str) -> io::Result<()> {
        writeln!(self.sink, "# {label}")
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SharedBuf;
    use super::*;

    #[test]
    fn test_frame_line_format() {
        let frame = PelcoFrame::new().with_address(1).with_checksum();
        assert_eq!(frame_line(&frame, 250), "pelco-d ff010000000001 250");
    }

    #[test]
    fn test_frame_line_zero_millis() {
        let frame = PelcoFrame::new().with_checksum();
        assert_eq!(frame_line(&frame, 0), "pelco-d ff000000000000 0");
    }

    #[test]
    fn test_recorder_writes_frame_lines() {
        let buf = SharedBuf::new();
        let mut recorder = Recorder::new(Box::new(buf.clone()));

        let frame = PelcoFrame::new().with_address(3).with_checksum();
        recorder.frame(&frame, 120).unwrap();

        assert_eq!(buf.contents(), "pelco-d ff030000000003 120\n");
    }

    #[test]
    fn test_recorder_writes_comment_lines() {
        let buf = SharedBuf::new();
        let mut recorder = Recorder::new(Box::new(buf.clone()));

        recorder.mark("Mark Left").unwrap();
        recorder.mark("Mark Right").unwrap();

        assert_eq!(buf.lines(), vec!["# Mark Left", "# Mark Right"]);
    }

    #[test]
    fn test_recorder_interleaves_marks_and_frames() {
        let buf = SharedBuf::new();
        let mut recorder = Recorder::new(Box::new(buf.clone()));

        let frame = PelcoFrame::new().with_checksum();
        recorder.mark("Mark Left").unwrap();
        recorder.frame(&frame, 10).unwrap();

        assert_eq!(buf.lines(), vec!["# Mark Left", "pelco-d ff000000000000 10"]);
    }

    #[test]
    fn test_create_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.rec");
        let path_str = path.to_str().unwrap();

        {
            let mut recorder = Recorder::create(path_str).unwrap();
            let frame = PelcoFrame::new().with_address(9).with_checksum();
            recorder.frame(&frame, 42).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "pelco-d ff090000000009 42\n");
    }
}
