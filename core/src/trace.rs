//! Recorded console RAM traces.
//!
//! A trace is a sequence of 128-byte RAM snapshots, one per emulator frame,
//! stored back to back with no header. [`RamTrace`] plays one back as both a
//! [`MemoryView`] and a [`Console`], so titles can be stepped and mode
//! selection exercised without a live emulator. Select presses and soft
//! resets only move the playback cursor; the recorded bytes decide what
//! the title sees.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::core::memory::{Console, MemoryView, RAM_SIZE};

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace is empty")]
    Empty,

    #[error("trace length {len} is not a multiple of {} bytes", RAM_SIZE)]
    Misaligned { len: usize },
}

/// One RAM snapshot per frame, with a playback cursor.
#[derive(Debug, Clone)]
pub struct RamTrace {
    frames: Vec<[u8; RAM_SIZE]>,
    cursor: usize,
}

impl RamTrace {
    /// Build a trace from explicit frames.
    pub fn from_frames(frames: Vec<[u8; RAM_SIZE]>) -> Result<Self, TraceError> {
        if frames.is_empty() {
            return Err(TraceError::Empty);
        }
        Ok(Self { frames, cursor: 0 })
    }

    /// Build a `len`-frame trace where `fill(frame, ram)` writes each frame's RAM.
    /// `ram` starts as a copy of the previous frame (zeros for frame 0).
    pub fn from_fn(
        len: usize,
        mut fill: impl FnMut(usize, &mut [u8; RAM_SIZE]),
    ) -> Result<Self, TraceError> {
        let mut frames = Vec::with_capacity(len);
        let mut ram = [0u8; RAM_SIZE];
        for i in 0..len {
            fill(i, &mut ram);
            frames.push(ram);
        }
        Self::from_frames(frames)
    }

    /// Parse raw concatenated frames.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TraceError> {
        if data.len() % RAM_SIZE != 0 {
            return Err(TraceError::Misaligned { len: data.len() });
        }
        let frames = data
            .chunks_exact(RAM_SIZE)
            .map(|chunk| {
                let mut frame = [0u8; RAM_SIZE];
                frame.copy_from_slice(chunk);
                frame
            })
            .collect();
        Self::from_frames(frames)
    }

    /// Load a trace file. Files ending in `.gz` are gunzipped first.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let raw = std::fs::read(path)?;
        let data = if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
        {
            let mut out = Vec::new();
            GzDecoder::new(raw.as_slice()).read_to_end(&mut out)?;
            out
        } else {
            raw
        };
        let trace = Self::from_bytes(&data)?;
        debug!(path = %path.display(), frames = trace.len(), "loaded RAM trace");
        Ok(trace)
    }

    /// Serialize back to raw concatenated frames.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.frames.concat()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a trace holds at least one frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame currently visible through [`MemoryView`].
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// RAM of the current frame.
    pub fn current(&self) -> &[u8; RAM_SIZE] {
        &self.frames[self.cursor]
    }

    /// Frames after the current one.
    pub fn frames_remaining(&self) -> usize {
        self.frames.len() - 1 - self.cursor
    }

    /// Move to the next frame. Returns false (and stays put) at the end.
    pub fn advance_frame(&mut self) -> bool {
        if self.frames_remaining() == 0 {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Skip `frames` frames, holding on the last frame once exhausted.
    pub fn advance(&mut self, frames: usize) {
        self.cursor = (self.cursor + frames).min(self.frames.len() - 1);
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl MemoryView for RamTrace {
    fn peek(&self, addr: u16) -> u8 {
        self.current().peek(addr)
    }
}

impl Console for RamTrace {
    fn press_select(&mut self, frames: u32) {
        self.advance(frames as usize);
    }

    /// A recorded soft reset is one frame; the recording already holds the
    /// post-reset RAM.
    fn soft_reset(&mut self) {
        self.advance(1);
    }
}
