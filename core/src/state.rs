//! Ordered primitive codec for per-episode title state.
//!
//! A title's checkpoint is a flat sequence of `i32` (little-endian, 4 bytes)
//! and `bool` (1 byte, 0 or 1) values. There are no tags or field names:
//! the order in which a title writes its fields is the wire format, and
//! `load` must read them back in the same order.

use thiserror::Error;

pub use ramwatch_macros::EpisodeState;

/// Version of the per-title field layouts. Bump when any title's field
/// order or field set changes.
pub const STATE_FORMAT_VERSION: u16 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state stream truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid bool byte 0x{0:02X} in state stream")]
    InvalidBool(u8),
}

/// Append-only writer for checkpoint streams.
#[derive(Debug, Default, Clone)]
pub struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_int(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Sequential reader over a checkpoint stream produced by [`StateWriter`].
#[derive(Debug, Clone)]
pub struct StateReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StateReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StateError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(StateError::Truncated {
                needed: N,
                remaining,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    pub fn get_int(&mut self) -> Result<i32, StateError> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    pub fn get_bool(&mut self) -> Result<bool, StateError> {
        match self.take::<1>()?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StateError::InvalidBool(other)),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

/// A primitive that can appear in a checkpoint stream.
pub trait StateField: Sized {
    fn put(&self, writer: &mut StateWriter);
    fn get(reader: &mut StateReader<'_>) -> Result<Self, StateError>;
}

impl StateField for i32 {
    fn put(&self, writer: &mut StateWriter) {
        writer.put_int(*self);
    }

    fn get(reader: &mut StateReader<'_>) -> Result<Self, StateError> {
        reader.get_int()
    }
}

impl StateField for bool {
    fn put(&self, writer: &mut StateWriter) {
        writer.put_bool(*self);
    }

    fn get(reader: &mut StateReader<'_>) -> Result<Self, StateError> {
        reader.get_bool()
    }
}

/// Per-episode state that round-trips through the checkpoint codec.
///
/// Usually derived with `#[derive(EpisodeState)]`, which writes fields in
/// declaration order. `load` treats a decoded stream as authoritative and
/// does not range-check values; on error, `self` is left unchanged.
pub trait EpisodeState {
    fn save(&self, writer: &mut StateWriter);
    fn load(&mut self, reader: &mut StateReader<'_>) -> Result<(), StateError>;
}
