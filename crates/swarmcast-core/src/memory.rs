//! In-memory byte stream — a growable buffer behind the [`ByteStream`]
//! capability. The workhorse backend for tests and for building descriptor
//! payloads before they hit disk or a peer.

use bytes::Bytes;

use crate::stream::{ByteStream, Endianness, StreamError};

/// Growable, seekable buffer stream.
///
/// Writes past the end extend the buffer; writes inside it overwrite in
/// place. Seeking is bounded by the current length.
pub struct MemoryStream {
    data: Vec<u8>,
    cursor: usize,
    endianness: Endianness,
}

impl MemoryStream {
    /// Empty stream, cursor at zero.
    pub fn new(endianness: Endianness) -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
            endianness,
        }
    }

    /// Stream over an existing buffer, cursor at zero.
    pub fn from_bytes(data: impl Into<Vec<u8>>, endianness: Endianness) -> Self {
        Self {
            data: data.into(),
            cursor: 0,
            endianness,
        }
    }

    /// Borrow the full buffer regardless of cursor position.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream, returning the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl ByteStream for MemoryStream {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn tell(&self) -> u64 {
        self.cursor as u64
    }

    fn seek(&mut self, position: u64) -> Result<u64, StreamError> {
        if position > self.data.len() as u64 {
            return Err(StreamError::OutOfRange {
                position,
                size: self.data.len() as u64,
            });
        }
        self.cursor = position as usize;
        Ok(position)
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let bytes = self.peek(length)?;
        self.cursor += bytes.len();
        Ok(bytes)
    }

    fn peek(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let end = (self.cursor + length).min(self.data.len());
        Ok(Bytes::copy_from_slice(&self.data[self.cursor..end]))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        let end = self.cursor + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(bytes.len())
    }
}
