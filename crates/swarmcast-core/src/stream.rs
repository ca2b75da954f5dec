//! Byte stream capability — cursor-based binary I/O over any backing medium.
//!
//! Every serialized structure in swarmcast goes through this trait: a file on
//! disk, a growable buffer in memory, eventually a peer connection. Backends
//! implement the three primitives (`read`, `peek`, `write`) plus cursor
//! control; every typed accessor is a provided method layered on top, so all
//! backends agree byte-for-byte on the numeric and string encodings.
//!
//! Endianness is fixed at construction and applied to every multi-byte value
//! for the stream's lifetime. Descriptor files are little-endian by
//! convention, but the trait does not care.

use bytes::Bytes;
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised by stream primitives and typed accessors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Seek target outside the backing medium.
    #[error("position {position} out of range for stream of {size} bytes")]
    OutOfRange { position: u64, size: u64 },

    /// A fixed-width accessor could not fill its width. Short reads from the
    /// raw `read` primitive are not errors; running out of bytes mid-value is.
    #[error("needed {needed} bytes, got {got}")]
    UnexpectedEnd { needed: usize, got: usize },

    /// A 64-bit value too large to survive the trip through peers whose
    /// numeric model is an IEEE-754 double (exact integers cap at 2^53).
    /// Rejected outright — never silently truncated.
    #[error("64-bit value overflows 2^53 (high word 0x{high:08x})")]
    Overflow { high: u32 },

    /// A string character outside U+0000..=U+00FF, which the one-byte-per-
    /// character wire form cannot carry.
    #[error("character {character:?} does not fit in one byte")]
    WideChar { character: char },

    #[error("stream I/O failed")]
    Io(#[from] std::io::Error),
}

// ── Endianness ────────────────────────────────────────────────────────────────

/// Byte order for every multi-byte value on a stream. Chosen once at
/// construction; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// Highest value the upper 32-bit word of a serialized u64 may hold before
/// the combined value exceeds 2^53.
pub const MAX_SAFE_HIGH_WORD: u32 = 0x1F_FFFF;

// ── ByteStream ────────────────────────────────────────────────────────────────

/// Generates the read/peek/write accessor trio for one fixed-width numeric
/// type, honoring the stream's endianness.
macro_rules! numeric_accessors {
    ($ty:ty, $width:expr, $read:ident, $peek:ident, $write:ident) => {
        fn $read(&mut self) -> Result<$ty, StreamError> {
            let bytes = self.read_exact($width)?;
            let mut raw = [0u8; $width];
            raw.copy_from_slice(&bytes);
            Ok(match self.endianness() {
                Endianness::Little => <$ty>::from_le_bytes(raw),
                Endianness::Big => <$ty>::from_be_bytes(raw),
            })
        }

        fn $peek(&mut self) -> Result<$ty, StreamError> {
            let bytes = self.peek($width)?;
            if bytes.len() < $width {
                return Err(StreamError::UnexpectedEnd {
                    needed: $width,
                    got: bytes.len(),
                });
            }
            let mut raw = [0u8; $width];
            raw.copy_from_slice(&bytes);
            Ok(match self.endianness() {
                Endianness::Little => <$ty>::from_le_bytes(raw),
                Endianness::Big => <$ty>::from_be_bytes(raw),
            })
        }

        fn $write(&mut self, value: $ty) -> Result<(), StreamError> {
            let raw = match self.endianness() {
                Endianness::Little => value.to_le_bytes(),
                Endianness::Big => value.to_be_bytes(),
            };
            self.write(&raw)?;
            Ok(())
        }
    };
}

/// Cursor-based binary I/O capability.
///
/// Backends supply `size`/`tell`/`seek` and the `read`/`peek`/`write`
/// primitives; everything else is provided. All provided accessors advance
/// the cursor except the `peek_*` family.
pub trait ByteStream {
    /// Total addressable length of the backing medium, in bytes.
    fn size(&self) -> u64;

    /// Current cursor offset.
    fn tell(&self) -> u64;

    /// Move the cursor. Fails with `OutOfRange` when `position` exceeds
    /// `size()`. Returns the new position.
    fn seek(&mut self, position: u64) -> Result<u64, StreamError>;

    /// Byte order applied to every multi-byte accessor.
    fn endianness(&self) -> Endianness;

    /// Read up to `length` bytes at the cursor and advance it. A short
    /// result at end-of-medium is not an error.
    fn read(&mut self, length: usize) -> Result<Bytes, StreamError>;

    /// Same as `read` but the cursor does not move.
    fn peek(&mut self, length: usize) -> Result<Bytes, StreamError>;

    /// Write all of `bytes` at the cursor and advance it. Returns the number
    /// of bytes written, which is always `bytes.len()` on success.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError>;

    /// Advance the cursor by `length` without reading. Returns the new
    /// position.
    fn skip(&mut self, length: u64) -> Result<u64, StreamError> {
        let target = self.tell() + length;
        self.seek(target)
    }

    /// Read exactly `length` bytes or fail with `UnexpectedEnd`.
    fn read_exact(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let bytes = self.read(length)?;
        if bytes.len() < length {
            return Err(StreamError::UnexpectedEnd {
                needed: length,
                got: bytes.len(),
            });
        }
        Ok(bytes)
    }

    numeric_accessors!(i8, 1, read_i8, peek_i8, write_i8);
    numeric_accessors!(u8, 1, read_u8, peek_u8, write_u8);
    numeric_accessors!(i16, 2, read_i16, peek_i16, write_i16);
    numeric_accessors!(u16, 2, read_u16, peek_u16, write_u16);
    numeric_accessors!(i32, 4, read_i32, peek_i32, write_i32);
    numeric_accessors!(u32, 4, read_u32, peek_u32, write_u32);
    numeric_accessors!(f32, 4, read_f32, peek_f32, write_f32);
    numeric_accessors!(f64, 8, read_f64, peek_f64, write_f64);

    /// Read a 64-bit unsigned integer assembled from two 32-bit words.
    ///
    /// Values whose high word exceeds [`MAX_SAFE_HIGH_WORD`] are rejected
    /// with `Overflow`: not every peer implementation can represent integers
    /// beyond 2^53 exactly, and a truncated size or offset is worse than a
    /// hard error.
    fn read_u64(&mut self) -> Result<u64, StreamError> {
        let bytes = self.read_exact(8)?;
        let (high, low) = match self.endianness() {
            Endianness::Little => {
                let mut word = [0u8; 4];
                word.copy_from_slice(&bytes[4..8]);
                let high = u32::from_le_bytes(word);
                word.copy_from_slice(&bytes[0..4]);
                (high, u32::from_le_bytes(word))
            }
            Endianness::Big => {
                let mut word = [0u8; 4];
                word.copy_from_slice(&bytes[0..4]);
                let high = u32::from_be_bytes(word);
                word.copy_from_slice(&bytes[4..8]);
                (high, u32::from_be_bytes(word))
            }
        };

        if high > MAX_SAFE_HIGH_WORD {
            return Err(StreamError::Overflow { high });
        }
        Ok(((high as u64) << 32) | low as u64)
    }

    /// Read a NUL-terminated string, one byte at a time, stopping at a zero
    /// byte or end-of-medium. The terminator is consumed but not returned.
    ///
    /// Each byte is one character (the latin-1 mapping), so any byte
    /// sequence a peer wrote survives a read/re-write round trip unchanged.
    /// Strings are the only variable-length field in the format without a
    /// length prefix.
    fn read_string(&mut self) -> Result<String, StreamError> {
        let mut value = String::new();
        loop {
            let bytes = self.read(1)?;
            if bytes.is_empty() || bytes[0] == 0 {
                break;
            }
            value.push(char::from(bytes[0]));
        }
        Ok(value)
    }

    /// Read a NUL-terminated string without moving the cursor.
    fn peek_string(&mut self) -> Result<String, StreamError> {
        let position = self.tell();
        let value = self.read_string()?;
        self.seek(position)?;
        Ok(value)
    }

    /// Write one byte per character followed by a single 0x00 terminator.
    ///
    /// The inverse of `read_string`: characters up to U+00FF are their own
    /// byte value. Anything wider fails with `WideChar` before a single byte
    /// is written — a multi-byte encoding would not read back as the same
    /// string on the other end.
    fn write_string(&mut self, value: &str) -> Result<(), StreamError> {
        let mut buf = Vec::with_capacity(value.len() + 1);
        for character in value.chars() {
            let code = u32::from(character);
            if code > 0xFF {
                return Err(StreamError::WideChar { character });
            }
            buf.push(code as u8);
        }
        buf.push(0u8);
        self.write(&buf)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
