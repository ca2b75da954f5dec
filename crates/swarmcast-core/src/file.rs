//! File-backed byte stream — descriptor files on disk behind the
//! [`ByteStream`] capability.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use bytes::Bytes;

use crate::stream::{ByteStream, Endianness, StreamError};

/// Seekable stream over a file.
///
/// The cursor is tracked here, not in the OS file position, so `peek` can
/// rewind without disturbing interleaved reads.
pub struct FileStream {
    file: File,
    size: u64,
    cursor: u64,
    endianness: Endianness,
}

impl FileStream {
    /// Open an existing file read-only.
    pub fn open(path: impl AsRef<Path>, endianness: Endianness) -> Result<Self, StreamError> {
        let file = File::open(&path)?;
        let size = file.metadata()?.len();
        tracing::debug!(path = %path.as_ref().display(), size, "file stream opened");
        Ok(Self {
            file,
            size,
            cursor: 0,
            endianness,
        })
    }

    /// Create (or truncate) a file for reading and writing.
    pub fn create(path: impl AsRef<Path>, endianness: Endianness) -> Result<Self, StreamError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        tracing::debug!(path = %path.as_ref().display(), "file stream created");
        Ok(Self {
            file,
            size: 0,
            cursor: 0,
            endianness,
        })
    }

    /// Position the OS file cursor at our logical cursor.
    fn sync_position(&mut self) -> Result<(), StreamError> {
        self.file.seek(SeekFrom::Start(self.cursor))?;
        Ok(())
    }
}

impl ByteStream for FileStream {
    fn size(&self) -> u64 {
        self.size
    }

    fn tell(&self) -> u64 {
        self.cursor
    }

    fn seek(&mut self, position: u64) -> Result<u64, StreamError> {
        if position > self.size {
            return Err(StreamError::OutOfRange {
                position,
                size: self.size,
            });
        }
        self.cursor = position;
        Ok(position)
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let bytes = self.peek(length)?;
        self.cursor += bytes.len() as u64;
        Ok(bytes)
    }

    fn peek(&mut self, length: usize) -> Result<Bytes, StreamError> {
        self.sync_position()?;
        let available = (self.size - self.cursor).min(length as u64) as usize;
        let mut buf = vec![0u8; available];
        self.file.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        self.sync_position()?;
        self.file.write_all(bytes)?;
        self.cursor += bytes.len() as u64;
        self.size = self.size.max(self.cursor);
        Ok(bytes.len())
    }
}
