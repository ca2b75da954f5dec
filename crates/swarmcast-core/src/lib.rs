//! swarmcast-core — byte stream and checksum capabilities.
//! Every other swarmcast crate depends on this one.

pub mod checksum;
pub mod file;
pub mod memory;
pub mod stream;

pub use checksum::{ChecksumAlgorithm, ChecksumError, Digest};
pub use file::FileStream;
pub use memory::MemoryStream;
pub use stream::{ByteStream, Endianness, StreamError};
