//! Entries of the stream directory (ECMA-335 II.24.2.2).

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Longest stream name ECMA-335 allows, without the terminator.
pub const MAX_STREAM_NAME: usize = 32;

/// Location and name of one metadata stream.
///
/// On disk the name is null-terminated and padded to a multiple of four, so entries differ in
/// size. Names are not interpreted here.
///
/// ```rust
/// use asmrefs::metadata::streams::StreamHeader;
///
/// let header = StreamHeader::from(&[0x6C, 0, 0, 0, 0xA4, 0x45, 0, 0, b'#', b'~', 0, 0])?;
/// assert_eq!((header.offset, header.size), (0x6C, 0x45A4));
/// assert_eq!(header.header_size(), 12);
/// # Ok::<(), asmrefs::Error>(())
/// ```
pub struct StreamHeader {
    /// Start of the stream, relative to the metadata root
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
    /// Stream name such as `#~` or `#Strings`
    pub name: String,
}

impl StreamHeader {
    /// Decodes the directory entry at the start of `data`.
    ///
    /// # Errors
    /// [`crate::Error::OutOfBounds`] when `data` cannot hold an entry, and an error if the name
    /// is unterminated, longer than 32 bytes or not ASCII.
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        // Offset, size and at least a terminator
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);
        let offset = parser.read_le::<u32>()?;
        let size = parser.read_le::<u32>()?;

        let name = parser.read_string_utf8()?;
        if name.len() > MAX_STREAM_NAME || !name.is_ascii() {
            return Err(malformed_error!("bad stream name {:?}", name));
        }

        Ok(StreamHeader { offset, size, name })
    }

    /// Bytes this entry takes in the directory.
    #[must_use]
    pub fn header_size(&self) -> usize {
        8 + (self.name.len() + 1).next_multiple_of(4)
    }
}
