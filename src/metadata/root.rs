//! The metadata root (ECMA-335 II.24.2.1).
//!
//! The root opens the metadata block: a `BSJB` signature, the runtime version string and the
//! directory of streams. Only the tables stream and the `#Strings` heap are looked up later.
//!
//! ```rust
//! use asmrefs::metadata::root::Root;
//!
//! #[rustfmt::skip]
//! let root = Root::read(&[
//!     b'B', b'S', b'J', b'B',
//!     0x01, 0x00, 0x01, 0x00,
//!     0x00, 0x00, 0x00, 0x00,
//!     0x04, 0x00, 0x00, 0x00,
//!     b'v', b'4', 0x00, 0x00,
//!     0x00, 0x00, 0x01, 0x00,
//!     0x20, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, b'#', b'~', 0x00, 0x00,
//! ])?;
//! assert_eq!(root.version, "v4");
//! assert!(root.stream("#~").is_some());
//! # Ok::<(), asmrefs::Error>(())
//! ```

use crate::{
    file::parser::Parser, metadata::streams::StreamHeader, Error::OutOfBounds, Result,
};

/// `BSJB`, read as a little-endian `u32`.
pub const METADATA_SIGNATURE: u32 = 0x424A_5342;

/// Signature, version and reserved words, plus the version length.
const FIXED_SIZE: usize = 16;

/// Header of the metadata block and its stream directory.
///
/// Stream names are not checked. Unknown streams stay in [`Root::streams`] and are never looked
/// up; when a name repeats, [`Root::stream`] returns the first.
pub struct Root {
    /// Metadata format version as major and minor
    pub format_version: (u16, u16),
    /// Runtime version the image was built against, padding removed
    pub version: String,
    /// Reserved
    pub flags: u16,
    /// Stream directory in file order
    pub streams: Vec<StreamHeader>,
}

impl Root {
    /// Decodes the root at the start of the metadata block `data`.
    ///
    /// # Errors
    /// [`crate::Error::Malformed`] for a wrong signature or a stream whose range overflows, and
    /// [`crate::Error::OutOfBounds`] when the header or a stream extends past `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < FIXED_SIZE + 4 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let signature = parser.read_le::<u32>()?;
        if signature != METADATA_SIGNATURE {
            return Err(malformed_error!("bad metadata signature {:#010x}", signature));
        }

        let format_version = (parser.read_le::<u16>()?, parser.read_le::<u16>()?);
        let _reserved = parser.read_le::<u32>()?;

        let length = parser.read_le::<u32>()? as usize;
        let padded = parser.read_bytes(length)?;
        let version = match padded.iter().position(|byte| *byte == 0) {
            Some(end) => String::from_utf8_lossy(&padded[..end]),
            None => String::from_utf8_lossy(padded),
        }
        .into_owned();

        let flags = parser.read_le::<u16>()?;
        let count = parser.read_le::<u16>()?;

        let mut streams = Vec::with_capacity(usize::from(count).min(8));
        for _ in 0..count {
            let stream = StreamHeader::from(&data[parser.pos()..])?;

            let Some(end) = stream.offset.checked_add(stream.size) else {
                return Err(malformed_error!(
                    "stream {} overflows: {:#x} + {:#x}",
                    stream.name,
                    stream.offset,
                    stream.size
                ));
            };
            if end as usize > data.len() {
                return Err(OutOfBounds);
            }

            // The last header may end flush with the block, without padding
            parser.advance_by(stream.header_size().min(parser.remaining()))?;
            streams.push(stream);
        }

        Ok(Root {
            format_version,
            version,
            flags,
            streams,
        })
    }

    /// Returns the first stream header named `name`.
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.streams.iter().find(|stream| stream.name == name)
    }
}
