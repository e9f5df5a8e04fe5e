//! The `#Strings` heap (ECMA-335 II.24.2.3).

use std::str;

use crate::{Error::OutOfBounds, Result};

/// Null-terminated UTF-8 identifiers, addressed by byte offset.
///
/// Table rows store offsets into this heap; an `AssemblyRef` row holds two, for the simple name
/// and the culture. Offsets need not point at the start of a string.
///
/// ```rust
/// use asmrefs::metadata::streams::Strings;
///
/// let strings = Strings::from(b"\0Sandbox.Game\0")?;
/// assert_eq!(strings.get(1)?, "Sandbox.Game");
/// assert_eq!(strings.get(9)?, "Game");
/// # Ok::<(), asmrefs::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wraps the heap bytes.
    ///
    /// # Errors
    /// A heap must be non-empty and open with the empty string at offset 0.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        match data.first() {
            Some(0) => Ok(Strings { data }),
            Some(_) => Err(malformed_error!("#Strings does not start with an empty string")),
            None => Err(malformed_error!("#Strings is empty")),
        }
    }

    /// The string starting at byte offset `index`.
    ///
    /// # Errors
    /// [`crate::Error::OutOfBounds`] for an offset past the heap, [`crate::Error::Malformed`] if
    /// no terminator follows or the bytes are not UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        let Some(tail) = self.data.get(index..).filter(|tail| !tail.is_empty()) else {
            return Err(OutOfBounds);
        };

        let Some(end) = tail.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("unterminated string at #Strings+{:#x}", index));
        };

        str::from_utf8(&tail[..end])
            .map_err(|_| malformed_error!("string at #Strings+{:#x} is not UTF-8", index))
    }

    /// Heap size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Never true for a heap that passed [`Strings::from`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
