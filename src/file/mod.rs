//! PE images, opened for reading only.
//!
//! [`File`] answers the two questions the metadata reader has about the PE layer: is there a
//! CLR runtime header in data directory 14, and at which file offset does an RVA live. The
//! image is never loaded or relocated.
//!
//!
//! ```rust,no_run
//! use asmrefs::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("Sandbox.Game.dll"))?;
//! if file.is_managed() {
//!     let (clr_rva, clr_size) = file.clr()?;
//!     let clr_offset = file.rva_to_offset(clr_rva)?;
//!     let clr_data = file.data_slice(clr_offset, clr_size)?;
//!     println!("CLI header starts with: {:02x?}", &clr_data[0..8]);
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr, NotManaged},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Where the bytes of an image live.
///
/// The same parsing code runs over a memory-mapped file on disk and over a buffer handed in by
/// the caller; both only need to expose their bytes.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range does not lie inside the buffer.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.data();
        offset
            .checked_add(len)
            .and_then(|end| data.get(offset..end))
            .ok_or(out_of_bounds_error!())
    }

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }
}

#[self_referencing]
/// A parsed PE image together with the bytes it borrows from.
///
/// Any PE image with an optional header loads, managed or native. [`File::clr`] tells them
/// apart.
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Maps and parses the image at `file`.
    ///
    /// # Errors
    /// [`crate::Error::NotFound`] for a missing path, [`crate::Error::FileError`] if it cannot be
    /// opened, and [`crate::Error::Empty`] or a parse error for anything that is not a PE image
    /// with an optional header.
    pub fn from_file(file: &Path) -> Result<File> {
        Self::load(Physical::new(file)?)
    }

    /// Parses an image held in memory.
    ///
    /// # Errors
    /// As [`File::from_file`], minus the filesystem errors.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        Self::load(Memory::from(data))
    }

    fn load(data: impl Backend + 'static) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        File::try_new(Box::new(data), |data| {
            let pe = PE::parse(data.data()).map_err(GoblinErr)?;
            if pe.header.optional_header.is_none() {
                return Err(malformed_error!("PE image without an optional header"));
            }
            Ok(pe)
        })
    }

    /// Returns the total size of the loaded image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the image has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw bytes of the image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a bounds-checked slice of the image.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Returns `true` if data directory 14 (CLR runtime header) is present and non-empty.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.clr().is_ok()
    }

    /// Returns the RVA and size of the CLR runtime header.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotManaged`] if the directory is absent or zero-sized.
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            let Some(optional_header) = pe.header.optional_header.as_ref() else {
                return Err(NotManaged);
            };

            match optional_header.data_directories.get_clr_runtime_header() {
                Some(clr_dir) if clr_dir.virtual_address != 0 && clr_dir.size != 0 => {
                    Ok((clr_dir.virtual_address as usize, clr_dir.size as usize))
                }
                _ => Err(NotManaged),
            }
        })
    }

    /// Translates a relative virtual address into a file offset.
    ///
    /// The containing section is the one whose virtual range
    /// `[virtual_address, virtual_address + max(virtual_size, size_of_raw_data))` holds `rva`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains the address or a section's
    /// bounds overflow.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 =
            u32::try_from(rva).map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let extent = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(extent) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        extent
                    ));
                };

                if section.virtual_address <= rva_u32 && rva_u32 < section_max {
                    return Ok((rva_u32 - section.virtual_address) as usize
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
