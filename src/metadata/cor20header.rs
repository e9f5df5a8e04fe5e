//! The CLI header (ECMA-335 II.25.3.3).
//!
//! Data directory 14 of a managed image points at this 72-byte header. The metadata location is
//! the only part reference discovery relies on; everything else is decoded but not checked.

use bitflags::bitflags;

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// Size of the CLI header as defined by ECMA-335.
pub const COR20_HEADER_SIZE: usize = 72;

bitflags! {
    /// Runtime flags of the CLI header (II.25.3.3.1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RuntimeFlags : u32 {
        /// Contains only CIL
        const IL_ONLY = 0x0000_0001;
        /// Must be loaded into a 32-bit process
        const REQUIRE_32BIT = 0x0000_0002;
        /// Carries a strong name signature
        const STRONG_NAME_SIGNED = 0x0000_0008;
        /// The entry point is a native RVA rather than a token
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        /// Prefers running as a 32-bit process
        const PREFER_32BIT = 0x0002_0000;
    }
}

/// An RVA and size pair as stored in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directory {
    /// Relative virtual address
    pub rva: u32,
    /// Size in bytes
    pub size: u32,
}

impl Directory {
    fn read(parser: &mut Parser) -> Result<Directory> {
        Ok(Directory {
            rva: parser.read_le::<u32>()?,
            size: parser.read_le::<u32>()?,
        })
    }

    /// A directory with neither address nor size.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rva == 0 || self.size == 0
    }
}

/// The decoded CLI header.
#[derive(Debug, Clone)]
pub struct Cor20Header {
    /// Declared header size, at least 72
    pub cb: u32,
    /// Minimum runtime version as major and minor
    pub runtime_version: (u16, u16),
    /// Location of the metadata root
    pub metadata: Directory,
    /// Runtime flags
    pub flags: RuntimeFlags,
    /// `MethodDef` or `File` token of the entry point, or its RVA
    pub entry_point: u32,
    /// Managed resources
    pub resources: Directory,
    /// Strong name signature
    pub strong_name_signature: Directory,
    /// Always empty
    pub code_manager_table: Directory,
    /// Vtable fixups for unmanaged callers
    pub vtable_fixups: Directory,
    /// Always empty
    pub export_address_table_jumps: Directory,
    /// Always empty for CIL images
    pub managed_native_header: Directory,
}

impl Cor20Header {
    /// Decodes the header at the start of `data`.
    ///
    /// # Errors
    /// [`crate::Error::OutOfBounds`] if fewer than 72 bytes are available,
    /// [`crate::Error::Malformed`] if the declared size is below 72 or the metadata directory is
    /// empty.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < COR20_HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if (cb as usize) < COR20_HEADER_SIZE {
            return Err(malformed_error!("CLI header declares {} bytes, need 72", cb));
        }

        let runtime_version = (parser.read_le::<u16>()?, parser.read_le::<u16>()?);
        let metadata = Directory::read(&mut parser)?;
        if metadata.is_empty() {
            return Err(malformed_error!(
                "CLI header has no metadata (rva {:#x}, size {:#x})",
                metadata.rva,
                metadata.size
            ));
        }

        Ok(Cor20Header {
            cb,
            runtime_version,
            metadata,
            flags: RuntimeFlags::from_bits_retain(parser.read_le::<u32>()?),
            entry_point: parser.read_le::<u32>()?,
            resources: Directory::read(&mut parser)?,
            strong_name_signature: Directory::read(&mut parser)?,
            code_manager_table: Directory::read(&mut parser)?,
            vtable_fixups: Directory::read(&mut parser)?,
            export_address_table_jumps: Directory::read(&mut parser)?,
            managed_native_header: Directory::read(&mut parser)?,
        })
    }
}
