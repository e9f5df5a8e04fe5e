//! Low-level little-endian reading utilities for PE and metadata parsing.
//!
//! Every on-disk structure this crate touches (PE headers, the CLI header, the metadata root,
//! the tables stream) is little-endian. The functions here perform bounds-checked reads of
//! primitive integers from byte slices and return [`crate::Error::OutOfBounds`] instead of
//! panicking when the buffer is too short.
//!
//! # Key Components
//!
//! - [`crate::file::io::CilIO`] - Trait tying a primitive type to its fixed-size byte array
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//! - [`crate::file::io::read_le_at_dyn`] - Read a 2- or 4-byte heap/table index
//!
//! # Examples
//!
//! ```rust,ignore
//! use asmrefs::file::io::{read_le_at, read_le_at_dyn};
//!
//! let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let first: u16 = read_le_at(&data, &mut offset)?;   // offset: 0 -> 2
//! let second = read_le_at_dyn(&data, &mut offset, false)?; // offset: 2 -> 4
//! let third = read_le_at_dyn(&data, &mut offset, true)?;   // offset: 4 -> 8
//!
//! assert_eq!((first, second, third), (1, 2, 3));
//! # Ok::<(), asmrefs::Error>(())
//! ```

use crate::Result;

/// Trait for primitive types that can be decoded from little-endian bytes.
///
/// The associated `Bytes` type is the fixed-size array required for the type
/// (e.g. `[u8; 4]` for `u32`), which lets the readers convert a slice with a single
/// `try_into`.
pub trait CilIO: Sized {
    /// Byte array representation of the type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decodes the value from its little-endian representation.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),*) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Reads a value of type `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would cross the end of `data`; `offset`
/// is left untouched in that case.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };

    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Reads a heap or table index that is either 2 or 4 bytes wide.
///
/// # Arguments
/// * `data` - The buffer to read from
/// * `offset` - The current position, advanced by 2 or 4
/// * `is_large` - `true` for a 4-byte index
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}
