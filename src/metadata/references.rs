//! Reading the assembly references of an image.
//!
//! These functions open an image, walk its metadata to the `AssemblyRef` table and return the
//! recorded references in table row order. Each call is independent: the image is mapped,
//! parsed and released before the function returns, on success and on error alike.

use std::path::Path;

use crate::{
    metadata::{tables::AssemblyFlags, view::AssemblyView},
    Result,
};

/// One row of the `AssemblyRef` table with its heap indexes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReference {
    /// The simple name of the referenced assembly, e.g. `Sandbox.Game`
    pub name: String,
    /// Major, minor, build and revision number
    pub version: (u16, u16, u16, u16),
    /// Culture of the referenced assembly, `None` for the neutral culture
    pub culture: Option<String>,
    /// Reference flags
    pub flags: AssemblyFlags,
}

/// Returns the names of all assemblies `path` references, in table row order.
///
/// An image whose metadata has no `AssemblyRef` table yields an empty list.
///
/// # Errors
/// - [`crate::Error::NotFound`] / [`crate::Error::FileError`] if the file cannot be read
/// - [`crate::Error::NotManaged`] if the image is a valid PE file without a CLR runtime header
/// - [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`], [`crate::Error::Empty`] or
///   [`crate::Error::GoblinErr`] if the image is damaged
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// let names = asmrefs::read_references(Path::new("Sandbox.Game.dll"))?;
/// assert!(names.iter().all(|name| !name.is_empty()));
/// # Ok::<(), asmrefs::Error>(())
/// ```
pub fn read_references(path: &Path) -> Result<Vec<String>> {
    AssemblyView::from_file(path)?.references()
}

/// Returns the names of all assemblies an in-memory image references.
///
/// # Errors
/// See [`read_references`], without the file access errors.
pub fn read_references_from_mem(data: Vec<u8>) -> Result<Vec<String>> {
    AssemblyView::from_mem(data)?.references()
}

/// Returns the complete `AssemblyRef` rows of `path`, in table row order.
///
/// # Errors
/// See [`read_references`].
pub fn read_assembly_refs(path: &Path) -> Result<Vec<AssemblyReference>> {
    AssemblyView::from_file(path)?.assembly_refs()
}
