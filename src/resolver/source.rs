//! Where the resolver gets the references of a node from.

use std::path::Path;

use crate::{metadata::references::read_references, Result};

/// Supplies the reference names of a file and answers whether a candidate exists.
///
/// [`MetadataReader`] is the implementation backed by the image parser. Tests and callers with
/// an already known graph can provide their own.
pub trait ReferenceSource {
    /// Returns the referenced assembly names of `path`, in any order.
    ///
    /// # Errors
    /// The error classes of [`crate::read_references`]; a [`crate::ErrorKind::NotManaged`] error
    /// marks `path` as a native file.
    fn references(&self, path: &Path) -> Result<Vec<String>>;

    /// Returns `true` if a candidate file exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Reads references straight from the image metadata on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataReader;

impl ReferenceSource for MetadataReader {
    fn references(&self, path: &Path) -> Result<Vec<String>> {
        read_references(path)
    }
}
