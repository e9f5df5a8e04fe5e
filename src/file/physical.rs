//! Physical file backend for memory-mapped I/O.
//!
//! This module provides the [`crate::file::physical::Physical`] backend that implements the
//! [`crate::file::Backend`] trait for images on disk. The file is memory-mapped read-only, so
//! only the pages the metadata reader actually touches (headers, the CLI header, the metadata
//! root and the tables stream) are paged in. The mapping, and with it the underlying file
//! handle, is released when the backend is dropped.

use super::Backend;
use crate::{
    Error::{FileError, NotFound},
    Result,
};

use memmap2::Mmap;
use std::{fs, io, path::Path};

/// Memory-mapped view of a file on disk.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Opens and maps the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if the file does not exist, and
    /// [`crate::Error::FileError`] for any other open or mapping failure.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let path = path.as_ref();
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(NotFound(path.to_path_buf()))
            }
            Err(error) => return Err(FileError(error)),
        };

        // The mapping is read-only and private to this backend; concurrent truncation of the
        // file by another process is outside what this crate guards against.
        let mmap = unsafe { Mmap::map(&file) }.map_err(FileError)?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
}
