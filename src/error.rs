use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// Errors returned while opening an image or reading its references.
///
/// The variants fold into four [`ErrorKind`] classes, which is all the dependency resolver looks
/// at: a missing file, an unreadable file, a damaged image (`Malformed`, `OutOfBounds`, `Empty`
/// and `GoblinErr`) and a native image.
///
/// # Examples
///
/// ```rust,no_run
/// use asmrefs::{read_references, Error};
/// use std::path::Path;
///
/// match read_references(Path::new("Sandbox.Game.dll")) {
///     Ok(names) => println!("{} references", names.len()),
///     Err(Error::NotManaged) => println!("native image, nothing to follow"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed image: {} ({}:{})", message, file, line)
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The image does not exist on disk.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// Opening or mapping the file failed.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A header, the metadata root or the tables stream is inconsistent.
    ///
    /// Carries the location in this crate that rejected the image.
    #[error("malformed image: {message} ({file}:{line})")]
    Malformed {
        /// What was wrong
        message: String,
        /// Source file of the check
        file: &'static str,
        /// Source line of the check
        line: u32,
    },

    /// A structure extends past the end of the data holding it.
    #[error("truncated image: read past the end of the data")]
    OutOfBounds,

    /// Zero-length input.
    #[error("empty file")]
    Empty,

    /// The image is a valid PE file, but carries no CLR runtime header.
    ///
    /// Native libraries living next to managed assemblies produce this. It is an expected
    /// outcome, not a failure of the image.
    #[error("not a managed image: no CLR runtime header")]
    NotManaged,

    /// The PE layer rejected the image.
    #[error("invalid PE image: {0}")]
    GoblinErr(#[from] goblin::error::Error),
}

/// Coarse classification of an [`Error`], matching how the resolver treats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path does not exist.
    NotFound,
    /// The file exists but could not be read.
    Io,
    /// The file is structurally invalid.
    MalformedImage,
    /// The file is a valid image without managed metadata.
    NotManaged,
}

impl Error {
    /// Classifies this error.
    ///
    /// An [`Error::FileError`] carrying [`std::io::ErrorKind::NotFound`] is reported as
    /// [`ErrorKind::NotFound`], the same as [`Error::NotFound`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::FileError(error) if error.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            Error::FileError(_) => ErrorKind::Io,
            Error::Malformed { .. } | Error::OutOfBounds | Error::Empty | Error::GoblinErr(_) => {
                ErrorKind::MalformedImage
            }
            Error::NotManaged => ErrorKind::NotManaged,
        }
    }

    /// Returns `true` for [`ErrorKind::NotManaged`].
    #[must_use]
    pub fn is_not_managed(&self) -> bool {
        self.kind() == ErrorKind::NotManaged
    }
}
