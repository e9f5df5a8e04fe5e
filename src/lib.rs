// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # asmrefs
//!
//! Static discovery of the external-assembly dependency graph of .NET PE executables.
//!
//! `asmrefs` reads the `AssemblyRef` table straight out of the CLI metadata of an image, without
//! loading it through a runtime, and follows those references transitively to sibling files on
//! disk. The result is the sorted set of file names reachable from a root, restricted to the
//! reference names a caller-supplied filter accepts.
//!
//! ## Features
//!
//! - **Static inspection** - Images are memory-mapped and decoded, never loaded or executed
//! - **Minimal metadata walk** - Only the CLI header, the stream directory, the tables stream
//!   header and the `#Strings` heap are touched
//! - **Best-effort traversal** - Native, missing and damaged dependencies are recorded and
//!   skipped instead of aborting the walk
//! - **Deterministic output** - Breadth-first and depth-first walks produce the same sorted set
//!
//! ## Quick Start
//!
//! ### Reading the references of one image
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! for name in asmrefs::read_references(Path::new("Bin64/Sandbox.Game.dll"))? {
//!     println!("{name}");
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```
//!
//! ### Resolving the dependency set
//!
//! ```rust,no_run
//! use asmrefs::prelude::*;
//! use std::path::Path;
//!
//! let files = resolve_dependencies(
//!     Path::new("Bin64/SpaceEngineers.Game.dll"),
//!     PrefixFilter::new(["Sandbox.", "VRage"]),
//! )?;
//! for file in files {
//!     println!("{file}");
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - From the CLI header to the `AssemblyRef` rows of one image
//! - [`resolver`] - The transitive walk over sibling files
//! - [`Error`] and [`Result`] - Error handling, classified through [`ErrorKind`]
//!
//! ## Error classes
//!
//! | [`ErrorKind`]     | Cause                                            |
//! |-------------------|--------------------------------------------------|
//! | `NotFound`        | the path does not exist                          |
//! | `Io`              | the file exists but cannot be read or mapped     |
//! | `MalformedImage`  | damaged PE headers, metadata root or tables      |
//! | `NotManaged`      | a valid PE image without a CLR runtime header    |
//!
//! ## References
//!
//! - [ECMA-335 6th Edition](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use asmrefs::prelude::*;
///
/// let view = AssemblyView::from_file("Sandbox.Game.dll".as_ref())?;
/// let names = view.references()?;
/// # Ok::<(), asmrefs::Error>(())
/// ```
pub mod prelude;

/// Parsing of the CLI metadata needed to enumerate assembly references, based on ECMA-335.
///
/// # Key Components
///
/// - [`AssemblyView`] - The parsed view of one image
/// - [`metadata::cor20header`] - CLR 2.0 header information
/// - [`metadata::root`] - Metadata root and stream directory
/// - [`metadata::streams`] - The `#Strings` heap and the tables stream header
/// - [`metadata::tables`] - Table ids, row layouts and the `AssemblyRef` table
pub mod metadata;

/// Transitive resolution of assembly references to files on disk.
///
/// See [`Resolver`] for the configurable walk and [`resolve_dependencies`] for the one-call form.
pub mod resolver;

/// `asmrefs` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `asmrefs` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use asmrefs::{read_references, ErrorKind};
///
/// match read_references(std::path::Path::new("steam_api64.dll")) {
///     Ok(names) => println!("{} references", names.len()),
///     Err(e) if e.kind() == ErrorKind::NotManaged => println!("native image"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::{Error, ErrorKind};

/// Loaded PE image and the low-level cursor used by the header parsers.
pub use file::{parser::Parser, File};

pub use metadata::{
    references::{read_assembly_refs, read_references, read_references_from_mem, AssemblyReference},
    AssemblyView,
};

pub use resolver::{
    resolve_dependencies, MetadataReader, PrefixFilter, ReferenceFilter, ReferenceSource,
    Resolution, Resolver, Traversal, DEFAULT_PREFIXES,
};
