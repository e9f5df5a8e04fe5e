//! Metadata parsing for .NET PE files.
//!
//! This module walks from the CLI header to the `AssemblyRef` table: the CLI header gives the
//! location of the metadata block, the metadata root lists its streams, the tables stream holds the
//! `AssemblyRef` rows and the `#Strings` heap holds their names.
//!
//! # Key Components
//!
//! - [`cor20header`] - The CLI header found through data directory 14
//! - [`root`] - Metadata root and stream directory
//! - [`streams`] - Stream headers, the `#Strings` heap and the tables stream header
//! - [`tables`] - Table ids, row layouts and the `AssemblyRef` row
//! - [`view`] - [`AssemblyView`], all of the above assembled for one image
//! - [`references`] - The reference-reading entry points
//!
//! # Examples
//!
//! ```rust,no_run
//! use asmrefs::metadata::references::read_assembly_refs;
//! use std::path::Path;
//!
//! for reference in read_assembly_refs(Path::new("Sandbox.Game.dll"))? {
//!     let (major, minor, build, revision) = reference.version;
//!     println!("{} {}.{}.{}.{}", reference.name, major, minor, build, revision);
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```

pub mod cor20header;
pub mod references;
pub mod root;
pub mod streams;
pub mod tables;
pub mod view;

pub use view::AssemblyView;
