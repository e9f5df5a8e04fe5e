//! Metadata streams for .NET assemblies.
//!
//! The metadata root is followed by a directory of named streams. Two of them carry what reference
//! discovery needs:
//!
//! - **`#~`** (or the uncompressed **`#-`**) - the metadata tables, including `AssemblyRef`
//! - **`#Strings`** - UTF-8 identifier heap; the first entry is always the empty string
//!
//! The remaining standard streams (`#US`, `#Blob`, `#GUID`) and any non-standard streams are
//! located by the stream directory but never read.
//!
//! # Examples
//!
//! ```rust,no_run
//! use asmrefs::AssemblyView;
//! use std::path::Path;
//!
//! let view = AssemblyView::from_file(Path::new("Sandbox.Game.dll"))?;
//!
//! for stream in view.streams() {
//!     println!("{:<10} offset {:#x} size {:#x}", stream.name, stream.offset, stream.size);
//! }
//!
//! if let Some(tables) = view.tables() {
//!     println!("{} tables present", tables.table_count());
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod streamheader;
mod strings;
mod tablesheader;

pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::{TableSummary, TablesHeader};
