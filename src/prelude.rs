//! # asmrefs Prelude
//!
//! The types and functions needed for reading references and resolving dependencies, for glob
//! import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all asmrefs operations
pub use crate::Error;

/// Coarse classification of an [`Error`]
pub use crate::ErrorKind;

/// The result type used throughout asmrefs
pub use crate::Result;

// ================================================================================================
// Metadata Reader
// ================================================================================================

/// Parsed metadata of one image
pub use crate::AssemblyView;

/// One resolved `AssemblyRef` row
pub use crate::AssemblyReference;

/// Reference reading entry points
pub use crate::{read_assembly_refs, read_references, read_references_from_mem};

// ================================================================================================
// Dependency Resolver
// ================================================================================================

/// Dependency resolution
pub use crate::{
    resolve_dependencies, MetadataReader, PrefixFilter, ReferenceFilter, ReferenceSource,
    Resolution, Resolver, Traversal, DEFAULT_PREFIXES,
};
