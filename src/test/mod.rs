//! Test-only support code.
//!
//! [`ImageBuilder`] synthesises PE images with CLI metadata, so the reader and the resolver can be
//! exercised without shipping binary samples.

mod factories;

pub use factories::image::{ImageBuilder, ReferenceSpec};
