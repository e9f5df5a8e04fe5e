//! Outcome of a dependency resolution.

use std::collections::{BTreeMap, BTreeSet};

/// The files reached from one or more roots, and what happened to the ones that could not be
/// followed.
///
/// All collections are keyed by file name and iterate in byte order of the name.
///
/// # Usage
///
/// ```rust,no_run
/// use asmrefs::{PrefixFilter, Resolver};
/// use std::path::Path;
///
/// let resolution = Resolver::new(PrefixFilter::default()).resolve(Path::new("Sandbox.Game.dll"))?;
/// for file in resolution.files() {
///     println!("{file}");
/// }
/// for (file, error) in resolution.unreadable() {
///     eprintln!("{file}: {error}");
/// }
/// # Ok::<(), asmrefs::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    files: BTreeSet<String>,
    native: BTreeSet<String>,
    missing: BTreeSet<String>,
    unreadable: BTreeMap<String, String>,
}

impl Resolution {
    /// Every reached file, roots included, sorted.
    #[must_use]
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    /// Reached files that are valid images without managed metadata.
    #[must_use]
    pub fn native(&self) -> &BTreeSet<String> {
        &self.native
    }

    /// Candidate files that were referenced but do not exist.
    #[must_use]
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }

    /// Reached files that could not be read, with the error that stopped them.
    #[must_use]
    pub fn unreadable(&self) -> &BTreeMap<String, String> {
        &self.unreadable
    }

    /// Consumes the resolution, returning the sorted file names.
    #[must_use]
    pub fn into_files(self) -> Vec<String> {
        self.files.into_iter().collect()
    }

    pub(crate) fn is_known(&self, name: &str) -> bool {
        self.files.contains(name) || self.missing.contains(name)
    }

    pub(crate) fn record_file(&mut self, name: String) -> bool {
        self.files.insert(name)
    }

    pub(crate) fn record_native(&mut self, name: String) {
        self.native.insert(name);
    }

    pub(crate) fn record_missing(&mut self, name: String) {
        self.missing.insert(name);
    }

    pub(crate) fn record_unreadable(&mut self, name: String, error: String) {
        self.unreadable.insert(name, error);
    }

    /// Adds everything `other` reached. A name found by either side is no longer missing.
    pub fn merge(&mut self, other: Resolution) {
        self.files.extend(other.files);
        self.native.extend(other.native);
        self.missing.extend(other.missing);
        self.unreadable.extend(other.unreadable);

        let files = &self.files;
        self.missing.retain(|name| !files.contains(name));
    }
}
