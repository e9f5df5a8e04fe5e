//! Transitive dependency resolution.
//!
//! Starting from a root image, the [`Resolver`] reads the assembly references recorded in its
//! metadata, turns every relevant reference name into a sibling file path
//! (`dir(root)/<name>.dll`) and repeats for every file it reaches. The result is the set of
//! reached file names, sorted.
//!
//! Traversal is best effort. A native file contributes no references, a referenced file that
//! does not exist is remembered as missing, and a file that cannot be parsed is remembered as
//! unreadable; none of them stop the walk. Only a failure to read the root itself is returned as
//! an error.
//!
//! # Key Components
//!
//! - [`Resolver`] - Builder for one or more traversals
//! - [`ReferenceFilter`] / [`PrefixFilter`] - Which reference names are followed
//! - [`ReferenceSource`] / [`MetadataReader`] - Where the references of a file come from
//! - [`Resolution`] - Reached, native, missing and unreadable files
//!
//! # Examples
//!
//! ```rust,no_run
//! use asmrefs::{resolve_dependencies, PrefixFilter, DEFAULT_PREFIXES};
//! use std::path::Path;
//!
//! let filter = PrefixFilter::new(DEFAULT_PREFIXES.iter().copied());
//! for file in resolve_dependencies(Path::new("Bin64/SpaceEngineers.Game.dll"), filter)? {
//!     println!("{file}");
//! }
//! # Ok::<(), asmrefs::Error>(())
//! ```

mod filter;
mod result;
mod source;

pub use filter::{PrefixFilter, ReferenceFilter, DEFAULT_PREFIXES};
pub use result::Resolution;
pub use source::{MetadataReader, ReferenceSource};

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::Result;

/// Extension appended to reference names to form candidate file names.
pub const DEFAULT_EXTENSION: &str = ".dll";

/// Name part inserted before the extension of an XML serializer companion.
const XML_SERIALIZERS: &str = ".XmlSerializers";

/// Order in which queued files are scanned.
///
/// The resolved file set does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Scan files in the order they were discovered (FIFO)
    #[default]
    BreadthFirst,
    /// Scan the most recently discovered file first (LIFO)
    DepthFirst,
}

/// Builder for dependency resolution.
///
/// # Usage Examples
///
/// ## Following one root
/// ```rust,no_run
/// use asmrefs::{PrefixFilter, Resolver};
/// use std::path::Path;
///
/// let files = Resolver::new(PrefixFilter::new(["Sandbox.", "VRage"]))
///     .resolve(Path::new("Sandbox.Game.dll"))?
///     .into_files();
/// # Ok::<(), asmrefs::Error>(())
/// ```
///
/// ## Several roots with serializer companions
/// ```rust,no_run
/// use asmrefs::{PrefixFilter, Resolver};
///
/// let resolution = Resolver::new(PrefixFilter::default())
///     .xml_serializers(true)
///     .resolve_all(["Bin64/Sandbox.Game.dll", "Bin64/SpaceEngineers.Game.dll"])?;
/// println!("{} files, {} missing", resolution.files().len(), resolution.missing().len());
/// # Ok::<(), asmrefs::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<F, S = MetadataReader> {
    filter: F,
    source: S,
    traversal: Traversal,
    extension: String,
    xml_serializers: bool,
}

impl<F: ReferenceFilter> Resolver<F> {
    /// Creates a resolver that follows the references `filter` accepts, reading them from image
    /// metadata.
    pub fn new(filter: F) -> Self {
        Resolver {
            filter,
            source: MetadataReader,
            traversal: Traversal::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            xml_serializers: false,
        }
    }
}

impl<F: ReferenceFilter, S: ReferenceSource> Resolver<F, S> {
    /// Replaces the source of reference names.
    pub fn with_source<T: ReferenceSource>(self, source: T) -> Resolver<F, T> {
        Resolver {
            filter: self.filter,
            source,
            traversal: self.traversal,
            extension: self.extension,
            xml_serializers: self.xml_serializers,
        }
    }

    /// Sets the scan order.
    #[must_use]
    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Sets the extension appended to reference names, including the leading dot.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// When enabled, `<name>.XmlSerializers<ext>` is added for every reached `<name><ext>` that
    /// has one next to the root. Companions are not scanned.
    #[must_use]
    pub fn xml_serializers(mut self, enabled: bool) -> Self {
        self.xml_serializers = enabled;
        self
    }

    /// Resolves everything reachable from `root`.
    ///
    /// # Errors
    /// Returns the read error of `root` itself, unless `root` is merely not managed. Errors of
    /// reached files are recorded in the [`Resolution`] instead.
    pub fn resolve(&self, root: &Path) -> Result<Resolution> {
        let Some(root_name) = file_name(root) else {
            return Err(malformed_error!("Root path has no file name - {}", root.display()));
        };
        let dir = root.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut resolution = Resolution::default();
        resolution.record_file(root_name.clone());

        let mut queue: VecDeque<(PathBuf, String)> = VecDeque::new();
        queue.push_back((root.to_path_buf(), root_name));

        let mut is_root = true;
        while let Some((path, name)) = self.next(&mut queue) {
            let scanning_root = std::mem::replace(&mut is_root, false);
            debug!("Scanning {}", path.display());

            let references = match self.source.references(&path) {
                Ok(references) => references,
                Err(error) if error.is_not_managed() => {
                    debug!("{} is not a managed image", name);
                    resolution.record_native(name);
                    continue;
                }
                Err(error) if scanning_root => return Err(error),
                Err(error) => {
                    warn!("Failed to read references of {}: {}", path.display(), error);
                    resolution.record_unreadable(name, error.to_string());
                    continue;
                }
            };

            for reference in references {
                if !self.filter.is_relevant(&reference) {
                    continue;
                }

                let candidate = dir.join(format!("{}{}", reference, self.extension));
                let Some(candidate_name) = file_name(&candidate) else {
                    continue;
                };

                if resolution.is_known(&candidate_name) {
                    continue;
                }

                if !self.source.exists(&candidate) {
                    debug!("{} references {}, which does not exist", name, candidate_name);
                    resolution.record_missing(candidate_name);
                    continue;
                }

                resolution.record_file(candidate_name.clone());
                queue.push_back((candidate, candidate_name));
            }
        }

        if self.xml_serializers {
            self.add_companions(&dir, &mut resolution);
        }

        Ok(resolution)
    }

    /// Resolves every root against its own directory and merges the results.
    ///
    /// # Errors
    /// Returns the first root that fails as in [`Resolver::resolve`].
    pub fn resolve_all<I, P>(&self, roots: I) -> Result<Resolution>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut resolution = Resolution::default();
        for root in roots {
            resolution.merge(self.resolve(root.as_ref())?);
        }

        Ok(resolution)
    }

    fn next(&self, queue: &mut VecDeque<(PathBuf, String)>) -> Option<(PathBuf, String)> {
        match self.traversal {
            Traversal::BreadthFirst => queue.pop_front(),
            Traversal::DepthFirst => queue.pop_back(),
        }
    }

    fn add_companions(&self, dir: &Path, resolution: &mut Resolution) {
        let suffix = format!("{}{}", XML_SERIALIZERS, self.extension);
        let companions: Vec<String> = resolution
            .files()
            .iter()
            .filter(|name| !name.ends_with(&suffix))
            .filter_map(|name| name.strip_suffix(&self.extension))
            .map(|stem| format!("{stem}{suffix}"))
            .filter(|companion| !resolution.files().contains(companion))
            .collect();

        for companion in companions {
            if self.source.exists(&dir.join(&companion)) {
                debug!("Adding serializer companion {}", companion);
                resolution.record_file(companion);
            }
        }
    }
}

/// Resolves the sorted file names reachable from `root` through references `filter` accepts.
///
/// # Errors
/// See [`Resolver::resolve`].
pub fn resolve_dependencies(root: &Path, filter: impl ReferenceFilter) -> Result<Vec<String>> {
    Resolver::new(filter).resolve(root).map(Resolution::into_files)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
