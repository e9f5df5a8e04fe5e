//! Relevance filters for reference names.

/// Name prefixes the reference tool follows by default.
///
/// The resolver never consults this list on its own; callers pass it in through
/// [`PrefixFilter::new`].
pub const DEFAULT_PREFIXES: &[&str] = &["Sandbox.", "SpaceEngineers.", "VRage"];

/// Decides whether a referenced assembly is followed.
///
/// Names rejected here are never turned into candidate paths, so their own references are never
/// explored either. Any `Fn(&str) -> bool` is a filter:
///
/// ```rust
/// use asmrefs::ReferenceFilter;
///
/// let filter = |name: &str| name != "mscorlib";
/// assert!(filter.is_relevant("VRage"));
/// assert!(!filter.is_relevant("mscorlib"));
/// ```
pub trait ReferenceFilter {
    /// Returns `true` if the reference named `name` should be followed.
    fn is_relevant(&self, name: &str) -> bool;
}

impl<F> ReferenceFilter for F
where
    F: Fn(&str) -> bool,
{
    fn is_relevant(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts names starting with any of a list of prefixes.
///
/// The comparison is case-sensitive and byte-wise. An empty prefix list rejects everything;
/// use [`PrefixFilter::any`] to accept every name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFilter {
    prefixes: Vec<String>,
    accept_all: bool,
}

impl PrefixFilter {
    /// Creates a filter for the given prefixes.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrefixFilter {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            accept_all: false,
        }
    }

    /// Creates a filter that accepts every name.
    #[must_use]
    pub fn any() -> Self {
        PrefixFilter {
            prefixes: Vec::new(),
            accept_all: true,
        }
    }

    /// The configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for PrefixFilter {
    fn default() -> Self {
        PrefixFilter::new(DEFAULT_PREFIXES.iter().copied())
    }
}

impl ReferenceFilter for PrefixFilter {
    fn is_relevant(&self, name: &str) -> bool {
        self.accept_all
            || self
                .prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
    }
}
