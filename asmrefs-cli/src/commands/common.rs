use std::path::Path;

use asmrefs::{PrefixFilter, DEFAULT_PREFIXES};

use crate::app::ResolveOptions;

/// Build the reference filter selected on the command line.
pub fn build_filter(opts: &ResolveOptions) -> PrefixFilter {
    if opts.all {
        PrefixFilter::any()
    } else if opts.prefixes.is_empty() {
        PrefixFilter::new(DEFAULT_PREFIXES.iter().copied())
    } else {
        PrefixFilter::new(opts.prefixes.iter().cloned())
    }
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
