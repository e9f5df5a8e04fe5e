use std::path::PathBuf;

use anyhow::Context;
use asmrefs::{Resolution, Resolver};
use serde::Serialize;

use crate::{
    app::{GlobalOptions, ResolveOptions},
    commands::common::{build_filter, file_display_name},
    output::emit,
};

#[derive(Debug, Serialize)]
struct UnreadableEntry {
    file: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    files: Vec<String>,
    native: Vec<String>,
    missing: Vec<String>,
    unreadable: Vec<UnreadableEntry>,
}

pub fn run(
    roots: &[PathBuf],
    opts: &ResolveOptions,
    global: &GlobalOptions,
) -> anyhow::Result<()> {
    let resolver = Resolver::new(build_filter(opts)).xml_serializers(opts.xml_serializers);

    let mut resolution = Resolution::default();
    for root in roots {
        let reached = resolver
            .resolve(root)
            .with_context(|| format!("failed to read references: {}", root.display()))?;
        log::debug!(
            "{}: {} files reached",
            file_display_name(root),
            reached.files().len()
        );
        resolution.merge(reached);
    }

    let output = ResolveOutput {
        files: resolution.files().iter().cloned().collect(),
        native: resolution.native().iter().cloned().collect(),
        missing: resolution.missing().iter().cloned().collect(),
        unreadable: resolution
            .unreadable()
            .iter()
            .map(|(file, error)| UnreadableEntry {
                file: file.clone(),
                error: error.clone(),
            })
            .collect(),
    };

    emit(&output, global, |out| {
        for file in &out.files {
            println!("{file}");
        }
    })
}
