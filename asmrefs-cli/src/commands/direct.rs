use std::path::PathBuf;

use anyhow::Context;
use asmrefs::{read_assembly_refs, AssemblyReference};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::file_display_name,
    output::{emit, ReferenceTable},
};

#[derive(Debug, Serialize)]
struct ReferenceEntry {
    row: usize,
    name: String,
    version: String,
    culture: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileReferences {
    file: String,
    references: Vec<ReferenceEntry>,
}

impl ReferenceEntry {
    fn new(row: usize, reference: AssemblyReference) -> Self {
        let (major, minor, build, revision) = reference.version;
        ReferenceEntry {
            row,
            name: reference.name,
            version: format!("{major}.{minor}.{build}.{revision}"),
            culture: reference.culture,
        }
    }
}

pub fn run(roots: &[PathBuf], opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut output = Vec::with_capacity(roots.len());
    for root in roots {
        let references = read_assembly_refs(root)
            .with_context(|| format!("failed to read references: {}", root.display()))?;

        output.push(FileReferences {
            file: file_display_name(root),
            references: references
                .into_iter()
                .enumerate()
                .map(|(index, reference)| ReferenceEntry::new(index + 1, reference))
                .collect(),
        });
    }

    emit(&output, opts, |files| {
        let nested = files.len() > 1;
        for (index, file) in files.iter().enumerate() {
            if nested {
                if index > 0 {
                    println!();
                }
                println!("{}:", file.file);
            }

            if file.references.is_empty() {
                println!("{}(no assembly references)", if nested { "  " } else { "" });
                continue;
            }

            let mut table = ReferenceTable::new().nested(nested);
            for reference in &file.references {
                table.push(
                    reference.row,
                    &reference.name,
                    &reference.version,
                    reference.culture.as_deref(),
                );
            }
            for line in table.render() {
                println!("{line}");
            }
        }
    })
}
