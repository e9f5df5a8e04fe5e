//! Rendering of command results on stdout.

use comfy_table::{presets, CellAlignment, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Culture column value for references without a culture.
const NEUTRAL: &str = "neutral";

/// Writes `value` as pretty JSON under `--json`, otherwise hands it to `plain`.
pub fn emit<T: Serialize>(value: &T, opts: &GlobalOptions, plain: impl FnOnce(&T)) -> anyhow::Result<()> {
    if !opts.json {
        plain(value);
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Borderless table of the `AssemblyRef` rows of one image.
///
/// Columns are `Row`, `Name`, `Version` and `Culture`, separated by two spaces, with the row
/// number right-aligned.
pub struct ReferenceTable {
    table: Table,
    indent: &'static str,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceTable {
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        table.set_header(["Row", "Name", "Version", "Culture"]);

        for (index, column) in table.column_iter_mut().enumerate() {
            column.set_padding((u16::from(index > 0), u16::from(index < 3)));
        }
        if let Some(column) = table.column_mut(0) {
            column.set_cell_alignment(CellAlignment::Right);
        }

        ReferenceTable { table, indent: "" }
    }

    /// Indents every line, used when several files are listed one after another.
    pub fn nested(mut self, nested: bool) -> Self {
        self.indent = if nested { "  " } else { "" };
        self
    }

    pub fn push(&mut self, row: usize, name: &str, version: &str, culture: Option<&str>) {
        self.table.add_row([
            row.to_string(),
            name.to_string(),
            version.to_string(),
            culture.unwrap_or(NEUTRAL).to_string(),
        ]);
    }

    pub fn render(&self) -> Vec<String> {
        self.table
            .to_string()
            .lines()
            .map(|line| format!("{}{}", self.indent, line.trim_end()))
            .collect()
    }
}
