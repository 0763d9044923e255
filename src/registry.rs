//! Forward-reference registries.
//!
//! Both registries follow a strict write-phase/read-phase split: the class
//! registry is fully populated before any name resolution runs, and the enum
//! registry is fully populated before declarations are assembled. They are
//! plain context objects handed through the pipeline, never globals.

use crate::model::{Section, Table};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Dotted path ending in an ALL-CAPS constant token, e.g. `sublime.DIALOG_CANCEL`.
static RE_ENUM_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*\.[A-Z][A-Z0-9_]+)\b").unwrap()
});

/// Class paths registered during pass 1, read by the name resolver afterwards.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    paths: Vec<Vec<String>>,
}

impl ClassRegistry {
    pub fn register(&mut self, path: &[String]) {
        self.paths.push(path.to_vec());
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.paths.iter().map(Vec::as_slice)
    }
}

/// Dotted enum-constant paths, de-duplicated, in first-seen order.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl EnumRegistry {
    /// Scan every description cell of a section's tables for constant
    /// references.
    pub fn scan_section(&mut self, section: &Section) {
        for table in &section.tables {
            self.scan_table(table);
        }
    }

    fn scan_table(&mut self, table: &Table) {
        let Some(col) = table.columns.iter().position(|c| c == "description") else {
            return;
        };
        for row in &table.rows {
            let Some(cell) = row.get(col) else { continue };
            for caps in RE_ENUM_REF.captures_iter(cell) {
                let path = caps[1].to_string();
                if self.seen.insert(path.clone()) {
                    self.paths.push(path);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}
