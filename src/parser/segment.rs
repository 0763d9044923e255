//! Document segmenter and table normalizer.
//!
//! Splits the parsed HTML tree into ordered sections. A section is anchored
//! by a heading whose text matches `<dotted name> Class|Module`; the tables
//! that immediately follow the heading belong to it. The first sibling that
//! is neither a table nor whitespace ends the section (another heading ends
//! it without being consumed — it anchors its own section).

use crate::model::{Section, SectionKind, Table};
use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*)\s+(Class|Module)$").unwrap()
});

static SEL_TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

static SEL_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());

/// Split a parsed document into sections, in document order.
pub fn segment(doc: &Html, heading_tag: &str) -> Result<Vec<Section>> {
    let heading = Selector::parse(heading_tag)
        .map_err(|e| anyhow!("invalid heading selector {:?}: {}", heading_tag, e))?;

    let mut sections = Vec::new();
    for title in doc.select(&heading) {
        let text = element_text(&title);
        let Some(caps) = RE_TITLE.captures(&text) else {
            eprintln!("warning: skipping section with unrecognized title: {:?}", text);
            continue;
        };

        let kind = match &caps[2] {
            "Class" => SectionKind::Class,
            _ => SectionKind::Module,
        };
        let path: Vec<String> = caps[1].split('.').map(str::to_string).collect();

        let mut tables = Vec::new();
        for node in title.next_siblings() {
            // Whitespace text nodes between tags are not section boundaries.
            let Some(el) = ElementRef::wrap(node) else { continue };
            if !el.value().name().eq_ignore_ascii_case("table") {
                break;
            }
            if let Some(table) = normalize_table(&el) {
                tables.push(table);
            }
        }

        sections.push(Section { kind, path, tables });
    }
    Ok(sections)
}

/// Normalize a `<table>` element into columns + rows.
///
/// The first row is the header; its cells are lowercased to form the column
/// signature. Body cells keep their case for the signature/type parsers.
fn normalize_table(table: &ElementRef) -> Option<Table> {
    let mut trs = table.select(&SEL_TR);
    let header = match trs.next() {
        Some(h) => h,
        None => {
            eprintln!("warning: skipping table with no header row");
            return None;
        }
    };

    let columns: Vec<String> = header
        .select(&SEL_CELL)
        .map(|cell| element_text(&cell).to_lowercase())
        .collect();

    let rows: Vec<Vec<String>> = trs
        .map(|tr| tr.select(&SEL_CELL).map(|cell| element_text(&cell)).collect())
        .collect();

    Some(Table { columns, rows })
}

/// All text under an element, with runs of whitespace collapsed to one space.
/// HTML sources wrap cell text freely, so raw text is full of newlines.
fn element_text(el: &ElementRef) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
