//! Declaration assembly — the pipeline driver.
//!
//! Phases run strictly in order over the full section list: class-path
//! registration, enum extraction, per-section field assembly (reading the
//! frozen class registry), enum injection, overload merging. The phase
//! barrier is what lets one section reference a class documented later.

use crate::model::{FieldDef, FieldKind, MethodSig, Section, SectionKind, Table, TypeDecl};
use crate::parser::{signature, typeexpr};
use crate::registry::{ClassRegistry, EnumRegistry};
use anyhow::{bail, Result};

/// Compile segmented sections into finished type declarations.
pub fn compile(sections: &[Section]) -> Result<Vec<TypeDecl>> {
    let mut classes = ClassRegistry::default();
    for section in sections {
        if section.kind == SectionKind::Class {
            classes.register(&section.path);
        }
    }

    let mut enums = EnumRegistry::default();
    for section in sections {
        enums.scan_section(section);
    }

    let mut decls = Vec::new();
    for section in sections {
        if let Some(decl) = assemble_section(section, &classes)? {
            decls.push(decl);
        }
    }

    inject_enums(&mut decls, &enums);

    for decl in &mut decls {
        merge_overloads(decl);
    }
    Ok(decls)
}

/// Build one declaration from a section. Sections that generate no fields
/// produce no declaration at all.
fn assemble_section(section: &Section, classes: &ClassRegistry) -> Result<Option<TypeDecl>> {
    let mut fields = Vec::new();
    for table in &section.tables {
        assemble_table(section, table, classes, &mut fields)?;
    }
    if fields.is_empty() {
        return Ok(None);
    }

    let Some((name, package)) = section.path.split_last() else {
        return Ok(None);
    };
    Ok(Some(TypeDecl {
        kind: section.kind,
        package: package.to_vec(),
        name: name.clone(),
        fields,
    }))
}

/// Dispatch one table by its exact column signature.
fn assemble_table(
    section: &Section,
    table: &Table,
    classes: &ClassRegistry,
    fields: &mut Vec<FieldDef>,
) -> Result<()> {
    let columns: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    match columns.as_slice() {
        ["methods", "return value", "description"] => {
            method_fields(section, table, classes, fields, false)
        }
        ["class methods", "return value", "description"] => {
            method_fields(section, table, classes, fields, true)
        }
        ["constructors", "description"] => constructor_field(section, table, classes, fields),
        ["properties", "type", "description"] => property_fields(section, table, classes, fields),
        _ => {
            eprintln!(
                "warning: skipping table with unrecognized columns {:?} in {}",
                table.columns,
                section.path.join(".")
            );
            Ok(())
        }
    }
}

fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn method_fields(
    section: &Section,
    table: &Table,
    classes: &ClassRegistry,
    fields: &mut Vec<FieldDef>,
    class_table: bool,
) -> Result<()> {
    // Module-level functions and explicit class-method rows are static.
    let is_static = class_table || section.kind == SectionKind::Module;
    for row in &table.rows {
        let Some(sig) = signature::parse_signature(cell(row, 0), classes)? else {
            continue;
        };
        let ret = typeexpr::parse_type(cell(row, 1), classes)?;
        fields.push(FieldDef::new(
            sig.name,
            cell(row, 2).to_string(),
            FieldKind::Method(MethodSig { args: sig.args, ret }),
            is_static,
        ));
    }
    Ok(())
}

fn constructor_field(
    section: &Section,
    table: &Table,
    classes: &ClassRegistry,
    fields: &mut Vec<FieldDef>,
) -> Result<()> {
    let Some(row) = table.rows.first() else {
        bail!(
            "constructor table for {} has no rows",
            section.path.join(".")
        );
    };
    let Some(sig) = signature::parse_signature(cell(row, 0), classes)? else {
        bail!(
            "constructor table for {} has no signature",
            section.path.join(".")
        );
    };
    fields.push(FieldDef::new(
        "constructor".to_string(),
        cell(row, 1).to_string(),
        FieldKind::Constructor { args: sig.args },
        false,
    ));
    Ok(())
}

fn property_fields(
    section: &Section,
    table: &Table,
    classes: &ClassRegistry,
    fields: &mut Vec<FieldDef>,
) -> Result<()> {
    for row in &table.rows {
        let name = cell(row, 0).rsplit('.').next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }
        let ty = typeexpr::parse_type(cell(row, 1), classes)?;
        fields.push(FieldDef::new(
            name.to_string(),
            cell(row, 2).to_string(),
            FieldKind::Property { ty },
            section.kind == SectionKind::Module,
        ));
    }
    Ok(())
}

// -- Enum injection -----------------------------------------------------------

/// Attach every registered constant to its owning declaration as a static
/// integer field. Owner matching is heuristic: exact dotted identity first,
/// then a retry with the final owner segment capitalized when it isn't
/// already class-cased. Unmatched constants are dropped with a warning.
fn inject_enums(decls: &mut [TypeDecl], enums: &EnumRegistry) {
    for path in enums.iter() {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((constant, owner)) = segments.split_last() else {
            continue;
        };
        let Some(decl) = find_owner(decls, owner) else {
            eprintln!("warning: no declaration owns enum constant {}, dropping it", path);
            continue;
        };
        decl.fields.push(FieldDef::new(
            constant.to_string(),
            String::new(),
            FieldKind::EnumConst,
            true,
        ));
    }
}

fn find_owner<'a>(decls: &'a mut [TypeDecl], owner: &[&str]) -> Option<&'a mut TypeDecl> {
    if let Some(i) = decls.iter().position(|d| d.full_path() == owner) {
        return Some(&mut decls[i]);
    }

    let last = owner.last()?;
    if last.chars().next().is_some_and(|c| c.is_uppercase()) {
        return None;
    }
    let guessed = capitalize(last);
    let i = decls.iter().position(|d| {
        let fp = d.full_path();
        fp.len() == owner.len()
            && fp[..fp.len() - 1] == owner[..owner.len() - 1]
            && fp[fp.len() - 1] == guessed
    })?;
    Some(&mut decls[i])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// -- Overload deduplication ---------------------------------------------------

/// Merge same-named fields: the first occurrence stays canonical, removed
/// method duplicates become overload signatures on it. Iteration is by
/// original index, so "first" is well-defined.
fn merge_overloads(decl: &mut TypeDecl) {
    let fields = std::mem::take(&mut decl.fields);
    let mut kept: Vec<FieldDef> = Vec::new();
    for field in fields {
        if let Some(existing) = kept.iter_mut().find(|f| f.name == field.name) {
            if let FieldKind::Method(sig) = field.kind {
                existing.overloads.push(sig);
            }
            continue;
        }
        kept.push(field);
    }
    decl.fields = kept;
}
