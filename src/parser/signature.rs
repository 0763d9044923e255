//! Free-text method/constructor signature parser.
//!
//! Signatures look like `run_command(string, <args>)` — optional arguments
//! are wrapped in `<...>`, array arguments in `[...]`. There is no per-row
//! recovery: a cell that is neither call-shaped nor the "no methods" sentinel
//! means the document no longer matches the assumed grammar, and guessing
//! would risk silently wrong output.

use crate::model::ArgSpec;
use crate::parser::typeexpr::{resolve_name, strip_brackets};
use crate::registry::ClassRegistry;
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\s*\(([^)]*)\)").unwrap());

/// Reserved words of the declaration target. Argument names that collide are
/// escaped with a leading underscore so the emitted file stays parseable.
const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

#[derive(Debug, PartialEq)]
pub struct ParsedSignature {
    pub name: String,
    pub args: Vec<ArgSpec>,
}

/// Parse a signature cell. `Ok(None)` is the "no methods" placeholder row.
pub fn parse_signature(text: &str, classes: &ClassRegistry) -> Result<Option<ParsedSignature>> {
    let Some(caps) = RE_CALL.captures(text) else {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if normalized == "no methods" {
            return Ok(None);
        }
        bail!("cannot parse method signature: {:?}", text);
    };

    let name = caps[1].to_string();
    let mut args = Vec::new();
    let list = caps[2].trim();
    if !list.is_empty() {
        for token in list.split(',') {
            args.push(parse_argument(token.trim(), classes)?);
        }
    }
    Ok(Some(ParsedSignature { name, args }))
}

fn parse_argument(token: &str, classes: &ClassRegistry) -> Result<ArgSpec> {
    let optional = token.contains('<') || token.contains('>');
    let without_markers: String = token.chars().filter(|c| *c != '<' && *c != '>').collect();

    let (name, depth) = strip_brackets(without_markers.trim())?;
    let name = name.trim();

    // Resolve on the documented name, then escape for the target language.
    let ty = resolve_name(name, classes).arrayed(depth);
    let name = if RESERVED.contains(&name) {
        format!("_{}", name)
    } else {
        name.to_string()
    };

    Ok(ArgSpec {
        name,
        optional,
        array_depth: depth,
        ty,
    })
}
