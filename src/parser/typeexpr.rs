//! Type expression parser and name-based type resolver.
//!
//! Documentation type text is free-form: `[int]`, `(x, y)`, `String or None`.
//! The parser tries the structured forms in a fixed priority order — array
//! stripping, tuple, alternation, bare identifier — because the surface
//! syntax of the earlier forms would otherwise be mis-tokenized by the later
//! ones. Anything unrecognized degrades to `any` with a warning.

use crate::model::{Prim, TypeDesc};
use crate::registry::ClassRegistry;
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_TUPLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\((.*)\)$").unwrap());

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*$").unwrap());

/// Parse a free-text type string into a canonical descriptor.
///
/// Empty text means an undocumented return value and resolves to `void`
/// without a warning.
pub fn parse_type(text: &str, classes: &ClassRegistry) -> Result<TypeDesc> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(TypeDesc::Prim(Prim::Void));
    }

    let (inner, depth) = strip_brackets(trimmed)?;
    let ty = parse_unwrapped(inner.trim(), classes)?;
    Ok(ty.arrayed(depth))
}

fn parse_unwrapped(inner: &str, classes: &ClassRegistry) -> Result<TypeDesc> {
    if let Some(caps) = RE_TUPLE.captures(inner) {
        let mut items = Vec::new();
        for part in caps[1].split(',') {
            items.push(parse_type(part, classes)?);
        }
        return Ok(TypeDesc::Tuple(items));
    }

    if let Some(ty) = parse_alternation(inner, classes)? {
        return Ok(ty);
    }

    if RE_IDENT.is_match(inner) {
        return Ok(resolve_name(inner, classes));
    }

    eprintln!("warning: cannot parse type {:?}, falling back to any", inner);
    Ok(TypeDesc::Any)
}

/// Human-written alternation: `A, B or Z`. Only the two-way `X or None`
/// shape is resolvable (as a nullable X); everything else falls through.
fn parse_alternation(inner: &str, classes: &ClassRegistry) -> Result<Option<TypeDesc>> {
    let Some((head, tail)) = inner.rsplit_once(" or ") else {
        return Ok(None);
    };
    let mut alternatives: Vec<&str> = head.split(',').map(str::trim).collect();
    alternatives.push(tail.trim());

    if alternatives.len() == 2 {
        if let Some(i) = alternatives
            .iter()
            .position(|a| a.eq_ignore_ascii_case("none"))
        {
            let other = alternatives[1 - i];
            return Ok(Some(TypeDesc::Nullable(Box::new(parse_type(
                other, classes,
            )?))));
        }
    }
    Ok(None)
}

/// Strip matching leading `[` / trailing `]` pairs, returning the inner text
/// and the stripped depth. Mismatched counts are fatal.
pub fn strip_brackets(text: &str) -> Result<(&str, usize)> {
    let lead = text.bytes().take_while(|&b| b == b'[').count();
    let trail = text.bytes().rev().take_while(|&b| b == b']').count();
    if lead != trail {
        bail!("mismatched array brackets in {:?}", text);
    }
    Ok((&text[lead..text.len() - trail], lead))
}

// -- Name-based resolution ----------------------------------------------------

const STRING_SUFFIXES: &[&str] = &[
    "string", "str", "text", "title", "name", "prefix", "suffix", "key",
];

const INT_SUFFIXES: &[&str] = &[
    "idx", "index", "limit", "timestamp", "point", "delay", "row", "col", "width", "height",
    "depth",
];

const BOOL_SUFFIXES: &[&str] = &["flag", "bool", "enabled"];

/// Ordered suffix decision table: first matching rule wins. The order is a
/// contract — e.g. a plural name containing "flag" is an integer bitmask,
/// while a singular `*_flag` is a boolean.
static SUFFIX_RULES: &[(fn(&str) -> bool, fn() -> TypeDesc)] = &[
    (
        |n| ends_with_any(n, STRING_SUFFIXES),
        || TypeDesc::Prim(Prim::Str),
    ),
    (
        |n| ends_with_any(n, INT_SUFFIXES) || (n.ends_with('s') && n.contains("flag")),
        || TypeDesc::Prim(Prim::Int),
    ),
    (
        |n| ends_with_any(n, BOOL_SUFFIXES),
        || TypeDesc::Prim(Prim::Bool),
    ),
    (
        |n| n.ends_with("callback") || n.starts_with("on"),
        || TypeDesc::Callback,
    ),
    (|n| n.ends_with("arg"), TypeDesc::string_map),
    (|n| n.ends_with("pattern"), || TypeDesc::Regex),
];

fn ends_with_any(name: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| name.ends_with(s))
}

/// Strip one trailing plural `s`.
pub fn singularize(name: &str) -> &str {
    if name.len() > 1 && name.ends_with('s') {
        &name[..name.len() - 1]
    } else {
        name
    }
}

/// Infer a type from a bare identifier alone.
///
/// Resolution order: fixed lookup of well-known documentation names, match
/// against the registered class names, then the suffix decision table. The
/// class registry must be fully populated before this runs.
pub fn resolve_name(name: &str, classes: &ClassRegistry) -> TypeDesc {
    let folded = name.to_lowercase();
    let singular = singularize(&folded);

    if let Some(ty) = builtin_lookup(singular) {
        return ty;
    }

    if let Some(path) = class_lookup(singular, classes) {
        return TypeDesc::Named(path);
    }

    for (applies, make) in SUFFIX_RULES {
        if applies(&folded) {
            return make();
        }
    }

    eprintln!("warning: cannot infer a type for {:?}, falling back to any", name);
    TypeDesc::Any
}

/// Well-known documentation names, matched on the singular form.
fn builtin_lookup(singular: &str) -> Option<TypeDesc> {
    let ty = match singular {
        "str" | "string" => TypeDesc::Prim(Prim::Str),
        "int" => TypeDesc::Prim(Prim::Int),
        "float" => TypeDesc::Prim(Prim::Float),
        "bool" => TypeDesc::Prim(Prim::Bool),
        "byte" => TypeDesc::Prim(Prim::Bytes),
        "none" => TypeDesc::Prim(Prim::Void),
        "dict" | "arg" => TypeDesc::string_map(),
        "value" => TypeDesc::Any,
        _ => return None,
    };
    Some(ty)
}

/// Match the singularized name against a registered class name, yielding a
/// reference to that class's full path.
fn class_lookup(singular: &str, classes: &ClassRegistry) -> Option<Vec<String>> {
    let wanted = singular.rsplit('.').next().unwrap_or(singular);
    classes
        .iter()
        .find(|path| {
            path.last()
                .map(|last| singularize(&last.to_lowercase()) == wanted)
                .unwrap_or(false)
        })
        .map(|path| path.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> ClassRegistry {
        let mut reg = ClassRegistry::default();
        reg.register(&["sublime".into(), "Window".into()]);
        reg.register(&["sublime".into(), "Settings".into()]);
        reg
    }

    fn parse(text: &str) -> TypeDesc {
        parse_type(text, &classes()).unwrap()
    }

    #[test]
    fn bare_builtins() {
        assert_eq!(parse("String"), TypeDesc::Prim(Prim::Str));
        assert_eq!(parse("int"), TypeDesc::Prim(Prim::Int));
        assert_eq!(parse("bool"), TypeDesc::Prim(Prim::Bool));
        assert_eq!(parse("None"), TypeDesc::Prim(Prim::Void));
        assert_eq!(parse("bytes"), TypeDesc::Prim(Prim::Bytes));
        assert_eq!(parse("dict"), TypeDesc::string_map());
    }

    #[test]
    fn array_depth_matches_bracket_count() {
        assert_eq!(
            parse("[int]"),
            TypeDesc::Prim(Prim::Int).arrayed(1)
        );
        assert_eq!(
            parse("[[String]]"),
            TypeDesc::Prim(Prim::Str).arrayed(2)
        );
    }

    #[test]
    fn mismatched_brackets_are_fatal() {
        assert!(parse_type("[int", &classes()).is_err());
        assert!(parse_type("int]]", &classes()).is_err());
    }

    #[test]
    fn or_none_is_nullable_either_way() {
        let expected = TypeDesc::Nullable(Box::new(TypeDesc::Prim(Prim::Str)));
        assert_eq!(parse("String or None"), expected);
        assert_eq!(parse("None or String"), expected);
    }

    #[test]
    fn other_alternations_fall_back_to_any() {
        assert_eq!(parse("String or int"), TypeDesc::Any);
        assert_eq!(parse("a, b or None"), TypeDesc::Any);
    }

    #[test]
    fn tuple_of_resolved_types() {
        assert_eq!(
            parse("(int, int, String)"),
            TypeDesc::Tuple(vec![
                TypeDesc::Prim(Prim::Int),
                TypeDesc::Prim(Prim::Int),
                TypeDesc::Prim(Prim::Str),
            ])
        );
    }

    #[test]
    fn array_of_tuples() {
        assert_eq!(
            parse("[(int, int)]"),
            TypeDesc::Tuple(vec![TypeDesc::Prim(Prim::Int), TypeDesc::Prim(Prim::Int)])
                .arrayed(1)
        );
    }

    #[test]
    fn registry_match_after_depluralization() {
        assert_eq!(
            resolve_name("windows", &classes()),
            TypeDesc::Named(vec!["sublime".into(), "Window".into()])
        );
        // Class names ending in `s` are singularized on both sides.
        assert_eq!(
            resolve_name("settings", &classes()),
            TypeDesc::Named(vec!["sublime".into(), "Settings".into()])
        );
    }

    #[test]
    fn suffix_rule_order_is_observable() {
        let reg = ClassRegistry::default();
        // Plural + contains "flag" hits the integer rule first.
        assert_eq!(resolve_name("flags", &reg), TypeDesc::Prim(Prim::Int));
        // Singular suffix "flag" is a boolean.
        assert_eq!(resolve_name("enabled_flag", &reg), TypeDesc::Prim(Prim::Bool));
    }

    #[test]
    fn suffix_rules() {
        let reg = ClassRegistry::default();
        assert_eq!(resolve_name("file_name", &reg), TypeDesc::Prim(Prim::Str));
        assert_eq!(resolve_name("start_idx", &reg), TypeDesc::Prim(Prim::Int));
        assert_eq!(resolve_name("delay", &reg), TypeDesc::Prim(Prim::Int));
        assert_eq!(resolve_name("on_done", &reg), TypeDesc::Callback);
        assert_eq!(resolve_name("callback", &reg), TypeDesc::Callback);
        assert_eq!(resolve_name("args", &reg), TypeDesc::string_map());
        assert_eq!(resolve_name("extra_arg", &reg), TypeDesc::string_map());
        assert_eq!(resolve_name("file_pattern", &reg), TypeDesc::Regex);
    }

    #[test]
    fn unknown_name_falls_back_to_any() {
        assert_eq!(resolve_name("a", &ClassRegistry::default()), TypeDesc::Any);
    }

    #[test]
    fn empty_type_text_is_void() {
        assert_eq!(parse(""), TypeDesc::Prim(Prim::Void));
        assert_eq!(parse("   "), TypeDesc::Prim(Prim::Void));
    }
}
