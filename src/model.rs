//! Data model for the documentation-to-declaration pipeline — format-agnostic.
//!
//! Everything downstream of the HTML parse flows through these types: raw
//! `Section`/`Table` records on the input side, `TypeDecl` records on the
//! output side. Renderers only ever see `TypeDecl`.

use serde::Serialize;

/// What kind of thing a documentation section describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Class,
    Module,
}

/// One documented class or module: a title plus the tables that follow it.
#[derive(Debug)]
pub struct Section {
    pub kind: SectionKind,
    /// Dotted title name split into segments. Never empty.
    pub path: Vec<String>,
    pub tables: Vec<Table>,
}

/// A normalized documentation table.
#[derive(Debug)]
pub struct Table {
    /// Header cells, trimmed and lowercased. Determines the parsing rule.
    pub columns: Vec<String>,
    /// Body rows, cell text case-preserved.
    pub rows: Vec<Vec<String>>,
}

/// Primitive type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Prim {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
    Void,
}

/// Canonical, target-agnostic type descriptor. Arbitrarily nestable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum TypeDesc {
    Any,
    Prim(Prim),
    Nullable(Box<TypeDesc>),
    Array(Box<TypeDesc>),
    Tuple(Vec<TypeDesc>),
    /// Reference to a documented class by its full dotted path.
    Named(Vec<String>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// Single-argument callback.
    Callback,
    Regex,
}

impl TypeDesc {
    /// String-keyed map of anything — what loose "dict"/"args" docs mean.
    pub fn string_map() -> TypeDesc {
        TypeDesc::Map(
            Box::new(TypeDesc::Prim(Prim::Str)),
            Box::new(TypeDesc::Any),
        )
    }

    /// Wrap in `Array` `depth` times.
    pub fn arrayed(self, depth: usize) -> TypeDesc {
        let mut ty = self;
        for _ in 0..depth {
            ty = TypeDesc::Array(Box::new(ty));
        }
        ty
    }
}

/// One parsed method/constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgSpec {
    pub name: String,
    pub optional: bool,
    /// Bracket depth from the signature text. `ty` is already wrapped.
    pub array_depth: usize,
    pub ty: TypeDesc,
}

/// A method signature — also the payload carried by overload entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSig {
    pub args: Vec<ArgSpec>,
    pub ret: TypeDesc,
}

/// What a field is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    Method(MethodSig),
    Constructor { args: Vec<ArgSpec> },
    Property { ty: TypeDesc },
    /// Synthesized integer constant from an enum reference in description text.
    EnumConst,
}

/// One field of a generated declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub doc: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub is_static: bool,
    /// Alternate signatures merged in by the overload deduplicator.
    pub overloads: Vec<MethodSig>,
}

impl FieldDef {
    pub fn new(name: String, doc: String, kind: FieldKind, is_static: bool) -> FieldDef {
        FieldDef {
            name,
            doc,
            kind,
            is_static,
            overloads: Vec::new(),
        }
    }
}

/// The generated output unit: one class/module with its full field set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub kind: SectionKind,
    /// Leading path segments ("sublime" for `sublime.Region`). May be empty.
    pub package: Vec<String>,
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl TypeDecl {
    /// Full dotted identity: package segments plus name.
    pub fn full_path(&self) -> Vec<&str> {
        self.package
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrayed_wraps_n_times() {
        let ty = TypeDesc::Prim(Prim::Int).arrayed(2);
        assert_eq!(
            ty,
            TypeDesc::Array(Box::new(TypeDesc::Array(Box::new(TypeDesc::Prim(
                Prim::Int
            )))))
        );
    }

    #[test]
    fn full_path_joins_package_and_name() {
        let decl = TypeDecl {
            kind: SectionKind::Class,
            package: vec!["sublime".into()],
            name: "Region".into(),
            fields: Vec::new(),
        };
        assert_eq!(decl.full_path(), vec!["sublime", "Region"]);
    }
}
