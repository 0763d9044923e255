//! Ambient TypeScript declaration renderer.
//!
//! Modules become `declare namespace` blocks, classes become `class` blocks
//! nested in their package namespace. Overload signatures render as extra
//! declaration lines, which is native TypeScript overload syntax.

use crate::model::{ArgSpec, FieldDef, FieldKind, MethodSig, Prim, SectionKind, TypeDecl, TypeDesc};
use crate::render::Renderer;

pub struct TypeScriptRenderer;

impl Renderer for TypeScriptRenderer {
    fn render(&self, decl: &TypeDecl) -> String {
        match decl.kind {
            SectionKind::Module => render_module(decl),
            SectionKind::Class => render_class(decl),
        }
    }

    fn file_extension(&self) -> &str {
        "d.ts"
    }
}

fn render_module(decl: &TypeDecl) -> String {
    let namespace = decl
        .package
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(decl.name.as_str()))
        .collect::<Vec<_>>()
        .join(".");

    let mut lines = vec![format!("declare namespace {} {{", namespace)];
    for field in &decl.fields {
        push_doc(&mut lines, field, "    ");
        match &field.kind {
            FieldKind::Method(sig) => {
                lines.push(function_line(&field.name, sig, "    "));
                for overload in &field.overloads {
                    lines.push(function_line(&field.name, overload, "    "));
                }
            }
            FieldKind::Property { ty } => {
                lines.push(format!("    let {}: {};", field.name, ts_type(ty)));
            }
            FieldKind::EnumConst => {
                lines.push(format!("    const {}: number;", field.name));
            }
            // Modules have no constructors.
            FieldKind::Constructor { .. } => {}
        }
    }
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn render_class(decl: &TypeDecl) -> String {
    let mut lines = Vec::new();
    let indent = if decl.package.is_empty() {
        lines.push(format!("declare class {} {{", decl.name));
        "    "
    } else {
        lines.push(format!("declare namespace {} {{", decl.package.join(".")));
        lines.push(format!("    class {} {{", decl.name));
        "        "
    };

    for field in &decl.fields {
        push_doc(&mut lines, field, indent);
        let prefix = if field.is_static { "static " } else { "" };
        match &field.kind {
            FieldKind::Constructor { args } => {
                lines.push(format!("{}constructor({});", indent, render_args(args)));
            }
            FieldKind::Method(sig) => {
                lines.push(method_line(&field.name, sig, indent, prefix));
                for overload in &field.overloads {
                    lines.push(method_line(&field.name, overload, indent, prefix));
                }
            }
            FieldKind::Property { ty } => {
                lines.push(format!("{}{}{}: {};", indent, prefix, field.name, ts_type(ty)));
            }
            FieldKind::EnumConst => {
                lines.push(format!("{}static {}: number;", indent, field.name));
            }
        }
    }

    if decl.package.is_empty() {
        lines.push("}".to_string());
    } else {
        lines.push("    }".to_string());
        lines.push("}".to_string());
    }
    lines.push(String::new());
    lines.join("\n")
}

fn push_doc(lines: &mut Vec<String>, field: &FieldDef, indent: &str) {
    if !field.doc.is_empty() {
        lines.push(format!("{}/** {} */", indent, field.doc));
    }
}

fn function_line(name: &str, sig: &MethodSig, indent: &str) -> String {
    format!(
        "{}function {}({}): {};",
        indent,
        name,
        render_args(&sig.args),
        ts_type(&sig.ret)
    )
}

fn method_line(name: &str, sig: &MethodSig, indent: &str, prefix: &str) -> String {
    format!(
        "{}{}{}({}): {};",
        indent,
        prefix,
        name,
        render_args(&sig.args),
        ts_type(&sig.ret)
    )
}

fn render_args(args: &[ArgSpec]) -> String {
    args.iter()
        .map(|arg| {
            let marker = if arg.optional { "?" } else { "" };
            format!("{}{}: {}", arg.name, marker, ts_type(&arg.ty))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map a canonical descriptor to TypeScript type syntax.
pub fn ts_type(ty: &TypeDesc) -> String {
    match ty {
        TypeDesc::Any => "any".to_string(),
        TypeDesc::Prim(p) => match p {
            Prim::Str => "string",
            Prim::Int | Prim::Float => "number",
            Prim::Bool => "boolean",
            Prim::Bytes => "Uint8Array",
            Prim::Void => "void",
        }
        .to_string(),
        TypeDesc::Nullable(inner) => format!("{} | null", ts_type(inner)),
        TypeDesc::Array(inner) => {
            let inner = ts_type(inner);
            // Unions and function types need grouping inside an array.
            if inner.contains('|') || inner.contains("=>") {
                format!("({})[]", inner)
            } else {
                format!("{}[]", inner)
            }
        }
        TypeDesc::Tuple(items) => {
            let items: Vec<String> = items.iter().map(ts_type).collect();
            format!("[{}]", items.join(", "))
        }
        TypeDesc::Named(path) => path.join("."),
        TypeDesc::Map(_, value) => format!("{{ [key: string]: {} }}", ts_type(value)),
        TypeDesc::Callback => "(arg: any) => any".to_string(),
        TypeDesc::Regex => "RegExp".to_string(),
    }
}
