//! JSON renderer — structured output for tooling integration.

use crate::model::TypeDecl;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, decl: &TypeDecl) -> String {
        // The model contains only string-keyed, serializable data.
        let mut out = serde_json::to_string_pretty(decl)
            .expect("declaration model serializes to JSON");
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
