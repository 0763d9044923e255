//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod typescript;

use crate::model::TypeDecl;
use anyhow::{anyhow, Result};

/// Trait for rendering one declaration into a specific output format.
pub trait Renderer {
    fn render(&self, decl: &TypeDecl) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "typescript" | "ts" => Ok(Box::new(typescript::TypeScriptRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use typescript or json",
            format
        )),
    }
}
