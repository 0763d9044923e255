//! externgen — generate typed declaration files from a semi-structured HTML
//! API reference.
//!
//! Two modes:
//!
//! - **stdin mode**: `externgen < api.html` prints every declaration to stdout
//! - **source mode**: `externgen https://example.org/api -o externs/` fetches
//!   (or reads) the document and writes one declaration file per documented
//!   class or module, under the package path.

mod assemble;
mod model;
mod parser;
mod registry;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use scraper::Html;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "externgen",
    about = "Generate typed declaration files from an HTML API reference"
)]
struct Cli {
    /// HTML file path or http(s) URL. If omitted, reads the document from stdin.
    source: Option<String>,

    /// Output directory (required when a source is given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: typescript (default), json
    #[arg(short = 'f', long, default_value = "typescript")]
    format: String,

    /// Heading tag anchoring a class/module section
    #[arg(long, default_value = "h2")]
    heading: String,

    /// Cache file for a fetched URL, reused on later runs when present
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.source.as_deref() {
        None => stdin_mode(&cli),
        Some(source) => source_mode(&cli, source),
    }
}

/// stdin mode: read HTML from stdin, print declarations to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let decls = compile_document(&input, &cli.heading)?;
    let renderer = render::create_renderer(&cli.format)?;
    for decl in &decls {
        print!("{}", renderer.render(decl));
    }
    Ok(())
}

/// source mode: read or fetch the document, write one file per declaration.
fn source_mode(cli: &Cli, source: &str) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when a source is given")?;

    let html = load_document(source, cli.cache.as_deref())?;
    let decls = compile_document(&html, &cli.heading)?;
    let renderer = render::create_renderer(&cli.format)?;

    for decl in &decls {
        let mut dir = output_dir.to_path_buf();
        for segment in &decl.package {
            dir.push(segment);
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

        let path = dir.join(format!("{}.{}", decl.name, renderer.file_extension()));
        fs::write(&path, renderer.render(decl))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Run the whole compile pipeline over one HTML document.
fn compile_document(html: &str, heading: &str) -> Result<Vec<model::TypeDecl>> {
    let doc = Html::parse_document(html);
    let sections = parser::segment::segment(&doc, heading)?;
    assemble::compile(&sections)
}

/// Obtain the raw document: local file, or URL with an optional cache file.
fn load_document(source: &str, cache: Option<&Path>) -> Result<String> {
    if !is_url(source) {
        return fs::read_to_string(source).with_context(|| format!("failed to read {}", source));
    }

    if let Some(cache) = cache {
        if cache.is_file() {
            return fs::read_to_string(cache)
                .with_context(|| format!("failed to read cache file {}", cache.display()));
        }
    }

    let body = ureq::get(source)
        .call()
        .with_context(|| format!("failed to fetch {}", source))?
        .into_string()
        .context("failed to read response body")?;

    if let Some(cache) = cache {
        if let Some(parent) = cache.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create cache directory: {}", parent.display())
                })?;
            }
        }
        fs::write(cache, &body)
            .with_context(|| format!("failed to write cache file {}", cache.display()))?;
    }
    Ok(body)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
