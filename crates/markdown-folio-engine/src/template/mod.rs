//! # Templating
//!
//! A [`Page`] becomes a complete output file by rendering it through a
//! handlebars template. The page record is the template context:
//!
//! ```handlebars
//! <title>{{front.title}}</title>
//! <main>{{{content}}}</main>
//! ```
//!
//! `content` is already HTML, so templates use the triple-stash form for it.
//!
//! ## Lookup
//!
//! Templates mirror the source tree. A document in source directory `d` uses
//! `<template_dir>/d/index.htm` when it exists, otherwise the closest
//! ancestor's `index.htm`, up to `<template_dir>/index.htm`.

use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use relative_path::RelativePath;

use crate::page::Page;

/// File name looked up in each template directory.
pub const TEMPLATE_FILE: &str = "index.htm";

const NAME: &str = "page";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("no {TEMPLATE_FILE} found for {document} under {root}")]
    NotFound { document: String, root: PathBuf },
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid template {origin}: {source}")]
    Compile {
        origin: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("failed to apply template to {document}: {source}")]
    Apply {
        document: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// One compiled page template.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    registry: Handlebars<'static>,
}

impl PageTemplate {
    /// Compiles a template held in memory. `origin` names it in errors.
    pub fn from_source(origin: &str, source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(NAME, source)
            .map_err(|e| TemplateError::Compile {
                origin: origin.to_string(),
                source: Box::new(e),
            })?;
        Ok(Self { registry })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&path.display().to_string(), &source)
    }

    pub fn render(&self, page: &Page) -> Result<String, TemplateError> {
        self.registry
            .render(NAME, page)
            .map_err(|e| TemplateError::Apply {
                document: page.name.clone(),
                source: Box::new(e),
            })
    }
}

/// Finds the template for `document`, a path relative to the source root.
pub fn resolve(template_dir: &Path, document: &RelativePath) -> Result<PathBuf, TemplateError> {
    let mut dir = document.parent();
    while let Some(current) = dir {
        let candidate = current.join(TEMPLATE_FILE).to_path(template_dir);
        log::trace!("Template candidate {}", candidate.display());
        if candidate.is_file() {
            return Ok(candidate);
        }
        dir = current.parent();
    }

    // a document with no parent component sits at the root
    let root = template_dir.join(TEMPLATE_FILE);
    if root.is_file() {
        return Ok(root);
    }

    Err(TemplateError::NotFound {
        document: document.to_string(),
        root: template_dir.to_path_buf(),
    })
}
