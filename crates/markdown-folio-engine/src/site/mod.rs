//! Batch rendering of a source tree into an output tree.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};

use relative_path::{RelativePath, RelativePathBuf};

use crate::error::DocumentError;
use crate::front_matter::{MetadataDecoder, YamlDecoder};
use crate::io::{self, IoError};
use crate::parsing::{MarkdownParser, PulldownParser};
use crate::pipeline::Pipeline;
use crate::template::{self, PageTemplate, TemplateError};

pub const DEFAULT_OUTPUT_EXTENSION: &str = "htm";

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// What happens when one document fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing document.
    #[default]
    Abort,
    /// Log the failure, skip the document and carry on.
    Continue,
}

/// A document that could not be built.
#[derive(Debug)]
pub struct Failure {
    pub document: RelativePathBuf,
    pub error: SiteError,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    /// Output files written, relative to the output directory.
    pub written: Vec<RelativePathBuf>,
    /// Only ever non-empty under [`FailurePolicy::Continue`].
    pub failed: Vec<Failure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

type SkipFilter = Box<dyn Fn(&RelativePath) -> bool + Send + Sync>;

/// Renders every markdown document under a source directory.
pub struct SiteBuilder<P = PulldownParser, D = YamlDecoder> {
    pipeline: Pipeline<P, D>,
    source_dir: PathBuf,
    output_dir: PathBuf,
    template_dir: PathBuf,
    output_extension: String,
    policy: FailurePolicy,
    skip: Option<SkipFilter>,
}

impl SiteBuilder {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        template_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pipeline: Pipeline::default(),
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            template_dir: template_dir.into(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            policy: FailurePolicy::default(),
            skip: None,
        }
    }
}

impl<P: MarkdownParser, D: MetadataDecoder> SiteBuilder<P, D> {
    /// Replaces the per-document pipeline.
    pub fn with_pipeline<P2, D2>(self, pipeline: Pipeline<P2, D2>) -> SiteBuilder<P2, D2> {
        SiteBuilder {
            pipeline,
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            template_dir: self.template_dir,
            output_extension: self.output_extension,
            policy: self.policy,
            skip: self.skip,
        }
    }

    pub fn output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = extension.into();
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Skips documents, by path relative to the source directory, for which
    /// `filter` returns true.
    pub fn skip_if(
        mut self,
        filter: impl Fn(&RelativePath) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.skip = Some(Box::new(filter));
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let documents = io::scan_markdown_files(&self.source_dir)?;
        log::info!(
            "Building {} document(s) from {} into {}",
            documents.len(),
            self.source_dir.display(),
            self.output_dir.display()
        );

        let mut templates = HashMap::new();
        let mut report = BuildReport::default();

        for document in documents {
            if let Some(skip) = &self.skip
                && skip(&document)
            {
                log::debug!("Skipping excluded {document}");
                continue;
            }

            match self.build_one(&document, &mut templates) {
                Ok(written) => {
                    log::info!("{document} -> {written}");
                    report.written.push(written);
                }
                Err(error) => match self.policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Continue => {
                        log::warn!("Skipping {document}: {error}");
                        report.failed.push(Failure { document, error });
                    }
                },
            }
        }

        Ok(report)
    }

    fn build_one(
        &self,
        document: &RelativePath,
        templates: &mut HashMap<PathBuf, PageTemplate>,
    ) -> Result<RelativePathBuf, SiteError> {
        let raw = io::read_file(document, &self.source_dir)?;
        let page = self.pipeline.render(document.as_str(), &raw)?;

        let template_path = template::resolve(&self.template_dir, document)?;
        let template = match templates.entry(template_path) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::debug!("Loading template {}", entry.key().display());
                let loaded = PageTemplate::from_file(entry.key())?;
                entry.insert(loaded)
            }
        };
        let html = template.render(&page)?;

        let target = io::output_path(document, &self.output_extension);
        io::write_file(&target, &self.output_dir, &html)?;
        Ok(target)
    }
}

impl<P, D> fmt::Debug for SiteBuilder<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteBuilder")
            .field("source_dir", &self.source_dir)
            .field("output_dir", &self.output_dir)
            .field("template_dir", &self.template_dir)
            .field("output_extension", &self.output_extension)
            .field("policy", &self.policy)
            .field("skip", &self.skip.is_some())
            .finish_non_exhaustive()
    }
}
