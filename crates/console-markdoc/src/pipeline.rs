//! Pipeline wiring: parse, transform, render behind one entry point.

use crate::parse::{CmarkParser, MarkupParser};
use crate::render::{RenderError, RenderedDoc, TagRegistry};
use crate::transform::{TransformConfig, transform};

/// Three-stage markup pipeline with pluggable collaborators.
///
/// Defaults to the `pulldown-cmark` parser, the base transform config, and
/// the HTML tag registry; each is swappable builder-style.
///
/// # Example
///
/// ```
/// use console_markdoc::{MarkdocPipeline, TagRegistry};
///
/// let pipeline = MarkdocPipeline::new().with_registry(TagRegistry::html().strict());
/// let doc = pipeline.render(Some("# Runbook")).unwrap().unwrap();
/// assert_eq!(doc.html, "<h1>Runbook</h1>");
/// ```
pub struct MarkdocPipeline {
    parser: Box<dyn MarkupParser>,
    config: TransformConfig,
    registry: TagRegistry,
}

impl MarkdocPipeline {
    /// Create a pipeline with the default collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Box::new(CmarkParser::new()),
            config: TransformConfig::base(),
            registry: TagRegistry::html(),
        }
    }

    /// Replace the parse stage.
    #[must_use]
    pub fn with_parser<P: MarkupParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replace the transform config.
    #[must_use]
    pub fn with_config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the tag registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TagRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Run the full pipeline on optional source text.
    ///
    /// Absent or whitespace-only source short-circuits to `Ok(None)` without
    /// invoking parse, transform, or render — missing optional content
    /// fields produce no output rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] from the render stage (strict registries
    /// only).
    pub fn render(&self, source: Option<&str>) -> Result<Option<RenderedDoc>, RenderError> {
        let Some(text) = source else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let ast = self.parser.parse(text);
        let renderables = transform(&ast, &self.config).into_vec();
        let doc = self.registry.render_tree(&renderables)?;
        Ok(Some(doc))
    }
}

impl Default for MarkdocPipeline {
    fn default() -> Self {
        Self::new()
    }
}
