//! `apiref build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use apiref_config::{CaseSensitivity, CliSettings, Config};
use apiref_core::{Pipeline, PipelineConfig};
use apiref_format::{FormatKind, formatter, probe_case_sensitivity};
use apiref_render::{MarkdownRenderer, RenderedPage};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover apiref.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON declaration tree (overrides config).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: plain, mdbook or hugo (overrides config).
    #[arg(short, long)]
    format: Option<FormatKind>,

    /// Restructure the tree according to "Exports:" directives.
    #[arg(long)]
    exports: bool,

    /// Fail on unresolved references.
    #[arg(long, env = "APIREF_STRICT")]
    strict: bool,

    /// Use the last path segment as link text.
    #[arg(long)]
    short_links: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            input: self.input,
            output_dir: self.output,
            format: self.format,
            exports: self.exports.then_some(true),
            strict: self.strict.then_some(true),
            short_links: self.short_links.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let out_dir = &config.output_resolved.dir;

        output.info(&format!(
            "Input: {}",
            config.source_resolved.input.display()
        ));
        output.info(&format!("Output: {}", out_dir.display()));

        let docs = apiref_doc::load(&config.source_resolved.input)?;
        let case_sensitive = match config.output_resolved.case_sensitivity {
            CaseSensitivity::Auto => probe_case_sensitivity(out_dir)?,
            CaseSensitivity::Sensitive => true,
            CaseSensitivity::Insensitive => false,
        };
        tracing::debug!(case_sensitive, "Resolved output case sensitivity");

        let pipeline = Pipeline::new(PipelineConfig {
            exports: config.links.exports,
            strict: config.links.strict,
            short_links: config.links.short_links,
            case_sensitive,
        });
        let document = pipeline.run(docs)?;

        let formatter = formatter(config.output_resolved.format, case_sensitive);
        let rendered = MarkdownRenderer::new(&document, formatter.as_ref()).render()?;

        write_pages(out_dir, &rendered.pages)?;

        let warnings = document.diagnostics.len() + rendered.diagnostics.len();
        if warnings > 0 {
            output.warning(&format!("{warnings} reference(s) could not be resolved"));
        }
        output.success(&format!(
            "Wrote {} files to {}",
            rendered.pages.len(),
            out_dir.display()
        ));
        Ok(())
    }
}

/// Write rendered pages under `dir`, creating directories as needed.
fn write_pages(dir: &Path, pages: &[RenderedPage]) -> Result<(), CliError> {
    for page in pages {
        let path = dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.content)?;
    }
    Ok(())
}
