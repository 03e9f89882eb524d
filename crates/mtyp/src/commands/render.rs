//! `mtyp render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mtyp_config::{CliSettings, Config};
use mtyp_diagrams::{
    DOCUMENT_EXTENSIONS, DiagramProcessor, MermaidCli, ProcessReport, resolve_path,
    validate_document_path,
};

use crate::error::CliError;
use crate::output::Output;

/// Rendering options shared by `render` and `browse`.
#[derive(Args, Debug)]
pub(crate) struct ProcessOptions {
    /// Path to configuration file (default: auto-discover mtyp.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mermaid CLI executable (overrides config).
    #[arg(long, env = "MTYP_RENDERER")]
    renderer: Option<String>,

    /// Background color passed to the renderer (overrides config).
    #[arg(short, long)]
    background: Option<String>,

    /// Image format: png, svg or pdf (overrides config).
    #[arg(short, long)]
    format: Option<String>,

    /// Suffix for the output document name (overrides config).
    #[arg(long)]
    suffix: Option<String>,
}

impl ProcessOptions {
    /// Load configuration with these options applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            renderer: self.renderer.clone(),
            background: self.background.clone(),
            format: self.format.clone(),
            suffix: self.suffix.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Process a validated document path and print a summary.
    pub(crate) fn process(&self, path: &Path, output: &Output) -> Result<(), CliError> {
        let config = self.load_config()?;

        let renderer = MermaidCli::new(&config.renderer.command)
            .args(&config.renderer.args)
            .background(&config.renderer.background);
        let processor = DiagramProcessor::new(renderer)
            .format(config.renderer.image_format()?)
            .output_suffix(&config.output.suffix);

        output.info(&format!("Processing {}", path.display()));

        let report = processor.process(path)?;
        print_report(output, &report);
        Ok(())
    }
}

fn print_report(output: &Output, report: &ProcessReport) {
    output.info(&format!(
        "Diagrams: {} ({} unique), rendered: {}, cached: {}",
        report.diagrams, report.unique, report.rendered, report.cache_hits
    ));
    output.success(&format!(
        "Processing completed successfully: {}",
        report.output_path.display()
    ));
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Typst document to process (absolute, relative or ~/ path).
    path: String,

    #[command(flatten)]
    options: ProcessOptions,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid, configuration fails, or the
    /// document cannot be processed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cwd = std::env::current_dir()?;
        let path = resolve_path(&self.path, &cwd);
        tracing::debug!(path = %path.display(), "Resolved document path");
        if let Err(e) = validate_document_path(&path, DOCUMENT_EXTENSIONS) {
            output.info("Usage: mtyp render [path/to/file.typ]");
            output.info("Examples:");
            output.info("  mtyp render ./document.typ");
            output.info("  mtyp render ~/documents/file.typ");
            output.info("  mtyp render ../other/file.typ");
            return Err(e.into());
        }

        self.options.process(&path, &output)
    }
}
