//! `mtyp browse` command implementation.
//!
//! Interactive filesystem navigation that ends with a single document path,
//! which is then processed like `mtyp render`.

use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use mtyp_diagrams::{BROWSE_EXTENSIONS, has_extension, resolve_path};

use crate::commands::render::ProcessOptions;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the browse command.
#[derive(Args)]
pub(crate) struct BrowseArgs {
    /// Directory to start in (default: current directory).
    dir: Option<String>,

    #[command(flatten)]
    options: ProcessOptions,
}

impl BrowseArgs {
    /// Execute the browse command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NoFileSelected`] if the user quits, otherwise any
    /// error from processing the selected document.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cwd = std::env::current_dir()?;
        let start = self
            .dir
            .as_deref()
            .map_or_else(|| cwd.clone(), |dir| resolve_path(dir, &cwd));

        let Some(path) = navigate(&start, &output)? else {
            return Err(CliError::NoFileSelected);
        };

        self.options.process(&path, &output)
    }
}

/// A listed directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List directories and Typst documents in `dir`, sorted by name.
fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            let is_dir = path.is_dir();
            if !is_dir && !has_extension(&path, BROWSE_EXTENSIONS) {
                return None;
            }
            Some(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                is_dir,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// A parsed user choice.
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Quit,
    Parent,
    /// One-based item number.
    Item(usize),
    Invalid,
}

impl Choice {
    fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "q" => Self::Quit,
            "p" => Self::Parent,
            other => other.parse().map_or(Self::Invalid, Self::Item),
        }
    }
}

/// Outcome of applying a choice to the current listing.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Quit,
    Enter(PathBuf),
    Select(PathBuf),
    Message(&'static str),
}

fn apply_choice(current: &Path, entries: &[Entry], choice: Choice) -> Step {
    match choice {
        Choice::Quit => Step::Quit,
        Choice::Parent => Step::Enter(
            current
                .parent()
                .map_or_else(|| current.to_path_buf(), Path::to_path_buf),
        ),
        Choice::Item(number) => match number.checked_sub(1).and_then(|i| entries.get(i)) {
            Some(entry) if entry.is_dir => Step::Enter(entry.path.clone()),
            Some(entry) => Step::Select(entry.path.clone()),
            None => Step::Message("Invalid item number"),
        },
        Choice::Invalid => {
            Step::Message("Invalid choice - enter a number, 'p' for parent, or 'q' to quit")
        }
    }
}

/// Run the interactive loop until a document is selected or the user quits.
fn navigate(start: &Path, output: &Output) -> Result<Option<PathBuf>, CliError> {
    let mut current = start.to_path_buf();

    loop {
        output.info("");
        output.highlight(&format!("Current directory: {}", current.display()));
        output.separator();

        let entries = match list_entries(&current) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %current.display(), error = %e, "Failed to list directory");
                output.error(&format!("Error listing directory: {e}"));
                Vec::new()
            }
        };
        for (number, entry) in entries.iter().enumerate() {
            let kind = if entry.is_dir { 'D' } else { 'F' };
            output.info(&format!("{}. [{kind}] {}", number + 1, entry.name));
        }

        output.info("");
        output.info("Options:");
        output.info("number. Select item by number");
        output.info("p. Go to parent directory");
        output.info("q. Quit");

        let Some(input) = output.prompt("\nEnter your choice: ")? else {
            return Ok(None);
        };

        match apply_choice(&current, &entries, Choice::parse(&input)) {
            Step::Quit => return Ok(None),
            Step::Enter(dir) => current = dir,
            Step::Select(path) => return Ok(Some(path)),
            Step::Message(msg) => output.warning(msg),
        }
    }
}
