//! External diagram renderer.
//!
//! [`DiagramRenderer`] is the seam between the pipeline and whatever turns
//! Mermaid source into an image. [`MermaidCli`] drives the `mmdc` executable
//! as a blocking subprocess:
//!
//! ```text
//! mmdc -i - -b <background> -o <output>    # source on stdin
//! mmdc --version                           # availability probe
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_RENDERER};

/// Error from a single renderer invocation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer process could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Writing the diagram source to the renderer's stdin failed.
    #[error("failed to send diagram to renderer: {0}")]
    Stdin(#[source] std::io::Error),
    /// Waiting for the renderer or collecting its output failed.
    #[error("failed to wait for renderer: {0}")]
    Wait(#[source] std::io::Error),
    /// The renderer exited with a non-zero status.
    #[error("Mermaid CLI error ({status}): {stderr}")]
    Failed { status: String, stderr: String },
    /// The renderer reported success without producing the image.
    #[error("renderer exited successfully but {} was not created", .0.display())]
    MissingOutput(PathBuf),
}

/// Renders diagram source to an image file.
pub trait DiagramRenderer {
    /// Probe the renderer and return its version string.
    fn version(&self) -> Result<String, RenderError>;

    /// Render `source` into an image at `output`.
    ///
    /// `source` is the diagram's complete raw text, directive lines included.
    fn render(&self, source: &str, output: &Path) -> Result<(), RenderError>;
}

/// [`DiagramRenderer`] backed by the Mermaid CLI (`mmdc`).
///
/// # Example
///
/// ```ignore
/// use mtyp_diagrams::MermaidCli;
///
/// let renderer = MermaidCli::new("mmdc").background("white");
/// println!("{}", renderer.version()?);
/// ```
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: String,
    args: Vec<String>,
    background: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl MermaidCli {
    /// Create a renderer invoking the given executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            background: DEFAULT_BACKGROUND.to_owned(),
        }
    }

    /// Arguments placed before the renderer's own flags.
    ///
    /// Useful when the renderer is launched through a wrapper
    /// (e.g. `npx` with `@mermaid-js/mermaid-cli`).
    #[must_use]
    pub fn args(mut self, args: &[String]) -> Self {
        self.args = args.to_vec();
        self
    }

    /// Set the background passed via `-b` (default: `transparent`).
    #[must_use]
    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn launch_error(&self, source: std::io::Error) -> RenderError {
        RenderError::Launch {
            program: self.program.clone(),
            source,
        }
    }
}

impl DiagramRenderer for MermaidCli {
    fn version(&self) -> Result<String, RenderError> {
        let output = self
            .command()
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.launch_error(e))?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    fn render(&self, source: &str, output: &Path) -> Result<(), RenderError> {
        let mut child = self
            .command()
            .args(["-i", "-", "-b"])
            .arg(&self.background)
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        // Dropping stdin closes the pipe so the renderer sees EOF.
        let write_result = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(source.as_bytes()));

        // A renderer that rejects its input may exit before reading all of
        // it, so its exit status and stderr take precedence over a broken pipe.
        let result = child.wait_with_output().map_err(RenderError::Wait)?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }

        write_result.map_err(RenderError::Stdin)?;

        if !output.is_file() {
            return Err(RenderError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Stand-in for `mmdc`: copies stdin to the `-o` path.
    const FAKE_MMDC: &str = r#"
if [ "$1" = "--version" ]; then
    echo "11.4.2"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    case "$1" in
        -o) out="$2"; shift ;;
    esac
    shift
done
cat > "$out"
"#;

    const FAILING_MMDC: &str = r#"
cat >/dev/null
echo "Parse error on line 2" >&2
exit 3
"#;

    /// Exits before reading any of its input.
    const EARLY_EXIT_MMDC: &str = "echo 'Parse error on line 1' >&2\nexit 1\n";

    /// Exits successfully before reading any of its input.
    const EARLY_SUCCESS_MMDC: &str = "exit 0\n";

    const SILENT_MMDC: &str = "cat >/dev/null\nexit 0\n";

    fn script_renderer(dir: &TempDir, body: &str) -> MermaidCli {
        let script = dir.path().join("mmdc.sh");
        fs::write(&script, body).unwrap();
        MermaidCli::new("sh").args(&[script.display().to_string()])
    }

    #[test]
    fn test_version_probe() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, FAKE_MMDC);

        assert_eq!(renderer.version().unwrap(), "11.4.2");
    }

    #[test]
    fn test_version_probe_missing_executable() {
        let renderer = MermaidCli::new("mtyp-test-no-such-renderer");

        let err = renderer.version().unwrap_err();

        assert!(matches!(err, RenderError::Launch { .. }), "got {err:?}");
        assert!(err.to_string().contains("mtyp-test-no-such-renderer"));
    }

    #[test]
    fn test_render_writes_source_to_output() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, FAKE_MMDC);
        let output = tmp.path().join("out.png");
        let source = "%%! Caption\ngraph TD\n  A --> B";

        renderer.render(source, &output).unwrap();

        // Directive lines are part of what the renderer receives
        assert_eq!(fs::read_to_string(&output).unwrap(), source);
    }

    #[test]
    fn test_render_failure_carries_stderr() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, FAILING_MMDC);
        let output = tmp.path().join("out.png");

        let err = renderer.render("graph TD", &output).unwrap_err();

        assert!(matches!(err, RenderError::Failed { .. }), "got {err:?}");
        assert!(err.to_string().contains("Parse error on line 2"));
        assert!(!output.exists());
    }

    #[test]
    fn test_render_early_exit_keeps_stderr() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, EARLY_EXIT_MMDC);
        let output = tmp.path().join("out.png");
        // Larger than a pipe buffer, so the write fails once the script exits
        let source = format!("graph TD\n{}", "  A --> B\n".repeat(50_000));

        let err = renderer.render(&source, &output).unwrap_err();

        assert!(matches!(err, RenderError::Failed { .. }), "got {err:?}");
        assert!(err.to_string().contains("Parse error on line 1"));
    }

    #[test]
    fn test_render_unread_input_after_success_is_stdin_error() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, EARLY_SUCCESS_MMDC);
        let output = tmp.path().join("out.png");
        let source = format!("graph TD\n{}", "  A --> B\n".repeat(50_000));

        let err = renderer.render(&source, &output).unwrap_err();

        assert!(matches!(err, RenderError::Stdin(_)), "got {err:?}");
    }

    #[test]
    fn test_render_missing_output() {
        let tmp = TempDir::new().unwrap();
        let renderer = script_renderer(&tmp, SILENT_MMDC);
        let output = tmp.path().join("out.png");

        let err = renderer.render("graph TD", &output).unwrap_err();

        assert!(matches!(err, RenderError::MissingOutput(_)), "got {err:?}");
    }

    #[test]
    fn test_render_missing_executable() {
        let tmp = TempDir::new().unwrap();
        let renderer = MermaidCli::new("mtyp-test-no-such-renderer");

        let err = renderer
            .render("graph TD", &tmp.path().join("out.png"))
            .unwrap_err();

        assert!(matches!(err, RenderError::Launch { .. }), "got {err:?}");
    }
}
