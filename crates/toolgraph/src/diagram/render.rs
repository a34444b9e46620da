//! PNG export through Graphviz `dot`.
//!
//! Uses `which` on Unix and `where` on Windows to find the renderer. The
//! command runner is injectable so tests never depend on what is installed.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use thiserror::Error;
use tracing::debug;

use super::to_dot;

/// File name the demo writes the rendered graph to.
pub const DEFAULT_DIAGRAM_FILE: &str = "langgraph_workflow.png";

/// Errors from diagram export. None of them are fatal to the demo.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// Renderer binary not found in PATH.
    #[error("{0} not found in PATH; install graphviz to render the diagram")]
    RendererNotFound(String),
    /// Renderer ran but exited with an error.
    #[error("renderer failed: {0}")]
    RenderFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Runs `cmd` with `args` and returns its output.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;

    /// Runs `cmd` with `args`, writing `input` to its stdin.
    fn run_with_input(&self, cmd: &str, args: &[&str], input: &[u8]) -> io::Result<Output>;
}

/// `std::process::Command` backed runner.
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner;

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        Command::new(cmd).args(args).output()
    }

    fn run_with_input(&self, cmd: &str, args: &[&str], input: &[u8]) -> io::Result<Output> {
        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }
        child.wait_with_output()
    }
}

/// Result of a command availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectResult {
    pub available: bool,
    /// Full path to the command, if found.
    pub path: Option<String>,
}

/// Checks whether `command` is on PATH.
pub fn detect_command(command: &str, runner: &dyn CommandRunner) -> DetectResult {
    #[cfg(windows)]
    let output = runner.run("where", &[command]);
    #[cfg(not(windows))]
    let output = runner.run("which", &[command]);

    match output {
        Ok(o) if o.status.success() => {
            let stdout = String::from_utf8_lossy(&o.stdout);
            let found = stdout
                .lines()
                .next()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            debug!(command = %command, found = ?found, "which/where succeeded");
            DetectResult {
                available: found.is_some(),
                path: found,
            }
        }
        _ => DetectResult {
            available: false,
            path: None,
        },
    }
}

/// Renders the loop graph to `path` as PNG with the default runner.
pub fn export_png(path: &Path) -> Result<PathBuf, DiagramError> {
    export_png_with(path, &DefaultCommandRunner)
}

/// Renders the loop graph to `path` as PNG using `runner`.
///
/// Returns the path written. Fails with `RendererNotFound` when `dot` is not
/// installed and `RenderFailed` when it exits non-zero.
pub fn export_png_with(path: &Path, runner: &dyn CommandRunner) -> Result<PathBuf, DiagramError> {
    let dot = detect_command("dot", runner);
    let Some(dot_path) = dot.path else {
        return Err(DiagramError::RendererNotFound("dot".into()));
    };
    let out = runner.run_with_input(&dot_path, &["-Tpng"], to_dot().as_bytes())?;
    if !out.status.success() {
        return Err(DiagramError::RenderFailed(
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }
    std::fs::write(path, &out.stdout)?;
    debug!(path = %path.display(), bytes = out.stdout.len(), "diagram written");
    Ok(path.to_path_buf())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use std::sync::Mutex;

    /// Fake runner: `which` answers `which_stdout` (empty = not found), `dot`
    /// echoes a fixed PNG header and records the DOT text it received.
    struct FakeRunner {
        which_stdout: &'static str,
        dot_exit: i32,
        received: Mutex<Vec<u8>>,
    }

    fn output(code: i32, stdout: &[u8], stderr: &[u8]) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, _cmd: &str, _args: &[&str]) -> io::Result<Output> {
            let code = if self.which_stdout.is_empty() { 1 } else { 0 };
            Ok(output(code, self.which_stdout.as_bytes(), b""))
        }

        fn run_with_input(&self, _cmd: &str, _args: &[&str], input: &[u8]) -> io::Result<Output> {
            if let Ok(mut r) = self.received.lock() {
                r.extend_from_slice(input);
            }
            Ok(output(self.dot_exit, b"\x89PNG", b"syntax error"))
        }
    }

    fn temp_png(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("toolgraph-{}-{}.png", name, std::process::id()))
    }

    #[test]
    fn missing_dot_is_reported() {
        let runner = FakeRunner {
            which_stdout: "",
            dot_exit: 0,
            received: Mutex::new(vec![]),
        };
        let err = export_png_with(&temp_png("missing"), &runner).unwrap_err();
        assert!(matches!(err, DiagramError::RendererNotFound(_)));
    }

    #[test]
    fn renders_dot_text_to_file() {
        let runner = FakeRunner {
            which_stdout: "/usr/bin/dot\n",
            dot_exit: 0,
            received: Mutex::new(vec![]),
        };
        let path = temp_png("ok");
        let written = export_png_with(&path, &runner).unwrap();
        assert_eq!(std::fs::read(&written).unwrap(), b"\x89PNG");
        let received = runner.received.lock().unwrap().clone();
        assert_eq!(String::from_utf8(received).unwrap(), to_dot());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn renderer_failure_carries_stderr() {
        let runner = FakeRunner {
            which_stdout: "/usr/bin/dot\n",
            dot_exit: 1,
            received: Mutex::new(vec![]),
        };
        let err = export_png_with(&temp_png("fail"), &runner).unwrap_err();
        assert!(matches!(err, DiagramError::RenderFailed(ref s) if s == "syntax error"));
    }

    #[test]
    fn detect_reads_first_line() {
        let runner = FakeRunner {
            which_stdout: "/opt/bin/dot\n/usr/bin/dot\n",
            dot_exit: 0,
            received: Mutex::new(vec![]),
        };
        let r = detect_command("dot", &runner);
        assert!(r.available);
        assert_eq!(r.path.as_deref(), Some("/opt/bin/dot"));
    }
}
