use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use crate::Error;


lazy_static! {
    static ref PANDOC_WARNING: Regex = Regex::new(r"(?m)^\[WARNING\]\s*(.+?)\s*$").unwrap();
}


/// A fully built pandoc command line, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub(crate) converter: &'static str,
    pub(crate) program: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) input: String,
    pub(crate) output: String,
    pub(crate) target: Option<String>,
    pub(crate) workdir: PathBuf,
}

impl Invocation {
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments after the program, ending in `-o <output> <input>`.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Output path after any fallback to PDF.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Target format pandoc was told to write; `None` means PDF.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs pandoc inside the working directory and waits for it to exit.
    ///
    /// A non-zero exit is not an error here; check [`Output::success`].
    pub fn execute(&self) -> Result<Output, Error> {
        info!("{self}");

        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = child.wait_with_output()?;
        let output = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status,
        };

        debug!(
            status = %output.status,
            stdout = output.stdout.len(),
            stderr = output.stderr.len(),
            "pandoc exited"
        );

        Ok(output)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Converter({:?})", self.converter, self.argv())
    }
}


/// What pandoc printed, and how it exited.
#[derive(Debug, Clone)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl Output {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// pandoc's own `[WARNING]` lines, without the prefix.
    pub fn warnings(&self) -> Vec<&str> {
        pandoc_warnings(&self.stderr)
    }
}

pub fn pandoc_warnings(stderr: &str) -> Vec<&str> {
    PANDOC_WARNING
        .captures_iter(stderr)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Toolchain};

    #[test]
    fn warnings_are_picked_from_stderr() {
        let stderr = "[INFO] Loaded template\r\n\
                      [WARNING] Missing character: There is no ä in font lmroman10\r\n\
                      Error producing PDF.\n\
                      [WARNING] Could not fetch resource 'logo.png'\n";

        assert_eq!(
            pandoc_warnings(stderr),
            [
                "Missing character: There is no ä in font lmroman10",
                "Could not fetch resource 'logo.png'",
            ]
        );
        assert!(pandoc_warnings("").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn echo_receives_the_full_command_line() {
        let toolchain = Toolchain::with_binary("echo");
        let invocation = toolchain.build(&Request::plain("report.tex").from("latex"), &mut Vec::new());

        let output = invocation.execute().unwrap();
        assert!(output.success());
        assert_eq!(
            output.stdout.trim_end(),
            "-f latex --pdf-engine=xelatex -o report-output.pdf report.tex"
        );
        assert!(output.stderr.is_empty());
        assert!(output.warnings().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn missing_workdir_is_a_spawn_error() {
        let toolchain = Toolchain::with_binary("echo");
        let request = Request::plain("a.md").workdir("/definitely/not/a/dir");
        let invocation = toolchain.build(&request, &mut Vec::new());

        assert!(matches!(invocation.execute(), Err(Error::Spawn(_))));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let toolchain = Toolchain::with_binary("pandoc-wrapper-no-such-binary");
        let invocation = toolchain.build(&Request::plain("a.md"), &mut Vec::new());

        assert!(matches!(invocation.execute(), Err(Error::Spawn(_))));
    }
}
