//! Extracting an archive with 7-Zip and a filename code page
//!
//! 7-Zip builds differ in where they accept switches, so extraction walks a
//! ladder of argument shapes and stops at the first one that exits with 0.
//! The last rung drops the code page entirely; content still comes out but
//! filenames may be garbled.

use crate::process::Runner;
use crate::utils::{derive_output_dir, render_command};
use crate::{Error, Result};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What to extract, where, and with which code page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Archive to extract; must exist
    pub archive: PathBuf,
    /// Output directory, derived from the archive name when `None`
    pub output_dir: Option<PathBuf>,
    /// Code page passed to `-mcp=`
    pub code_page: String,
}

impl ExtractRequest {
    pub fn new(archive: impl Into<PathBuf>, code_page: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            output_dir: None,
            code_page: code_page.into(),
        }
    }

    /// Set the output directory; an empty path counts as none given
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir.filter(|dir| !dir.as_os_str().is_empty());
        self
    }

    /// The output directory this request extracts into
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| derive_output_dir(&self.archive))
    }
}

/// One placement of the switches on the 7-Zip command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `x <archive> -mcp=<cp> -o<dir> -y`
    Standard,
    /// `x <archive> -mcp=<cp> -y -o<dir>`
    OutputLast,
    /// `x -mcp=<cp> <archive> -o<dir> -y`
    CodePageFirst,
    /// `x <archive> -o<dir> -y`
    NoCodePage,
}

impl Shape {
    /// Shapes in the order they are tried
    pub const LADDER: [Shape; 4] = [
        Shape::Standard,
        Shape::OutputLast,
        Shape::CodePageFirst,
        Shape::NoCodePage,
    ];

    /// Build the argument list for this shape
    pub fn build(self, archive: &Path, output_dir: &Path, code_page: &str) -> Vec<OsString> {
        let extract = OsString::from("x");
        let archive = archive.as_os_str().to_os_string();
        let code_page = code_page_switch(code_page);
        let output = output_switch(output_dir);
        let yes = OsString::from("-y");

        match self {
            Shape::Standard => vec![extract, archive, code_page, output, yes],
            Shape::OutputLast => vec![extract, archive, code_page, yes, output],
            Shape::CodePageFirst => vec![extract, code_page, archive, output, yes],
            Shape::NoCodePage => vec![extract, archive, output, yes],
        }
    }

    /// Whether this shape passes the code page at all
    pub fn uses_code_page(self) -> bool {
        self != Shape::NoCodePage
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Standard => "standard",
            Shape::OutputLast => "output last",
            Shape::CodePageFirst => "code page first",
            Shape::NoCodePage => "no code page",
        };
        f.write_str(name)
    }
}

fn code_page_switch(code_page: &str) -> OsString {
    OsString::from(format!("-mcp={}", code_page))
}

fn output_switch(dir: &Path) -> OsString {
    let mut switch = OsString::from("-o");
    switch.push(dir.as_os_str());
    switch
}

/// Record of one archiver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub shape: Shape,
    pub args: Vec<OsString>,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Directory the archive was extracted into
    pub output_dir: PathBuf,
    /// Shape that succeeded
    pub shape: Shape,
    /// Every attempt made, the successful one last
    pub attempts: Vec<Attempt>,
}

impl Outcome {
    /// Filenames may be garbled when the code page had to be dropped
    pub fn code_page_applied(&self) -> bool {
        self.shape.uses_code_page()
    }
}

/// Context reported when every shape failed
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub archiver: PathBuf,
    pub archiver_exists: bool,
    pub archive: PathBuf,
    pub archive_exists: bool,
    pub output_dir: PathBuf,
    pub attempts: Vec<Attempt>,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "7-Zip path: {}", self.archiver.display())?;
        writeln!(f, "7-Zip exists: {}", self.archiver_exists)?;
        writeln!(f, "Archive: {}", self.archive.display())?;
        writeln!(f, "Archive exists: {}", self.archive_exists)?;
        write!(f, "Output directory: {}", self.output_dir.display())?;

        for (index, attempt) in self.attempts.iter().enumerate() {
            let code = attempt
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            write!(
                f,
                "\nAttempt {} ({}): exit code {}",
                index + 1,
                attempt.shape,
                code
            )?;
            if !attempt.stdout.trim().is_empty() {
                write!(f, "\n  stdout: {}", attempt.stdout.trim())?;
            }
            if !attempt.stderr.trim().is_empty() {
                write!(f, "\n  stderr: {}", attempt.stderr.trim())?;
            }
        }
        Ok(())
    }
}

/// Extract `request.archive` with the archiver at `archiver`.
///
/// Fails with [`Error::ArchiveNotFound`] before running anything if the
/// archive is missing, with [`Error::Launch`] as soon as the archiver cannot be
/// started, and with [`Error::ExtractionFailed`] once every shape has exited
/// non-zero.
pub fn extract(runner: &dyn Runner, archiver: &Path, request: &ExtractRequest) -> Result<Outcome> {
    if !request.archive.exists() {
        error!(archive = %request.archive.display(), "Archive does not exist");
        return Err(Error::ArchiveNotFound(request.archive.clone()));
    }

    let output_dir = request.resolved_output_dir();
    fs::create_dir_all(&output_dir)?;

    info!(
        archive = %request.archive.display(),
        code_page = %request.code_page,
        output = %output_dir.display(),
        archiver = %archiver.display(),
        "Extracting"
    );

    let mut attempts = Vec::with_capacity(Shape::LADDER.len());

    for shape in Shape::LADDER {
        let args = shape.build(&request.archive, &output_dir, &request.code_page);
        debug!(shape = %shape, command = %render_command(archiver, &args), "Running 7-Zip");

        let output = runner.run(archiver, &args)?;
        let succeeded = output.success();

        attempts.push(Attempt {
            shape,
            args,
            exit_code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        });

        if succeeded {
            if !shape.uses_code_page() {
                warn!("Extracted without a code page; filenames may be garbled");
            }
            info!(shape = %shape, "Extraction succeeded");
            return Ok(Outcome {
                output_dir,
                shape,
                attempts,
            });
        }

        if let Some(failed) = attempts.last() {
            warn!(shape = %shape, exit_code = ?failed.exit_code, "7-Zip reported failure");
            if !failed.stdout.trim().is_empty() {
                debug!("stdout: {}", failed.stdout.trim());
            }
            if !failed.stderr.trim().is_empty() {
                debug!("stderr: {}", failed.stderr.trim());
            }
        }
    }

    let diagnostics = Diagnostics {
        archiver: archiver.to_path_buf(),
        archiver_exists: archiver.exists(),
        archive: request.archive.clone(),
        archive_exists: request.archive.exists(),
        output_dir,
        attempts,
    };
    error!("All {} argument shapes failed", Shape::LADDER.len());

    Err(Error::ExtractionFailed(Box::new(diagnostics)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RunOutput;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Runner that answers from a fixed list of exit codes and records calls
    struct ScriptedRunner {
        codes: Vec<i32>,
        calls: RefCell<Vec<Vec<OsString>>>,
    }

    impl ScriptedRunner {
        fn new(codes: &[i32]) -> Self {
            Self {
                codes: codes.to_vec(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Runner for ScriptedRunner {
        fn run(&self, _program: &Path, args: &[OsString]) -> Result<RunOutput> {
            let mut calls = self.calls.borrow_mut();
            let code = self.codes.get(calls.len()).copied().unwrap_or(2);
            calls.push(args.to_vec());
            Ok(RunOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: format!("exit {}", code),
            })
        }
    }

    fn args(strs: &[&str]) -> Vec<OsString> {
        strs.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_shapes_build_expected_arguments() {
        let archive = Path::new("a.zip");
        let out = Path::new("out");

        assert_eq!(
            Shape::Standard.build(archive, out, "936"),
            args(&["x", "a.zip", "-mcp=936", "-oout", "-y"])
        );
        assert_eq!(
            Shape::OutputLast.build(archive, out, "936"),
            args(&["x", "a.zip", "-mcp=936", "-y", "-oout"])
        );
        assert_eq!(
            Shape::CodePageFirst.build(archive, out, "936"),
            args(&["x", "-mcp=936", "a.zip", "-oout", "-y"])
        );
        assert_eq!(
            Shape::NoCodePage.build(archive, out, "936"),
            args(&["x", "a.zip", "-oout", "-y"])
        );
    }

    #[test]
    fn test_first_shape_success_stops_ladder() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.zip");
        fs::write(&archive, b"PK").unwrap();

        let runner = ScriptedRunner::new(&[0]);
        let outcome = extract(&runner, Path::new("7z"), &ExtractRequest::new(&archive, "936")).unwrap();

        assert_eq!(outcome.shape, Shape::Standard);
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(runner.calls.borrow().len(), 1);
        assert!(outcome.code_page_applied());
    }

    #[test]
    fn test_falls_back_to_no_code_page() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.zip");
        fs::write(&archive, b"PK").unwrap();

        let runner = ScriptedRunner::new(&[2, 7, 1, 0]);
        let outcome = extract(&runner, Path::new("7z"), &ExtractRequest::new(&archive, "936")).unwrap();

        assert_eq!(outcome.shape, Shape::NoCodePage);
        assert!(!outcome.code_page_applied());
        let shapes: Vec<Shape> = outcome.attempts.iter().map(|a| a.shape).collect();
        assert_eq!(shapes, Shape::LADDER.to_vec());
        assert_eq!(outcome.attempts[1].stderr, "exit 7");
    }

    #[test]
    fn test_all_shapes_failing_reports_diagnostics() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.zip");
        fs::write(&archive, b"PK").unwrap();

        let runner = ScriptedRunner::new(&[2, 2, 2, 2]);
        let result = extract(&runner, Path::new("/no/such/7z"), &ExtractRequest::new(&archive, "936"));

        match result {
            Err(Error::ExtractionFailed(diagnostics)) => {
                assert!(!diagnostics.archiver_exists);
                assert!(diagnostics.archive_exists);
                assert_eq!(diagnostics.output_dir, temp_dir.path().join("a"));
                assert_eq!(diagnostics.attempts.len(), 4);
                let text = diagnostics.to_string();
                assert!(text.contains("7-Zip path: /no/such/7z"));
                assert!(text.contains("Attempt 4 (no code page): exit code 2"));
            }
            other => panic!("expected extraction failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_archive_runs_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("missing.zip");

        let runner = ScriptedRunner::new(&[0]);
        let result = extract(&runner, Path::new("7z"), &ExtractRequest::new(&archive, "936"));

        assert!(matches!(result, Err(Error::ArchiveNotFound(_))));
        assert!(runner.calls.borrow().is_empty());
        assert!(!temp_dir.path().join("missing").exists());
    }

    #[test]
    fn test_output_dir_created_and_reused() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("a.7z");
        fs::write(&archive, b"7z").unwrap();
        let output = temp_dir.path().join("deep/nested/out");

        let request = ExtractRequest::new(&archive, "950").with_output_dir(Some(output.clone()));
        extract(&ScriptedRunner::new(&[0]), Path::new("7z"), &request).unwrap();
        assert!(output.is_dir());

        let runner = ScriptedRunner::new(&[0]);
        let outcome = extract(&runner, Path::new("7z"), &request).unwrap();
        assert_eq!(outcome.output_dir, output);

        let mut expected = OsString::from("-o");
        expected.push(output.as_os_str());
        assert_eq!(runner.calls.borrow()[0][3], expected);
        assert_eq!(runner.calls.borrow()[0][2], OsString::from("-mcp=950"));
    }

    #[test]
    fn test_empty_output_dir_is_derived() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("旧资料.zip");
        fs::write(&archive, b"PK").unwrap();

        let request = ExtractRequest::new(&archive, "936").with_output_dir(Some(PathBuf::new()));
        assert_eq!(request.output_dir, None);

        let runner = ScriptedRunner::new(&[0]);
        let outcome = extract(&runner, Path::new("7z"), &request).unwrap();
        let derived = temp_dir.path().join("旧资料");
        assert_eq!(outcome.output_dir, derived);

        let mut expected = OsString::from("-o");
        expected.push(derived.as_os_str());
        assert_eq!(runner.calls.borrow()[0][3], expected);
    }
}
