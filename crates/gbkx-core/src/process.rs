//! Child-process seam for running the archiver

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one archiver run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl RunOutput {
    /// Only exit code 0 counts as success
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a program to completion and captures its output
pub trait Runner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// Returns [`Error::Launch`] if the process could not be started at all.
    fn run(&self, program: &Path, args: &[OsString]) -> Result<RunOutput>;
}

/// [`Runner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<RunOutput> {
        // stdin is closed so a password prompt fails instead of waiting on
        // input the user cannot see.
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Launch {
                program: program.to_path_buf(),
                source,
            })?;

        Ok(RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
