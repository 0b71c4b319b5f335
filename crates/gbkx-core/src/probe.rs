//! Self-test for a 7-Zip executable

use crate::process::Runner;
use crate::Result;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Harmless flag used to check the archiver responds
pub const PROBE_FLAG: &str = "--help";

/// Exit codes treated as a healthy response; `7z --help` exits with 1 on
/// some builds
pub const HEALTHY_EXIT_CODES: &[i32] = &[0, 1];

/// Result of probing an archiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Responded with a healthy exit code
    Healthy,
    /// The path does not exist, nothing was run
    Missing,
    /// Ran but exited with an unexpected code (`None` if killed by a signal)
    Unhealthy { code: Option<i32> },
}

impl Health {
    pub fn is_healthy(self) -> bool {
        self == Health::Healthy
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Health::Healthy => f.write_str("7-Zip is available"),
            Health::Missing => f.write_str("7-Zip path does not exist"),
            Health::Unhealthy { code: Some(code) } => {
                write!(f, "7-Zip returned exit code {}", code)
            }
            Health::Unhealthy { code: None } => f.write_str("7-Zip was terminated by a signal"),
        }
    }
}

/// Run `archiver --help` and classify the result.
///
/// A launch failure is returned as an error rather than a [`Health`].
pub fn probe(runner: &dyn Runner, archiver: &Path) -> Result<Health> {
    if !archiver.exists() {
        return Ok(Health::Missing);
    }

    let output = runner.run(archiver, &[OsString::from(PROBE_FLAG)])?;
    debug!(archiver = %archiver.display(), exit_code = ?output.code, "Probed 7-Zip");

    Ok(match output.code {
        Some(code) if HEALTHY_EXIT_CODES.contains(&code) => Health::Healthy,
        code => Health::Unhealthy { code },
    })
}

/// Probe and turn every outcome, launch failures included, into a verdict
/// and message for display
pub fn describe(runner: &dyn Runner, archiver: &Path) -> (bool, String) {
    match probe(runner, archiver) {
        Ok(health) => (health.is_healthy(), health.to_string()),
        Err(e) => (false, format!("Error running 7-Zip: {}", e)),
    }
}
