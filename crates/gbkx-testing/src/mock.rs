//! Scripted stand-in for the 7-Zip executable (Unix only)
//!
//! The mock is a POSIX shell script. Every run appends its arguments, joined
//! by spaces, to a log file next to the script. `--help` exits with a
//! configurable code. Extraction runs exit 0 and drop `extracted.txt` into
//! the `-o` directory unless the behavior says to fail.

use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// How the mock answers extraction runs
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Every run succeeds
    Succeed,
    /// Every run exits 2
    Fail,
    /// Runs whose arguments contain the pattern exit 2, others succeed
    FailWhenArgsContain(String),
}

/// An installed mock archiver
#[derive(Debug, Clone)]
pub struct MockArchiver {
    path: PathBuf,
    log: PathBuf,
}

impl MockArchiver {
    /// Install a mock named `7z` into `dir`
    pub fn install(dir: &Path, behavior: MockBehavior) -> Result<Self> {
        Self::install_as(dir, "7z", behavior, 1)
    }

    /// Install a mock with an explicit file name and `--help` exit code
    pub fn install_as(
        dir: &Path,
        name: &str,
        behavior: MockBehavior,
        help_exit_code: i32,
    ) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        let log = dir.join(format!("{}.log", name));

        let failure = match &behavior {
            MockBehavior::Succeed => String::new(),
            MockBehavior::Fail => "echo 'ERROR: mock failure' >&2\nexit 2\n".to_string(),
            MockBehavior::FailWhenArgsContain(pattern) => format!(
                "case \" $* \" in\n  *{}*) echo 'ERROR: unsupported switch' >&2; exit 2 ;;\nesac\n",
                shell_quote(pattern)
            ),
        };

        let script = format!(
            r#"#!/bin/sh
printf '%s\n' "$*" >> {log}
if [ "$1" = "--help" ]; then
  echo "7-Zip (mock)"
  exit {help}
fi
{failure}out=""
for arg in "$@"; do
  case "$arg" in
    -o*) out="${{arg#-o}}" ;;
  esac
done
if [ -n "$out" ]; then
  : > "$out/extracted.txt"
fi
echo "Everything is Ok"
exit 0
"#,
            log = shell_quote(&log.to_string_lossy()),
            help = help_exit_code,
            failure = failure,
        );

        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

        Ok(Self { path, log })
    }

    /// Path of the executable script
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Argument lines of every run so far, oldest first
    pub fn invocations(&self) -> Result<Vec<String>> {
        if !self.log.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.log)?;
        Ok(contents.lines().map(str::to_string).collect())
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
