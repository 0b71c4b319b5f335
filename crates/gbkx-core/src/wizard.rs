//! Interactive configuration flow
//!
//! The flow lives here and the prompting is behind [`Prompter`], so the CLI
//! can drive it with a terminal UI and tests can script the answers.

use crate::config::Config;
use crate::probe;
use crate::process::Runner;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Answers the wizard's questions
pub trait Prompter {
    /// Ask for a new archiver path; `None` or an empty answer keeps `current`
    fn archiver_path(&mut self, current: Option<&Path>) -> Result<Option<String>>;

    /// The entered archiver failed its self-test; ask whether to keep it
    fn keep_unhealthy(&mut self, path: &Path, message: &str) -> Result<bool>;

    /// Ask for a code page; `None` or an empty answer keeps `current`
    fn code_page(&mut self, current: &str) -> Result<Option<String>>;
}

/// Run the wizard against `config` and return the edited copy.
///
/// Nothing is saved here; the caller persists the result once.
pub fn run(config: &Config, prompter: &mut dyn Prompter, runner: &dyn Runner) -> Result<Config> {
    let mut edited = config.clone();

    let answer = prompter.archiver_path(config.sevenzip_path.as_deref())?;
    if let Some(answer) = non_empty(answer) {
        let candidate = PathBuf::from(answer);
        let (healthy, message) = probe::describe(runner, &candidate);

        if healthy || prompter.keep_unhealthy(&candidate, &message)? {
            if !healthy {
                warn!(path = %candidate.display(), "Keeping 7-Zip path that failed its self-test");
            }
            info!(path = %candidate.display(), "7-Zip path updated");
            edited.sevenzip_path = Some(candidate);
        } else {
            info!("7-Zip path unchanged");
        }
    }

    let answer = prompter.code_page(&config.encoding)?;
    if let Some(code_page) = non_empty(answer) {
        info!(code_page = %code_page, "Default code page updated");
        edited.encoding = code_page;
    }

    Ok(edited)
}

fn non_empty(answer: Option<String>) -> Option<String> {
    answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}
