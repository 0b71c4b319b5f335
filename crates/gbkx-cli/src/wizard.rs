//! Terminal prompts for the configuration wizard

use dialoguer::{Confirm, Input};
use gbkx_core::wizard::Prompter;
use std::path::Path;

/// Wizard prompts on the terminal
pub struct DialoguerPrompter;

fn prompt_error(err: dialoguer::Error) -> gbkx_core::Error {
    gbkx_core::Error::Io(std::io::Error::other(err.to_string()))
}

impl Prompter for DialoguerPrompter {
    fn archiver_path(&mut self, current: Option<&Path>) -> gbkx_core::Result<Option<String>> {
        let current = current
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto-detect".to_string());

        let answer = Input::<String>::new()
            .with_prompt(format!("7-Zip path (empty keeps {})", current))
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(Some(answer))
    }

    fn keep_unhealthy(&mut self, path: &Path, message: &str) -> gbkx_core::Result<bool> {
        Confirm::new()
            .with_prompt(format!(
                "{} may not work ({}). Use it anyway?",
                path.display(),
                message
            ))
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn code_page(&mut self, current: &str) -> gbkx_core::Result<Option<String>> {
        let answer = Input::<String>::new()
            .with_prompt(format!("Code page (empty keeps {})", current))
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(Some(answer))
    }
}
