//! Mode handlers for the gbkx CLI

use anyhow::{anyhow, Result};
use gbkx_core::codepage::{self, COMMON_CODE_PAGES};
use gbkx_core::locator::ARCHIVER_ENV_VAR;
use gbkx_core::{
    locate_and_remember, probe, Config, ConfigStore, Error, ExtractRequest, Located, Locator,
    ProcessRunner,
};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::wizard::DialoguerPrompter;

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

/// Print what to do when no 7-Zip executable can be found
fn print_remediation() {
    eprintln!("Could not find a 7-Zip executable. Specify one by:");
    eprintln!("  1. Running: gbkx --config");
    eprintln!("  2. Setting the {} environment variable", ARCHIVER_ENV_VAR);
    eprintln!("  3. Making sure 7z is on your PATH");
    eprintln!("  4. Installing 7-Zip to its default location");
}

fn located_or_remediate(result: gbkx_core::Result<Located>) -> Result<Located> {
    match result {
        Ok(located) => Ok(located),
        Err(Error::ArchiverNotFound) => {
            print_remediation();
            Err(Error::ArchiverNotFound.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Extract an archive, persisting a freshly discovered 7-Zip path
pub fn extract(
    store: &ConfigStore,
    mut config: Config,
    archive: PathBuf,
    output: Option<PathBuf>,
    encoding: Option<String>,
) -> Result<()> {
    if !archive.exists() {
        return Err(Error::ArchiveNotFound(archive).into());
    }

    let located = located_or_remediate(locate_and_remember(
        &Locator::from_env(),
        &mut config,
        store,
    ))?;

    let code_page = encoding.unwrap_or_else(|| config.encoding.clone());
    info!("Using code page {}", codepage::label(&code_page));

    let request = ExtractRequest::new(archive, code_page).with_output_dir(output);
    let outcome = gbkx_core::extract(&ProcessRunner, &located.path, &request)?;

    println!("{} Extracted to {}", mark(true), outcome.output_dir.display());
    if !outcome.code_page_applied() {
        println!("Note: 7-Zip rejected the code page; filenames may be garbled");
    }
    Ok(())
}

/// Show the configuration and the 7-Zip that would be used
pub fn info(store: &ConfigStore, config: &Config) {
    println!("=== gbkx info ===");
    println!("Config file: {}", store.path().display());
    println!(
        "7-Zip path: {}",
        config
            .sevenzip_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not set (auto-detect)".to_string())
    );
    println!("Default code page: {}", codepage::label(&config.encoding));

    match Locator::from_env().locate(config) {
        Ok(located) => {
            println!(
                "Using 7-Zip: {} (from {})",
                located.path.display(),
                located.source
            );
            let (ok, message) = probe::describe(&ProcessRunner, &located.path);
            println!("7-Zip status: {} {}", mark(ok), message);
        }
        Err(_) => println!("Warning: no 7-Zip executable found"),
    }
}

/// Check that the located 7-Zip responds
pub fn self_test(config: &Config) -> Result<()> {
    let located = located_or_remediate(Locator::from_env().locate(config))?;

    println!("Testing 7-Zip: {}", located.path.display());
    let (ok, message) = probe::describe(&ProcessRunner, &located.path);
    println!("Result: {} {}", mark(ok), message);

    if ok {
        Ok(())
    } else {
        Err(anyhow!("7-Zip self-test failed: {}", message))
    }
}

/// Interactive configuration wizard
pub fn configure(store: &ConfigStore, config: &Config) -> Result<()> {
    println!("=== gbkx configuration ===");
    println!("Current configuration:");
    println!(
        "  7-Zip path: {}",
        config
            .sevenzip_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto-detect".to_string())
    );
    println!("  Default code page: {}", codepage::label(&config.encoding));
    println!();
    println!("Common code pages:");
    for (code, name) in COMMON_CODE_PAGES {
        println!("  {:<6} {}", code, name);
    }

    match &config.sevenzip_path {
        Some(path) if path.exists() => {
            let (ok, message) = probe::describe(&ProcessRunner, path);
            println!("Current 7-Zip status: {} {}", mark(ok), message);
        }
        _ => println!("Current 7-Zip status: {} not found or not set", mark(false)),
    }
    println!();

    let edited = gbkx_core::wizard::run(config, &mut DialoguerPrompter, &ProcessRunner)?;

    match store.save(&edited) {
        Ok(()) => println!("{} Configuration saved to {}", mark(true), store.path().display()),
        Err(e) => warn!("Failed to save configuration: {}", e),
    }
    Ok(())
}
