//! gbkx - extract archives whose filenames use a legacy code page
//!
//! Thin command-line front end over `gbkx-core`:
//! - extraction through 7-Zip with `-mcp=<code page>` (default 936, GBK)
//! - an interactive configuration wizard
//! - configuration info and a 7-Zip self-test

use anyhow::Result;
use clap::{CommandFactory, Parser};
use gbkx_core::codepage::COMMON_CODE_PAGES;
use gbkx_core::ConfigStore;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod wizard;

/// gbkx - extract archives with GBK (or any code page) filenames
///
/// Runs 7-Zip with an explicit filename code page so archives created on
/// non-UTF-8 systems extract with readable names.
#[derive(Parser, Debug)]
#[command(name = "gbkx")]
#[command(author, version, about = "Extract archives with legacy-encoded filenames through 7-Zip", long_about = None)]
#[command(args_override_self = true, after_help = after_help())]
struct Cli {
    /// Archive file to extract
    archive: Option<PathBuf>,

    /// Output directory (default: next to the archive, named after it)
    #[arg(short, long, value_name = "DIR", allow_hyphen_values = true)]
    output: Option<PathBuf>,

    /// Code page for filenames (default: from config, initially 936 = GBK)
    #[arg(short, long, value_name = "CODE", allow_hyphen_values = true)]
    encoding: Option<String>,

    /// Run the configuration wizard
    #[arg(short, long)]
    config: bool,

    /// Test the 7-Zip executable
    #[arg(short, long)]
    test: bool,

    /// Show the current configuration
    #[arg(short, long)]
    info: bool,

    /// Enable verbose output for debugging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,
}

/// What the command line asks for
enum Mode {
    Usage { missing_archive: bool },
    Configure,
    Info,
    SelfTest,
    Extract {
        archive: PathBuf,
        output: Option<PathBuf>,
        encoding: Option<String>,
    },
}

impl Cli {
    fn mode(self, had_arguments: bool) -> Mode {
        if self.config {
            Mode::Configure
        } else if self.info {
            Mode::Info
        } else if self.test {
            Mode::SelfTest
        } else if let Some(archive) = self.archive {
            Mode::Extract {
                archive,
                output: self.output,
                encoding: self.encoding,
            }
        } else {
            Mode::Usage {
                missing_archive: had_arguments,
            }
        }
    }
}

fn after_help() -> String {
    let mut text = String::from("Common code pages:\n");
    for (code, name) in COMMON_CODE_PAGES {
        text.push_str(&format!("  {:<6} {}\n", code, name));
    }
    text.push_str(
        "\nExamples:\n  gbkx archive.zip\n  gbkx archive.zip -o output/\n  gbkx archive.zip -e 950\n  gbkx --config",
    );
    text
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let result = run(std::env::args_os().collect());

    match result {
        Ok(_) => process::exit(0),
        Err(e) => {
            error!("Error: {}", e);

            let exit_code = map_error_to_exit_code(&e);
            process::exit(exit_code);
        }
    }
}

fn run(raw: Vec<OsString>) -> Result<()> {
    let mut raw = raw.into_iter();
    let program = raw.next().unwrap_or_else(|| OsString::from("gbkx"));
    let normalized = args::normalize(raw);
    let had_arguments = !normalized.args.is_empty() || !normalized.ignored.is_empty();

    let cli = Cli::parse_from(std::iter::once(program).chain(normalized.args));
    setup_logging(cli.verbose, cli.quiet);

    for arg in &normalized.ignored {
        debug!("Ignoring argument {:?}", arg);
    }

    let store = ConfigStore::default_location().unwrap_or_else(|e| {
        warn!("{}; using ./{}", e, gbkx_core::config::CONFIG_FILE_NAME);
        ConfigStore::new(gbkx_core::config::CONFIG_FILE_NAME)
    });
    let config = store.load();

    match cli.mode(had_arguments) {
        Mode::Usage { missing_archive } => {
            if missing_archive {
                eprintln!("error: no archive specified\n");
            }
            Cli::command().print_help()?;
        }
        Mode::Configure => commands::configure(&store, &config)?,
        Mode::Info => commands::info(&store, &config),
        Mode::SelfTest => commands::self_test(&config)?,
        Mode::Extract {
            archive,
            output,
            encoding,
        } => commands::extract(&store, config, archive, output, encoding)?,
    }

    Ok(())
}

/// Map errors to exit codes:
/// - 0: Success
/// - 1: General error
/// - 2: Archive or file not found, IO error
/// - 3: 7-Zip missing or not runnable
/// - 4: 7-Zip ran but extraction failed
fn map_error_to_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(core_err) = err.downcast_ref::<gbkx_core::Error>() {
        match core_err {
            gbkx_core::Error::Io(_) => 2,
            gbkx_core::Error::ArchiveNotFound(_) => 2,
            gbkx_core::Error::ArchiverNotFound => 3,
            gbkx_core::Error::Launch { .. } => 3,
            gbkx_core::Error::ExtractionFailed(_) => 4,
            gbkx_core::Error::Config(_) => 1,
        }
    } else if err.is::<std::io::Error>() {
        2
    } else {
        1
    }
}
