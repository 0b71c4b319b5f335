//! gbkx - extract archives with a legacy filename code page through 7-Zip
//!
//! This library locates a 7-Zip executable, keeps a small persistent
//! configuration, and drives 7-Zip with `-mcp=<code page>` so archives created
//! on GBK (or other non-UTF-8) systems extract with readable filenames. All
//! archive parsing and filename decoding happens inside 7-Zip.

pub mod codepage;
pub mod config;
pub mod error;
pub mod extract;
pub mod locator;
pub mod probe;
pub mod process;
pub mod utils;
pub mod wizard;

pub use error::{Error, Result};

// Re-export commonly used types
pub use config::{Config, ConfigStore, DEFAULT_CODE_PAGE};
pub use extract::{extract, ExtractRequest, Outcome, Shape};
pub use locator::{locate_and_remember, Located, Locator, Source};
pub use probe::{probe, Health};
pub use process::{ProcessRunner, RunOutput, Runner};
