//! Utility functions for gbkx-core

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory name used when an archive's name sanitizes to nothing
pub const FALLBACK_DIR_NAME: &str = "extracted";

/// Characters that are not allowed in Windows file names
const ILLEGAL_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip characters that are illegal in file names and trim whitespace.
///
/// Returns [`FALLBACK_DIR_NAME`] when nothing is left, or when the result
/// would name the current or parent directory.
pub fn sanitize_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_NAME_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim();

    if matches!(cleaned, "" | "." | "..") {
        FALLBACK_DIR_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Default output directory for an archive: a sibling directory named after
/// the archive's file stem
pub fn derive_output_dir(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = archive.parent().unwrap_or_else(|| Path::new(""));

    parent.join(sanitize_dir_name(&stem))
}

/// Render a command line for logs, quoting arguments that contain spaces
pub fn render_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(|a| a.as_os_str()))
        .map(|part| {
            let part = part.to_string_lossy();
            if part.contains(' ') {
                format!("\"{}\"", part)
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
