//! Common test fixtures for gbkx testing

use crate::TestDir;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Local file header signature of a ZIP archive
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Creates a placeholder archive; its content is never parsed by gbkx
pub fn create_archive(test_dir: &TestDir, name: &str) -> Result<PathBuf> {
    test_dir.create_file(name, ZIP_MAGIC)
}

/// Writes a configuration record in the on-disk format
pub fn write_config(
    path: &Path,
    sevenzip_path: Option<&Path>,
    encoding: &str,
) -> Result<()> {
    let mut record = serde_json::Map::new();
    if let Some(sevenzip_path) = sevenzip_path {
        record.insert(
            "sevenzip_path".to_string(),
            serde_json::Value::String(sevenzip_path.to_string_lossy().into_owned()),
        );
    }
    record.insert(
        "encoding".to_string(),
        serde_json::Value::String(encoding.to_string()),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

/// Reads a configuration record back as raw JSON
pub fn read_config(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
