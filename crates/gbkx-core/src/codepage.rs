//! Well-known Windows code pages accepted by 7-Zip's `-mcp` switch

/// Code pages listed in help and the configuration wizard
pub const COMMON_CODE_PAGES: &[(&str, &str)] = &[
    ("936", "GBK (Simplified Chinese)"),
    ("950", "Big5 (Traditional Chinese)"),
    ("65001", "UTF-8"),
    ("932", "Shift-JIS (Japanese)"),
    ("949", "EUC-KR (Korean)"),
];

/// Human-readable name of a code page, if it is one of the common ones
pub fn describe(code: &str) -> Option<&'static str> {
    COMMON_CODE_PAGES
        .iter()
        .find(|(known, _)| *known == code.trim())
        .map(|(_, name)| *name)
}

/// Format a code page as `936 (GBK (Simplified Chinese))`, or just the code
pub fn label(code: &str) -> String {
    match describe(code) {
        Some(name) => format!("{} ({})", code, name),
        None => code.to_string(),
    }
}
