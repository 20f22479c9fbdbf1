//! Header normalization: accent- and case-insensitive canonical form.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::cell::CellValue;

/// Canonicalize a raw header so that `"Código "`, `"codigo"` and `"CODIGO"`
/// compare equal.
///
/// Lower-cases, decomposes (NFD), drops combining marks, trims. Never fails:
/// unusable input degrades to an empty string.
pub fn normalize_header(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped.trim().to_string()
}

impl CellValue {
    /// Header form of a cell; blank cells normalize to `""`.
    pub fn normalized_header(&self) -> String {
        self.as_text()
            .map(|text| normalize_header(&text))
            .unwrap_or_default()
    }
}
