//! Filename sanitation for uploaded files.

use std::path::Path;

/// Maximum length of a sanitized filename stem.
const MAX_STEM_LEN: usize = 200;

/// Sanitize an uploaded filename for safe filesystem usage.
///
/// Strips any path components, keeps alphanumerics, `-`, `_` and `.`,
/// replaces whitespace with `_`, drops everything else, and bounds the
/// stem length. The extension is preserved (lowercased) so classification
/// of the stored file matches classification of the upload.
pub fn sanitize_filename(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else if c.is_whitespace() {
                '_'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .take(MAX_STEM_LEN)
        .collect();

    let stem = if sanitized.is_empty() {
        "unnamed_file".to_string()
    } else {
        sanitized
    };

    match ext {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_safe_names() {
        assert_eq!(sanitize_filename("IMG_0042.JPG"), "IMG_0042.jpg");
        assert_eq!(sanitize_filename("base-station.obs"), "base-station.obs");
    }

    #[test]
    fn test_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/run 1.csv"), "run_1.csv");
    }

    #[test]
    fn test_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("vol du matin.csv"), "vol_du_matin.csv");
        assert_eq!(sanitize_filename("a<>:\"|?*b.log"), "ab.log");
    }

    #[test]
    fn test_empty_stem_fallback() {
        assert_eq!(sanitize_filename("???.pdf"), "unnamed_file.pdf");
    }

    #[test]
    fn test_stem_length_bounded() {
        let long = "a".repeat(300) + ".csv";
        let out = sanitize_filename(&long);
        assert_eq!(out.len(), MAX_STEM_LEN + ".csv".len());
    }
}
