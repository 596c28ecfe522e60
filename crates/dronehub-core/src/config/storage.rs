//! Mission storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory under which every mission directory tree lives.
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
    /// Scratch directory for freshly built archives. Archives are not
    /// auto-deleted; the caller owns cleanup after sending.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
    /// Maximum accepted size for a single uploaded file, in bytes
    /// (default 500 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Recognized file extensions per category.
    #[serde(default)]
    pub extensions: ExtensionTable,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: default_upload_root(),
            scratch_dir: default_scratch_dir(),
            max_upload_size_bytes: default_max_upload(),
            extensions: ExtensionTable::default(),
        }
    }
}

/// Extension lists per file category. Lookup order is fixed: images, logs,
/// geopos, ppk, rapport — the first category claiming an extension wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionTable {
    /// Photogrammetry imagery.
    #[serde(default = "default_images")]
    pub images: Vec<String>,
    /// Flight controller logs.
    #[serde(default = "default_logs")]
    pub logs: Vec<String>,
    /// Geo-referencing position data.
    #[serde(default = "default_geopos")]
    pub geopos: Vec<String>,
    /// PPK correction data.
    #[serde(default = "default_ppk")]
    pub ppk: Vec<String>,
    /// Mission reports and deliverables.
    #[serde(default = "default_rapport")]
    pub rapport: Vec<String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            images: default_images(),
            logs: default_logs(),
            geopos: default_geopos(),
            ppk: default_ppk(),
            rapport: default_rapport(),
        }
    }
}

fn default_upload_root() -> String {
    "./missions".to_string()
}

fn default_scratch_dir() -> String {
    "./data/temp".to_string()
}

fn default_max_upload() -> u64 {
    524_288_000 // 500 MB
}

fn default_images() -> Vec<String> {
    to_vec(&["jpg", "jpeg", "png", "tif", "tiff"])
}

fn default_logs() -> Vec<String> {
    to_vec(&["tlog", "log", "txt"])
}

fn default_geopos() -> Vec<String> {
    to_vec(&["csv", "txt", "gpx", "kml"])
}

fn default_ppk() -> Vec<String> {
    to_vec(&["obs", "nav", "sp3", "rinex"])
}

fn default_rapport() -> Vec<String> {
    to_vec(&["pdf", "docx", "xlsx", "zip"])
}

fn to_vec(exts: &[&str]) -> Vec<String> {
    exts.iter().map(|e| e.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extension_table() {
        let table = ExtensionTable::default();
        assert!(table.images.contains(&"tiff".to_string()));
        assert!(table.geopos.contains(&"csv".to_string()));
        assert!(table.rapport.contains(&"zip".to_string()));
    }

    #[test]
    fn test_default_upload_limit() {
        let cfg = StorageConfig::default();
        assert_eq!(cfg.max_upload_size_bytes, 500 * 1024 * 1024);
    }
}
