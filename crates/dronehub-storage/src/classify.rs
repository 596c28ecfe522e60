//! Extension-based file classification.
//!
//! Pure, total functions over the configured extension table: every
//! filename maps to exactly one category, with the fallback category for
//! unrecognized or missing extensions.

use dronehub_core::config::ExtensionTable;
use dronehub_entity::file::FileCategory;

/// Classifies filenames into categories by extension.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    table: ExtensionTable,
}

impl FileClassifier {
    /// Create a classifier over the given extension table.
    pub fn new(table: ExtensionTable) -> Self {
        Self { table }
    }

    /// Extract the lowercase extension (substring after the last `.`).
    fn extension(filename: &str) -> Option<String> {
        filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != filename && !ext.is_empty())
            .map(|ext| ext.to_lowercase())
    }

    /// Extension lists in fixed lookup order; the first category claiming
    /// an extension wins.
    fn entries(&self) -> [(FileCategory, &[String]); 5] {
        [
            (FileCategory::Images, self.table.images.as_slice()),
            (FileCategory::Logs, self.table.logs.as_slice()),
            (FileCategory::Geopos, self.table.geopos.as_slice()),
            (FileCategory::Ppk, self.table.ppk.as_slice()),
            (FileCategory::Rapport, self.table.rapport.as_slice()),
        ]
    }

    /// Determine the category for a filename. Total: unrecognized or
    /// missing extensions yield the fallback category.
    pub fn category_for(&self, filename: &str) -> FileCategory {
        let Some(ext) = Self::extension(filename) else {
            return FileCategory::Autres;
        };
        for (category, extensions) in self.entries() {
            if extensions.iter().any(|e| *e == ext) {
                return category;
            }
        }
        FileCategory::Autres
    }

    /// Whether the filename's extension is acceptable — overall, or for
    /// one specific category when given.
    pub fn is_allowed(&self, filename: &str, category: Option<FileCategory>) -> bool {
        let Some(ext) = Self::extension(filename) else {
            return false;
        };
        match category {
            Some(cat) => self
                .entries()
                .iter()
                .find(|(c, _)| *c == cat)
                .is_some_and(|(_, extensions)| extensions.iter().any(|e| *e == ext)),
            None => self
                .entries()
                .iter()
                .any(|(_, extensions)| extensions.iter().any(|e| *e == ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FileClassifier {
        FileClassifier::new(ExtensionTable::default())
    }

    #[test]
    fn test_category_by_extension() {
        let c = classifier();
        assert_eq!(c.category_for("IMG_0042.JPG"), FileCategory::Images);
        assert_eq!(c.category_for("flight.tlog"), FileCategory::Logs);
        assert_eq!(c.category_for("positions.csv"), FileCategory::Geopos);
        assert_eq!(c.category_for("base.obs"), FileCategory::Ppk);
        assert_eq!(c.category_for("survey.pdf"), FileCategory::Rapport);
    }

    #[test]
    fn test_fallback_for_unknown_or_missing_extension() {
        let c = classifier();
        assert_eq!(c.category_for("clip.mp4"), FileCategory::Autres);
        assert_eq!(c.category_for("README"), FileCategory::Autres);
        assert_eq!(c.category_for("trailing."), FileCategory::Autres);
    }

    #[test]
    fn test_ambiguous_extension_first_category_wins() {
        // `txt` appears in both logs and geopos; logs is declared first.
        let c = classifier();
        assert_eq!(c.category_for("notes.txt"), FileCategory::Logs);
    }

    #[test]
    fn test_is_allowed_overall() {
        let c = classifier();
        assert!(c.is_allowed("a.jpeg", None));
        assert!(!c.is_allowed("a.mp4", None));
        assert!(!c.is_allowed("no_extension", None));
    }

    #[test]
    fn test_is_allowed_for_category() {
        let c = classifier();
        assert!(c.is_allowed("track.gpx", Some(FileCategory::Geopos)));
        assert!(!c.is_allowed("track.gpx", Some(FileCategory::Images)));
        // txt is valid for geopos directly even though logs claims it first.
        assert!(c.is_allowed("points.txt", Some(FileCategory::Geopos)));
    }
}
