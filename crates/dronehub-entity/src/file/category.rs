//! File category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a mission file, deciding which subdirectory it is stored in.
///
/// The set is closed: unrecognized extensions fall back to [`Autres`].
///
/// [`Autres`]: FileCategory::Autres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Photogrammetry imagery.
    Images,
    /// Flight controller logs.
    Logs,
    /// Geo-referencing position data.
    Geopos,
    /// PPK correction data.
    Ppk,
    /// Mission reports and deliverables.
    Rapport,
    /// Catch-all for unrecognized extensions.
    Autres,
}

impl FileCategory {
    /// The five real categories, in storage-tree order. The fallback is
    /// excluded; its subdirectory is only created when first used.
    pub const KNOWN: [FileCategory; 5] = [
        Self::Images,
        Self::Logs,
        Self::Geopos,
        Self::Ppk,
        Self::Rapport,
    ];

    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Logs => "logs",
            Self::Geopos => "geopos",
            Self::Ppk => "ppk",
            Self::Rapport => "rapport",
            Self::Autres => "autres",
        }
    }

    /// Whether this is the fallback category.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Autres)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "images" => Ok(Self::Images),
            "logs" => Ok(Self::Logs),
            "geopos" => Ok(Self::Geopos),
            "ppk" => Ok(Self::Ppk),
            "rapport" => Ok(Self::Rapport),
            "autres" => Ok(Self::Autres),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for cat in FileCategory::KNOWN {
            assert_eq!(cat.as_str().parse::<FileCategory>(), Ok(cat));
        }
        assert_eq!("autres".parse::<FileCategory>(), Ok(FileCategory::Autres));
        assert!("video".parse::<FileCategory>().is_err());
    }

    #[test]
    fn test_fallback_not_in_known() {
        assert!(!FileCategory::KNOWN.contains(&FileCategory::Autres));
        assert!(FileCategory::Autres.is_fallback());
    }
}
