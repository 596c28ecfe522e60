//! MIME type lookup for single-file retrieval.

/// Guess the MIME type from a filename extension. Returns `None` for
/// unrecognized extensions; callers fall back to `application/octet-stream`.
pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tif" | "tiff" => "image/tiff",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "gpx" => "application/gpx+xml",
        "kml" => "application/vnd.google-earth.kml+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_from_filename("photo.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_filename("positions.csv"), Some("text/csv"));
        assert_eq!(mime_from_filename("flight.tlog"), None);
        assert_eq!(mime_from_filename("noext"), None);
    }
}
