//! Content types for served files.

use std::path::Path;

/// Fallback for unknown or missing extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for `path`, chosen by extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("app.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("styles.css")), "text/css; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("data/agents.json")),
            "application/json; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("a/logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("favicon.ico")), "image/x-icon");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for(Path::new("INDEX.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("Logo.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(content_type_for(Path::new("archive.tar.gz")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("photo.jpeg")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new("Makefile")), OCTET_STREAM);
        assert_eq!(content_type_for(Path::new(".hidden")), OCTET_STREAM);
    }
}
