//! MIME type detection module
//!
//! Returns the Content-Type for a file based on its extension. The table is
//! fixed; anything not listed is served as `application/octet-stream`.

use std::path::Path;

/// Content type served for HTML documents and the SPA fallback.
pub const HTML: &str = "text/html";

/// Get MIME Content-Type based on file extension (matched case-insensitively).
///
/// # Examples
/// ```
/// use spa_proxy::static_files::mime::content_type;
/// assert_eq!(content_type(Some("js")), "application/javascript");
/// assert_eq!(content_type(Some("WOFF2")), "font/woff2");
/// assert_eq!(content_type(None), "application/octet-stream");
/// ```
pub fn content_type(extension: Option<&str>) -> &'static str {
    let Some(extension) = extension else {
        return "application/octet-stream";
    };

    match extension.to_ascii_lowercase().as_str() {
        "html" => HTML,
        "js" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",

        "wasm" => "application/wasm",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",

        _ => "application/octet-stream",
    }
}

/// Content type for a resolved file path.
pub fn content_type_for(path: &Path) -> &'static str {
    content_type(path.extension().and_then(|e| e.to_str()))
}
