//! Conversions between file paths, `file://` URIs, and display strings.

use camino::{Utf8Path, Utf8PathBuf};
use lsp_types::{Location, Uri};
use url::Url;

use crate::error::ModelError;

/// Converts a URI to a path for display.
///
/// `file://` URIs are percent-decoded into platform paths. Any other scheme
/// is returned verbatim so virtual documents still render.
#[must_use]
pub fn uri_to_path(uri: &Uri) -> Utf8PathBuf {
    let text = uri.as_str();
    Url::parse(text)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .and_then(|path| Utf8PathBuf::try_from(path).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(text))
}

/// Converts a path to a `file://` URI.
///
/// # Errors
///
/// Returns a `ModelError` if the path is relative or the URI is rejected.
pub fn path_to_uri(path: &Utf8Path) -> Result<Uri, ModelError> {
    let url = Url::from_file_path(path.as_std_path()).map_err(|()| {
        ModelError::io(
            format!("failed to convert path to URI: {path}"),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path must be absolute"),
        )
    })?;

    url.as_str().parse().map_err(|_| {
        ModelError::io(
            format!("failed to parse URI: {}", url.as_str()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid URI"),
        )
    })
}

/// Formats a call site as `path:line:column`, 1-based for humans.
#[must_use]
pub fn display_location(location: &Location) -> String {
    let start = location.range.start;
    format!(
        "{}:{}:{}",
        uri_to_path(&location.uri),
        start.line.saturating_add(1),
        start.character.saturating_add(1)
    )
}
