//! Delivery collaborators: download filenames and share attachment payloads.
//!
//! These are the two consumers of a finished [`PdfDocument`]: the browser
//! download (here: a file written under the derived name) and the email
//! share dialog, which takes the document as a base64 attachment payload.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::export::PdfDocument;

/// Basename used when the resume has no title.
pub const DEFAULT_BASENAME: &str = "resume";

/// Derive the download filename from a resume title, defaulting to
/// "resume.pdf" for untitled documents. Path-hostile characters are
/// replaced, nothing else is normalized.
pub fn download_filename(title: Option<&str>) -> String {
    let base = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_BASENAME);
    let safe: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("{}.pdf", safe)
}

/// Write the document into `dir` under the derived filename, the way a
/// browser download lands the artifact on disk.
pub fn save_download(doc: &PdfDocument, title: Option<&str>, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(download_filename(title));
    fs::write(&path, doc.as_bytes())
        .map_err(|e| Error::Other(format!("failed to write {}: {}", path.display(), e)))?;
    log::info!("download saved to {}", path.display());
    Ok(path)
}

/// Attachment payload handed to the email-share dialog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAttachment {
    pub filename: String,
    pub mime_type: String,
    pub content_base64: String,
}

/// Package the document as a share attachment.
pub fn attachment_payload(doc: &PdfDocument, title: Option<&str>) -> EmailAttachment {
    EmailAttachment {
        filename: download_filename(title),
        mime_type: "application/pdf".to_string(),
        content_base64: base64::engine::general_purpose::STANDARD.encode(doc.as_bytes()),
    }
}
