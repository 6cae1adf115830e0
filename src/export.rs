//! Export payloads for generated documents.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Metadata for an exported file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Download filename with extension
    pub filename: String,
    /// MIME type (e.g., "application/pdf")
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: usize,
}

/// File content with metadata and base64-encoded data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub metadata: FileMetadata,
    /// Base64-encoded file data
    pub data: String,
}

impl ExportFile {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            metadata: FileMetadata {
                filename: filename.into(),
                mime_type: mime_type.into(),
                size_bytes: data.len(),
            },
            data: BASE64.encode(data),
        }
    }

    pub fn pdf(filename: impl Into<String>, data: &[u8]) -> Self {
        Self::new(filename, PDF_MIME_TYPE, data)
    }

    /// Decode base64 data back to bytes.
    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

/// Inline `data:` URI for previewing a PDF without downloading it.
pub fn preview_data_uri(pdf: &[u8]) -> String {
    format!("data:{};base64,{}", PDF_MIME_TYPE, BASE64.encode(pdf))
}

/// Content-Disposition header value for a download.
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_roundtrip() {
        let file = ExportFile::pdf("certificate-ana-lopez.pdf", b"%PDF-1.5 body");
        assert_eq!(file.metadata.mime_type, "application/pdf");
        assert_eq!(file.metadata.size_bytes, 13);
        assert_eq!(file.decode_data().unwrap(), b"%PDF-1.5 body");
    }

    #[test]
    fn test_export_file_serializes_camel_case() {
        let file = ExportFile::pdf("a.pdf", b"x");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["metadata"]["mimeType"], "application/pdf");
        assert_eq!(json["metadata"]["sizeBytes"], 1);
    }

    #[test]
    fn test_preview_data_uri() {
        assert_eq!(preview_data_uri(b"abc"), "data:application/pdf;base64,YWJj");
    }

    #[test]
    fn test_attachment_disposition_strips_quotes() {
        assert_eq!(
            attachment_disposition("a\"b.pdf"),
            "attachment; filename=\"ab.pdf\""
        );
    }
}
