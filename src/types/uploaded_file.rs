use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file the backend accepted, as returned by `POST /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    /// Identifier to pass back in `file_ids`.
    pub file_id: String,

    /// Sanitized name the server stored the file under.
    pub filename: String,

    /// `indexed` once the backend built embeddings, `uploaded` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UploadedFile {
    /// Create a reference without indexing status.
    pub fn new(file_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            filename: filename.into(),
            status: None,
        }
    }

    /// Whether the backend reported the file as searchable.
    pub fn is_indexed(&self) -> bool {
        self.status.as_deref() == Some("indexed")
    }
}

/// A file selected for upload, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Name sent as the multipart file name.
    pub filename: String,
    /// File contents.
    pub data: Bytes,
}

impl FileUpload {
    /// Create a new upload.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indexed_status() {
        let file: UploadedFile = serde_json::from_value(json!({
            "file_id": "f-1",
            "filename": "notes.txt",
            "status": "indexed",
            "indexed": true
        }))
        .unwrap();
        assert!(file.is_indexed());
        assert!(!UploadedFile::new("f-2", "a.pdf").is_indexed());
    }
}
