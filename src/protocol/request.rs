//! Request documents for the bulk import/export entry points.

use serde::Serialize;

/// Request document for exporting relations. Relation order is preserved
/// into the document.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRelationsRequest {
    pub relations: Vec<String>,
}

impl ExportRelationsRequest {
    pub fn new<S: AsRef<str>>(relations: &[S]) -> Self {
        Self {
            relations: relations.iter().map(|name| name.as_ref().to_string()).collect(),
        }
    }
}

/// Request document for importing relations out of a backup file.
#[derive(Debug, Clone, Serialize)]
pub struct ImportFromBackupRequest {
    pub path: String,
    pub relations: Vec<String>,
}

impl ImportFromBackupRequest {
    pub fn new<S: AsRef<str>>(path: &str, relations: &[S]) -> Self {
        Self {
            path: path.to_string(),
            relations: relations.iter().map(|name| name.as_ref().to_string()).collect(),
        }
    }
}
