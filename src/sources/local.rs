use async_trait::async_trait;
use log::info;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::FetchError;
use crate::file_utils::FileManager;
use super::{SourceDocument, SourceKind, SourceProvider};

/// Reads a document from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSource;

#[async_trait]
impl SourceProvider for LocalFileSource {
    async fn fetch(&self, locator: &str) -> Result<SourceDocument, FetchError> {
        let path = Path::new(locator);
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::NotFound(locator.to_string()));
            }
            Err(e) => return Err(FetchError::Io(e)),
        };
        info!("Read {} bytes from {}", text.len(), path.display());

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(SourceDocument {
            name: FileManager::sanitize_file_name(&stem),
            locator: locator.to_string(),
            title: Some(stem),
            text,
            kind: SourceKind::LocalFile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_withExistingFile_shouldReadTextAndName() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release notes.md");
        std::fs::write(&path, "# Notes\nShipped.").unwrap();

        let document = LocalFileSource.fetch(path.to_str().unwrap()).await.unwrap();

        assert_eq!(document.text, "# Notes\nShipped.");
        assert_eq!(document.name, "release_notes");
        assert_eq!(document.kind, SourceKind::LocalFile);
    }

    #[tokio::test]
    async fn test_fetch_withMissingFile_shouldBeNotFound() {
        let result = LocalFileSource.fetch("/definitely/not/here.md").await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }
}
