use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

static UNSAFE_FILE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9._-]+").expect("file name pattern is valid")
});

// @const: Extensions accepted as local documents
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Name usable as a file name on every platform
    pub fn sanitize_file_name(name: &str) -> String {
        let cleaned = UNSAFE_FILE_CHARS.replace_all(name.trim(), "_");
        let cleaned = cleaned.trim_matches(|c| c == '_' || c == '.');
        if cleaned.is_empty() {
            "document".to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Find local documents below `dir`, sorted by path
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_document(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @checks: Extension is one of DOCUMENT_EXTENSIONS
    pub fn is_document<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                DOCUMENT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Write `content` as `file_name` inside `dir`, returning the full path
    pub fn write_report<P: AsRef<Path>>(dir: P, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = dir.as_ref().join(Self::sanitize_file_name(file_name));
        Self::write_to_file(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitizeFileName_shouldReplaceUnsafeRuns() {
        assert_eq!(FileManager::sanitize_file_name("octo/demo"), "octo_demo");
        assert_eq!(FileManager::sanitize_file_name("release notes (v2)"), "release_notes_v2");
        assert_eq!(FileManager::sanitize_file_name("rust_summary.md"), "rust_summary.md");
        assert_eq!(FileManager::sanitize_file_name("../"), "document");
    }

    #[test]
    fn test_isDocument_shouldMatchKnownExtensionsIgnoringCase() {
        assert!(FileManager::is_document("a/README.MD"));
        assert!(FileManager::is_document("notes.txt"));
        assert!(!FileManager::is_document("image.png"));
        assert!(!FileManager::is_document("Makefile"));
    }
}
