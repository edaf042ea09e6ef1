/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use tracesum::file_utils::FileManager;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "notes.md", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that find_documents walks subdirectories and filters by extension
#[test]
fn test_find_documents_withNestedTree_shouldReturnSortedDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "b.md", "b")?;
    common::create_test_file(temp_dir.path(), "a.TXT", "a")?;
    common::create_test_file(temp_dir.path(), "image.png", "x")?;
    common::create_test_file(&nested, "c.markdown", "c")?;

    let found = FileManager::find_documents(temp_dir.path())?;

    let names: Vec<String> = found.iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.TXT", "b.md", "nested/c.markdown"]);
    Ok(())
}

/// Test that write_report creates missing directories and sanitizes the name
#[test]
fn test_write_report_withMissingDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out = temp_dir.path().join("deep").join("reports");

    let path = FileManager::write_report(&out, "octo/demo_summary.md", "# Report")?;

    assert_eq!(path, out.join("octo_demo_summary.md"));
    assert_eq!(fs::read_to_string(path)?, "# Report");
    Ok(())
}
