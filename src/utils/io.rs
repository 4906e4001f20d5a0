//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("{} {}", operation, path.display())),
        )
    })
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers see either the old content or the new content, never a partial write.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!(".{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })?;

    Ok(())
}

/// List regular files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "const obsId = 1;").unwrap();

        let content = read_file(temp.path(), "read source").unwrap();
        assert!(content.contains("obsId"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/spec.test.ts"), "read source");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.test.ts");
        fs::write(&path, "old\n").unwrap();

        write_file_atomic(&path, "new\n", "write source").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!dir.path().join(".a.test.ts.tmp").exists());
    }

    #[test]
    fn write_file_atomic_fails_for_missing_dir() {
        let result = write_file_atomic(
            Path::new("/nonexistent/dir/file.ts"),
            "content",
            "write source",
        );
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
    }

    #[test]
    fn list_files_is_sorted_and_skips_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.ts"), "").unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
    }
}
