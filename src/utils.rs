use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents).context(format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Create a directory and any missing parents.
pub(crate) fn make_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)
        .with_context(|| format!("Unable to create directory {}", path.display()))
}

/// Canonicalize a path that must exist.
pub(crate) fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    std::fs::canonicalize(path)
        .with_context(|| format!("Unable to canonicalize the path {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_write_and_read() {
        let env = TestEnv::new();
        let path = env.path("a.txt");
        write(&path, "hello").unwrap();
        assert_eq!(read(&path).unwrap(), "hello");
    }

    #[test]
    fn test_read_missing_has_path_in_error() {
        let env = TestEnv::new();
        let err = read(env.path("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_make_dir_nested() {
        let env = TestEnv::new();
        let dir = env.path("x/y/z");
        make_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(canonicalize(&dir).unwrap().is_absolute());
    }
}
