//! Entity document discovery

use crate::diagnostics::EtchResult;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds `<kind>s/dpi*.xml` files below a documentation root
pub struct DocDetector {
    root: PathBuf,
}

impl DocDetector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entity documents exactly one directory below the root, sorted by
    /// their path relative to it.
    ///
    /// Any entry that cannot be read, including a dangling symlink, is an
    /// error.
    pub fn find_entity_files(&self) -> EtchResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .follow_links(true)
        {
            let entry = entry?;
            let is_entity = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("dpi") && name.ends_with(".xml"));
            if is_entity && entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        files.sort_by(|a, b| {
            let a = a.strip_prefix(&self.root).unwrap_or(a);
            let b = b.strip_prefix(&self.root).unwrap_or(b);
            a.cmp(b)
        });
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<document/>").unwrap();
    }

    #[test]
    fn test_empty_root() {
        let temp = TempDir::new().unwrap();
        assert!(DocDetector::new(temp.path()).find_entity_files().unwrap().is_empty());
    }

    #[test]
    fn test_finds_and_sorts() {
        let temp = TempDir::new().unwrap();
        for rel in [
            "structs/dpiErrorInfo.xml",
            "enums/dpiAuthMode.xml",
            "functions/dpiConn.xml",
            "enums/dpiExecMode.xml",
            "user_guide/round_trips.xml",
            "dpiTopLevel.xml",
            "structs/nested/dpiDeep.xml",
            "structs/dpiNotes.txt",
        ] {
            touch(temp.path(), rel);
        }

        let detector = DocDetector::new(temp.path());
        let found: Vec<String> = detector
            .find_entity_files()
            .unwrap()
            .iter()
            .map(|p| {
                p.strip_prefix(detector.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(
            found,
            vec![
                "enums/dpiAuthMode.xml",
                "enums/dpiExecMode.xml",
                "functions/dpiConn.xml",
                "structs/dpiErrorInfo.xml",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_error() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "enums/dpiAuthMode.xml");
        fs::create_dir_all(temp.path().join("structs")).unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("missing.xml"),
            temp.path().join("structs/dpiExample.xml"),
        )
        .unwrap();

        let err = DocDetector::new(temp.path()).find_entity_files().unwrap_err();
        assert!(matches!(err, crate::diagnostics::EtchError::Walk(_)));
    }
}
