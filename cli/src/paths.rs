//! Image file collection for CLI inputs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recognized image file extensions (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// True if the path has a recognized image extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Collect image files from a mix of file and directory paths.
/// Directories are walked recursively. The result is deduplicated and
/// sorted; unreadable entries are silently skipped.
pub fn collect_images(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for input in inputs {
        if input.is_file() {
            if is_image_file(input) {
                found.insert(input.clone());
            }
        } else if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(Result::ok) {
                let path = entry.path();
                if path.is_file() && is_image_file(path) {
                    found.insert(path.to_path_buf());
                }
            }
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.jpg")));
        assert!(is_image_file(Path::new("a.JPEG")));
        assert!(is_image_file(Path::new("dir/b.webp")));
        assert!(!is_image_file(Path::new("a.txt")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_collect_recursive_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.jpg"), b"x").unwrap();
        fs::write(root.join("b.PNG"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub/c.webp"), b"x").unwrap();

        let images = collect_images(&[root.to_path_buf()]);
        assert_eq!(images.len(), 3);
        assert!(images.iter().all(|p| is_image_file(p)));
    }

    #[test]
    fn test_collect_dedupes_overlapping_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let file = root.join("a.jpg");
        fs::write(&file, b"x").unwrap();

        let images = collect_images(&[root.to_path_buf(), file.clone()]);
        assert_eq!(images, vec![file]);
    }

    #[test]
    fn test_collect_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_images(&[dir.path().to_path_buf()]).is_empty());
        assert!(collect_images(&[]).is_empty());
    }
}
