//! File system helpers shared by the registry and the emitters.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// Fails if `path` exists but is not a directory.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
    } else if !path.is_dir() {
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        ))
    } else {
        Ok(())
    }
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Write content to a sibling `.tmp` file
/// 2. Sync it to disk
/// 3. Rename it over the target
///
/// Parent directories are created. Readers never observe a half-written file.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)
}

/// Lexically normalizes a path, resolving `.` and `..` without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Path of `target` relative to the directory `base`.
///
/// Both paths are normalized first. When they share no root (different
/// drives, or one relative and one absolute) `target` is returned unchanged.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base = normalize_path(base);
    let target = normalize_path(target);

    if base.has_root() != target.has_root() {
        return target;
    }

    let base_parts: Vec<_> = base.components().collect();
    let target_parts: Vec<_> = target.components().collect();
    let common = base_parts.iter().zip(&target_parts).take_while(|(a, b)| a == b).count();

    if common == 0 && base.has_root() {
        return target;
    }

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &target_parts[common..] {
        result.push(part.as_os_str());
    }
    result
}

/// Render a path the way project descriptors expect it: backslash separated.
///
/// A drive prefix and root are kept, so `/abs/src` becomes `\abs\src`.
pub fn descriptor_path(path: &Path) -> String {
    let mut rendered = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => rendered.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => rendered.push('\\'),
            other => {
                if !rendered.is_empty() && !rendered.ends_with('\\') {
                    rendered.push('\\');
                }
                rendered.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents_and_leaves_no_temp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/out.csproj");

        atomic_write(&path, b"content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
        assert!(!temp.path().join("a/b/out.csproj.tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.txt");
        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_ensure_dir_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "").unwrap();
        assert!(ensure_dir(&file).is_err());
        assert!(ensure_dir(&temp.path().join("new/dir")).is_ok());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/work/out/vs"), Path::new("/work/src/Common")),
            PathBuf::from("../../src/Common")
        );
        assert_eq!(
            relative_path(Path::new("out"), Path::new("out/bin")),
            PathBuf::from("bin")
        );
        assert_eq!(relative_path(Path::new("a/b"), Path::new("a/b")), PathBuf::new());
    }

    #[test]
    fn test_descriptor_path_uses_backslashes() {
        assert_eq!(descriptor_path(Path::new("../../src/Common/Main.cs")), "..\\..\\src\\Common\\Main.cs");
    }

    #[test]
    fn test_descriptor_path_keeps_root() {
        assert_eq!(descriptor_path(Path::new("/abs/src/Main.cs")), "\\abs\\src\\Main.cs");
        assert_eq!(descriptor_path(Path::new("Main.cs")), "Main.cs");
    }
}
