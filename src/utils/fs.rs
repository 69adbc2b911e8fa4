//! 文件系统工具
//!
//! 资源目录的准备、整体删除和按模式扫描。favicon 包的部署流程
//! 每次保存都会整体替换资源目录，这里的原语刻意保持简单：
//! 删除不存在的目录视为成功，扫描时无法读取的子目录被跳过。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

/// 确保目录存在并规范化其权限
///
/// 目录不存在时创建（包括父目录），已存在时仅调整权限。
pub fn prepare_directory(directory: &Path) -> io::Result<()> {
    if !directory.is_dir() {
        fs::create_dir_all(directory)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = fs::metadata(directory)?.permissions();
        permissions.set_mode(0o775);
        fs::set_permissions(directory, permissions)?;
    }

    Ok(())
}

/// 递归删除目录
///
/// 幂等：目录不存在时返回 Ok。
pub fn delete_recursive(directory: &Path) -> io::Result<()> {
    match fs::remove_dir_all(directory) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error),
    }
}

/// 递归扫描目录，返回文件名匹配给定模式的所有文件
///
/// 结果按路径排序。无法读取的子目录会被跳过而不是报错，
/// 与部署流程"静默跳过"的整体错误策略一致。
pub fn scan_directory(directory: &Path, pattern: &Regex) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    collect_matches(directory, pattern, &mut matches);
    matches.sort();
    matches
}

fn collect_matches(directory: &Path, pattern: &Regex, matches: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(directory) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_matches(&path, pattern, matches);
        } else if let Some(file_name) = path.file_name() {
            if pattern.is_match(&file_name.to_string_lossy()) {
                matches.push(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_directory_creates_missing_tree() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");

        prepare_directory(&nested).unwrap();

        assert!(nested.is_dir());
    }

    #[test]
    fn test_delete_recursive_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("assets");

        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("nested/icon.png"), b"data").unwrap();

        delete_recursive(&target).unwrap();
        assert!(!target.exists());

        // Deleting again must not error
        delete_recursive(&target).unwrap();
    }

    #[test]
    fn test_scan_directory_matches_file_names_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("favicon.png"), b"png").unwrap();
        fs::write(root.join("readme.txt"), b"txt").unwrap();
        fs::write(root.join("nested/touch-icon.PNG"), b"png").unwrap();

        let pattern = Regex::new(r"(?i)\.png$").unwrap();
        let found = scan_directory(root, &pattern);

        assert_eq!(found.len(), 2);
        assert!(found.contains(&root.join("favicon.png")));
        assert!(found.contains(&root.join("nested/touch-icon.PNG")));
    }

    #[test]
    fn test_scan_directory_missing_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = Regex::new(r"(?i)\.png$").unwrap();

        let found = scan_directory(&temp_dir.path().join("nope"), &pattern);

        assert!(found.is_empty());
    }
}
