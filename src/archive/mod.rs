//! # 包处理模块
//!
//! 管理员上传的 favicon 包是一个 zip 压缩档，这个模块负责：
//!
//! - 通过文件签名识别包格式（不认识的格式静默忽略）
//! - 打开并解包 zip 档
//! - `PackageDeployer` - 订阅设置生命周期，保存时整体替换资源目录，
//!   删除时移除资源目录
//!
//! 部署是破坏性的 last-writer-wins 替换，没有部分失败恢复：
//! 解包中途失败留下什么就是什么，交由下一次保存覆盖。

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

use crate::settings::{FaviconSettings, SettingsSubscriber};
use crate::utils::fs::{delete_recursive, prepare_directory};

// Zip local-file-header, empty-archive and spanned-archive signatures
const ZIP_SIGNATURES: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

/// 包处理错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read package file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable zip package: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// 根据文件签名判断路径是否指向可识别的包格式
///
/// 读不到签名（文件缺失、过短、无权限）一律视为不可识别。
pub fn is_recognized_package(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut signature = [0u8; 4];
    if file.read_exact(&mut signature).is_err() {
        return false;
    }

    ZIP_SIGNATURES.iter().any(|known| &signature[..] == *known)
}

/// 已打开的 zip 包
pub struct ZipPackage {
    archive: ZipArchive<File>,
}

impl ZipPackage {
    /// 打开路径上的 zip 包
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;

        Ok(Self {
            archive: ZipArchive::new(file)?,
        })
    }

    /// 包内条目数量
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// 将包内全部内容解出到目标目录
    pub fn extract(&mut self, destination: &Path) -> Result<(), ArchiveError> {
        self.archive.extract(destination)?;

        Ok(())
    }
}

/// favicon 包的部署订阅者
///
/// 保存：记录引用了可识别的包文件时，准备资源目录、递归删除旧内容、
/// 解出新包。记录没有上传文件或格式不可识别时不做任何事，也不报错。
/// 删除：递归移除资源目录（幂等）。
pub struct PackageDeployer {
    assets_dir: PathBuf,
}

impl PackageDeployer {
    pub fn new(assets_dir: PathBuf) -> Self {
        Self { assets_dir }
    }

    fn deploy(&self, package_path: &Path) {
        let mut package = match ZipPackage::open(package_path) {
            Ok(package) => package,
            Err(error) => {
                tracing::warn!(
                    "failed to open favicon package {}: {}",
                    package_path.display(),
                    error
                );
                return;
            }
        };

        if let Err(error) = prepare_directory(&self.assets_dir) {
            tracing::warn!(
                "failed to prepare assets directory {}: {}",
                self.assets_dir.display(),
                error
            );
            return;
        }

        if let Err(error) = delete_recursive(&self.assets_dir) {
            tracing::warn!(
                "failed to clear assets directory {}: {}",
                self.assets_dir.display(),
                error
            );
            return;
        }

        // 并发读者可能在删除和解包之间观察到空目录或不完整的树；
        // 这里不做原子替换，沿用整体替换语义。
        match package.extract(&self.assets_dir) {
            Ok(()) => tracing::info!(
                "deployed favicon package ({} entries) into {}",
                package.len(),
                self.assets_dir.display()
            ),
            Err(error) => tracing::warn!(
                "failed to extract favicon package {}: {}",
                package_path.display(),
                error
            ),
        }
    }
}

impl SettingsSubscriber for PackageDeployer {
    fn on_pre_save(&self, settings: &FaviconSettings) {
        let Some(file) = settings.file.as_deref().filter(|file| !file.is_empty()) else {
            return;
        };

        let package_path = Path::new(file);
        if !package_path.is_file() {
            tracing::debug!("favicon package {} is absent, skipping deploy", file);
            return;
        }
        if !is_recognized_package(package_path) {
            tracing::debug!("{} is not a recognized package format, skipping deploy", file);
            return;
        }

        self.deploy(package_path);
    }

    fn on_pre_delete(&self, _settings: &FaviconSettings) {
        if let Err(error) = delete_recursive(&self.assets_dir) {
            tracing::warn!(
                "failed to remove assets directory {}: {}",
                self.assets_dir.display(),
                error
            );
        }
    }
}
