//! 图标清单构建器
//!
//! 递归扫描资源目录里的 PNG 文件，从图像头部读取像素尺寸，
//! 生成路径到尺寸的映射。损坏或无法解码的文件静默跳过。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::builders::BuilderError;
use crate::cache::Cache;
use crate::settings::SETTINGS_TAG;
use crate::utils::fs::scan_directory;

/// 图标清单缓存的固定键
pub const IMAGES_CACHE_KEY: &str = "favpack:images";

// Case-insensitive .png suffix, matched against file names
const PNG_PATTERN: &str = r"(?i)\.png$";

/// 图像的像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// 文件路径到像素尺寸的映射
pub type ImageInventory = BTreeMap<String, ImageDimensions>;

/// 图标清单构建器
pub struct ImageInventoryBuilder {
    cache: Arc<Cache>,
    assets_dir: PathBuf,
    pattern: Regex,
}

impl ImageInventoryBuilder {
    pub fn new(cache: Arc<Cache>, assets_dir: PathBuf) -> Self {
        Self {
            cache,
            assets_dir,
            pattern: Regex::new(PNG_PATTERN).expect("static pattern"),
        }
    }

    /// 构建图标清单
    ///
    /// 命中缓存时直接返回缓存值，否则扫描资源目录并把结果
    /// 永久缓存（带设置失效标签）。
    pub fn build(&self) -> Result<ImageInventory, BuilderError> {
        if let Some(cached) = self.cache.get(IMAGES_CACHE_KEY)? {
            return Ok(serde_json::from_slice(&cached)?);
        }

        let mut inventory = ImageInventory::new();
        for path in scan_directory(&self.assets_dir, &self.pattern) {
            // 扫描与读取之间目录可能已被重新部署
            if !path.is_file() {
                continue;
            }
            if let Some(dimensions) = read_dimensions(&path) {
                inventory.insert(path.to_string_lossy().into_owned(), dimensions);
            }
        }

        self.cache
            .set(IMAGES_CACHE_KEY, &serde_json::to_vec(&inventory)?, &[SETTINGS_TAG])?;

        Ok(inventory)
    }
}

/// 从图像头部读取像素尺寸，不解码像素数据
fn read_dimensions(path: &Path) -> Option<ImageDimensions> {
    match ImageReader::open(path) {
        Ok(reader) => match reader.into_dimensions() {
            Ok((width, height)) => Some(ImageDimensions { width, height }),
            Err(error) => {
                tracing::debug!("skipping undecodable image {}: {}", path.display(), error);
                None
            }
        },
        Err(error) => {
            tracing::debug!("skipping unreadable image {}: {}", path.display(), error);
            None
        }
    }
}
