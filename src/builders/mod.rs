//! # 构建器模块
//!
//! 从当前设置和资源目录派生最终产物的两个构建器：
//!
//! - `markup` - favicon 标记（重写 link、透传 meta）
//! - `images` - 图标清单（PNG 像素尺寸）
//!
//! 两者遵循同一套 get-or-compute-and-store 缓存纪律：固定键、
//! 永久条目、携带设置失效标签。产物永远可以由当前设置和
//! 目录内容逐字节重derive，缓存只是优化。

pub mod images;
pub mod markup;

use thiserror::Error;

use crate::cache::CacheError;
use crate::settings::SettingsError;

// Re-export commonly used items for convenience
pub use images::{ImageDimensions, ImageInventory, ImageInventoryBuilder, IMAGES_CACHE_KEY};
pub use markup::{MarkupBuilder, MARKUP_CACHE_KEY};

/// 构建器错误
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("inventory envelope error: {0}")]
    Envelope(#[from] serde_json::Error),
}
