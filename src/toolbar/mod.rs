//! # 工具栏图标模块
//!
//! 图标清单的消费方：工具栏条目把清单中的某个图像用作自己的图标。
//!
//! - `ToolbarItemSettings` - 条目配置 `{url, target, image, scheme}`，
//!   按条目各自持久化（由调用方负责存储）
//! - `FaviconToolbarItem` - 列出可选图像（宽度超过 100px 的清单项，
//!   附 36×36 的裁剪/缩放预览配方）并记录选中的图像
//!
//! 预览的实际栅格化由外部图像处理服务完成，这里只描述配方。

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builders::ImageDimensions;
use crate::core::{FaviconManager, FavpackError};

/// 图像进入候选列表的最小源宽度（像素）
pub const ICON_MIN_SOURCE_WIDTH: u32 = 100;

/// 预览图标的边长（像素）
pub const ICON_PREVIEW_SIZE: u32 = 36;

/// 条目在工具栏管理界面里的字形
pub const TOOLBAR_ITEM_GLYPH: &str = "shield-virus";

/// “在新窗口打开”复选框对应的 target 值
pub const TARGET_NEW_WINDOW: &str = "_blank";

/// 工具栏条目错误
#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("'{0}' is not one of the inventoried favicon images")]
    UnknownImage(String),
    #[error(transparent)]
    Favpack(#[from] FavpackError),
}

/// 工具栏条目配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarItemSettings {
    pub url: String,
    pub target: String,
    pub image: String,
    pub scheme: String,
}

/// 预览配方中的单个操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewStep {
    /// 左右对称裁剪为正方形
    CropSides,
    /// 缩放到给定尺寸
    Scale { width: u32, height: u32 },
}

/// 交给图像处理服务执行的预览配方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecipe {
    pub steps: Vec<PreviewStep>,
}

impl PreviewRecipe {
    /// 工具栏图标的标准配方：裁剪、缩放到 36×36、再裁剪
    pub fn icon() -> Self {
        Self {
            steps: vec![
                PreviewStep::CropSides,
                PreviewStep::Scale {
                    width: ICON_PREVIEW_SIZE,
                    height: ICON_PREVIEW_SIZE,
                },
                PreviewStep::CropSides,
            ],
        }
    }
}

/// 单选列表中的一个候选图像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconOption {
    /// 清单里的文件路径（选中后写入条目配置）
    pub path: String,
    /// 可公开访问的 URL
    pub public_url: Option<String>,
    pub dimensions: ImageDimensions,
    pub preview: PreviewRecipe,
}

/// 以 favicon 图像为图标的工具栏条目
pub struct FaviconToolbarItem {
    manager: Arc<FaviconManager>,
    settings: ToolbarItemSettings,
}

impl FaviconToolbarItem {
    pub fn new(manager: Arc<FaviconManager>, settings: ToolbarItemSettings) -> Self {
        Self { manager, settings }
    }

    pub fn settings(&self) -> &ToolbarItemSettings {
        &self.settings
    }

    pub fn glyph(&self) -> &'static str {
        TOOLBAR_ITEM_GLYPH
    }

    /// 候选图像列表
    ///
    /// 清单中宽度超过 [`ICON_MIN_SOURCE_WIDTH`] 的图像，每个附带
    /// 公开 URL 和 36×36 预览配方，按路径排序。
    pub fn image_options(&self) -> Result<Vec<IconOption>, ToolbarError> {
        let mut options = Vec::new();

        for (path, dimensions) in self.manager.images()? {
            if dimensions.width <= ICON_MIN_SOURCE_WIDTH {
                continue;
            }
            options.push(IconOption {
                public_url: self.manager.public_url(Path::new(&path)),
                path,
                dimensions,
                preview: PreviewRecipe::icon(),
            });
        }

        Ok(options)
    }

    /// 记录选中的图像
    ///
    /// 只接受当前候选列表中的路径（单选控件语义）。
    pub fn select_image(&mut self, path: &str) -> Result<(), ToolbarError> {
        let options = self.image_options()?;
        if !options.iter().any(|option| option.path == path) {
            return Err(ToolbarError::UnknownImage(path.to_string()));
        }

        self.settings.image = path.to_string();
        Ok(())
    }

    pub fn set_url(&mut self, url: &str) {
        self.settings.url = url.to_string();
    }

    /// “在新窗口打开”复选框
    pub fn set_open_in_new_window(&mut self, enabled: bool) {
        self.settings.target = if enabled {
            TARGET_NEW_WINDOW.to_string()
        } else {
            String::new()
        };
    }

    pub fn set_scheme(&mut self, scheme: &str) {
        self.settings.scheme = scheme.to_string();
    }

    /// 生成渲染用的条目元素
    pub fn element(&self) -> ToolbarItemElement {
        ToolbarItemElement {
            image: self.settings.image.clone(),
            image_url: self
                .manager
                .public_url(Path::new(&self.settings.image)),
            url: self.settings.url.clone(),
            target: self.settings.target.clone(),
            scheme: self.settings.scheme.clone(),
            glyph: TOOLBAR_ITEM_GLYPH,
        }
    }
}

/// 渲染层消费的条目元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItemElement {
    pub image: String,
    pub image_url: Option<String>,
    pub url: String,
    pub target: String,
    pub scheme: String,
    pub glyph: &'static str,
}
