//! # 管理表单模块
//!
//! 设置页面的提交层（不负责渲染）：
//!
//! - 包上传字段：扩展名限制为 zip
//! - 标记字段：必填的多行文本，提交时去除首尾空白
//!
//! 两个字段的值在一次保存中写入设置记录。除字段级约束外
//! 不做内容校验。

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use base64::{prelude::BASE64_STANDARD, Engine};
use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::settings::{FaviconSettings, SettingsError, SettingsStore};

/// 包上传字段允许的扩展名
pub const PACKAGE_FIELD_EXTENSIONS: &[&str] = &["zip"];

/// 标记文本域的行数
pub const TAGS_FIELD_ROWS: u32 = 7;

/// 推荐的 favicon 包生成站点（字段描述里引用）
pub const GENERATOR_URL: &str = "http://realfavicongenerator.net/";

/// 表单提交错误
#[derive(Debug, Error)]
pub enum FormError {
    #[error("the tags field is required")]
    MissingTags,
    #[error("unsupported package extension: '{0}' (allowed: zip)")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// 表单提交的原始输入
#[derive(Debug, Clone, Default)]
pub struct SettingsFormInput {
    /// 上传的包文件路径，未上传时为空
    pub file: Option<String>,
    /// 标记文本域的内容
    pub tags: String,
}

/// 设置表单的提交模型
pub struct SettingsForm {
    store: Arc<SettingsStore>,
}

impl SettingsForm {
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self { store }
    }

    /// 读取当前记录（表单默认值）
    pub fn load(&self) -> Result<FaviconSettings, FormError> {
        Ok(self.store.load()?)
    }

    /// 字段级校验
    pub fn validate(&self, input: &SettingsFormInput) -> Result<(), FormError> {
        if input.tags.trim().is_empty() {
            return Err(FormError::MissingTags);
        }

        if let Some(file) = input.file.as_deref().filter(|file| !file.is_empty()) {
            let extension = Path::new(file)
                .extension()
                .map(|extension| extension.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !PACKAGE_FIELD_EXTENSIONS.contains(&extension.as_str()) {
                return Err(FormError::UnsupportedExtension(extension));
            }
        }

        // TODO: validate that the pasted markup actually parses into link/meta elements.

        Ok(())
    }

    /// 提交表单
    ///
    /// 标记去除首尾空白后与包引用一起写入设置记录（单次保存），
    /// 同时记录上传包的内容摘要。
    pub fn submit(&self, input: &SettingsFormInput) -> Result<FaviconSettings, FormError> {
        self.validate(input)?;

        let file = input.file.clone().filter(|file| !file.is_empty());
        let file_digest = file
            .as_deref()
            .and_then(|file| package_digest(Path::new(file)).ok());

        let settings = FaviconSettings {
            file,
            tags: input.tags.trim().to_string(),
            file_digest,
            updated_at: Some(Utc::now().timestamp()),
        };

        self.store.save(&settings)?;

        Ok(settings)
    }
}

// Subresource-integrity style digest of the uploaded package
fn package_digest(path: &Path) -> io::Result<String> {
    let data = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);

    Ok(format!("sha256-{}", BASE64_STANDARD.encode(hasher.finalize())))
}
