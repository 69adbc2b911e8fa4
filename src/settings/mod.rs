//! # 设置模块
//!
//! 站点唯一的 favicon 设置记录及其存储：
//!
//! - `FaviconSettings` - `{file, tags}` 记录，TOML 持久化
//! - `SettingsStore` - 读取/保存/删除，保存与删除前广播生命周期事件
//! - `SettingsSubscriber` - `PreSave`/`PreDelete` 回调注册点
//! - `CacheInvalidator` - 设置变更时触发缓存标签失效的订阅者
//!
//! 派生值（标记、图标清单）的缓存条目都携带 [`SETTINGS_TAG`]，
//! 订阅者在每次保存/删除前触发失效，保证缓存永远不会与
//! 当前设置产生分歧。

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::Cache;

/// 设置记录对应的缓存失效标签
pub const SETTINGS_TAG: &str = "config:favpack.settings";

/// 设置持久化错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// favicon 设置记录
///
/// 每个站点只有一条记录。`file` 指向管理员上传的 zip 包，
/// `tags` 是粘贴的 `<link>`/`<meta>` 标记片段。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaviconSettings {
    /// 上传的 favicon 包（zip 文件路径），未上传时为空
    #[serde(default)]
    pub file: Option<String>,
    /// 管理员提供的标记片段
    #[serde(default)]
    pub tags: String,
    /// 上传包的内容摘要，仅供展示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_digest: Option<String>,
    /// 最近一次保存的时间戳
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl FaviconSettings {
    /// 记录是否同时具备包文件和标记（派生标记的前提条件）
    pub fn is_complete(&self) -> bool {
        self.file.as_deref().map_or(false, |file| !file.is_empty()) && !self.tags.is_empty()
    }
}

/// 设置生命周期订阅者
///
/// 注册顺序即通知顺序。两个回调都在存储动作之前触发，
/// 携带将要保存的记录或将要删除的当前记录。
pub trait SettingsSubscriber: Send + Sync {
    fn on_pre_save(&self, _settings: &FaviconSettings) {}
    fn on_pre_delete(&self, _settings: &FaviconSettings) {}
}

/// 设置记录的存储
pub struct SettingsStore {
    path: PathBuf,
    subscribers: Vec<Box<dyn SettingsSubscriber>>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            subscribers: Vec::new(),
        }
    }

    /// 注册生命周期订阅者
    ///
    /// 必须在存储被共享（包进 `Arc`）之前完成。
    pub fn subscribe(&mut self, subscriber: Box<dyn SettingsSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// 读取当前记录，文件不存在时返回默认（空）记录
    pub fn load(&self) -> Result<FaviconSettings, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Ok(FaviconSettings::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// 保存记录
    ///
    /// 先广播 `PreSave`，随后一次性写入整条记录。
    pub fn save(&self, settings: &FaviconSettings) -> Result<(), SettingsError> {
        for subscriber in &self.subscribers {
            subscriber.on_pre_save(settings);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(settings)?)?;

        tracing::info!("favicon settings saved to {}", self.path.display());

        Ok(())
    }

    /// 删除记录
    ///
    /// 先广播 `PreDelete`（携带当前记录），再移除存储文件。
    /// 文件本就不存在时同样视为成功。
    pub fn delete(&self) -> Result<(), SettingsError> {
        let current = self.load()?;
        for subscriber in &self.subscribers {
            subscriber.on_pre_delete(&current);
        }

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }

        tracing::info!("favicon settings deleted");

        Ok(())
    }
}

/// 设置变更时触发缓存失效的订阅者
///
/// 保存与删除都会让 [`SETTINGS_TAG`] 标签下的全部派生缓存失效，
/// 下一次读取会重新计算。失效失败只记录日志，不阻断保存流程。
pub struct CacheInvalidator {
    cache: Arc<Cache>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    fn invalidate(&self) {
        if let Err(error) = self.cache.invalidate_tag(SETTINGS_TAG) {
            tracing::warn!("failed to invalidate settings cache tag: {}", error);
        }
    }
}

impl SettingsSubscriber for CacheInvalidator {
    fn on_pre_save(&self, _settings: &FaviconSettings) {
        self.invalidate();
    }

    fn on_pre_delete(&self, _settings: &FaviconSettings) {
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingSubscriber {
        saves: Arc<AtomicUsize>,
        deletes: Arc<AtomicUsize>,
    }

    impl SettingsSubscriber for CountingSubscriber {
        fn on_pre_save(&self, _settings: &FaviconSettings) {
            self.saves.fetch_add(1, Ordering::SeqCst);
        }

        fn on_pre_delete(&self, _settings: &FaviconSettings) {
            self.deletes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn store_in(temp_dir: &TempDir) -> SettingsStore {
        SettingsStore::new(temp_dir.path().join("config/favpack.toml"))
    }

    #[test]
    fn test_load_missing_file_yields_default_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let settings = store.load().unwrap();

        assert_eq!(settings, FaviconSettings::default());
        assert!(!settings.is_complete());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let settings = FaviconSettings {
            file: Some("/uploads/favicons.zip".to_string()),
            tags: "<link rel=\"icon\" href=\"/favicon.png\">".to_string(),
            ..Default::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
        assert!(settings.is_complete());
    }

    #[test]
    fn test_subscribers_fire_before_save_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let saves = Arc::new(AtomicUsize::new(0));
        let deletes = Arc::new(AtomicUsize::new(0));

        let mut store = store_in(&temp_dir);
        store.subscribe(Box::new(CountingSubscriber {
            saves: saves.clone(),
            deletes: deletes.clone(),
        }));

        store.save(&FaviconSettings::default()).unwrap();
        store.save(&FaviconSettings::default()).unwrap();
        store.delete().unwrap();

        assert_eq!(saves.load(Ordering::SeqCst), 2);
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delete_missing_record_is_success() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.delete().unwrap();
        store.delete().unwrap();
    }

    #[test]
    fn test_cache_invalidator_clears_tagged_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(Cache::ephemeral().unwrap());
        cache.set("favpack", b"stale", &[SETTINGS_TAG]).unwrap();

        let mut store = store_in(&temp_dir);
        store.subscribe(Box::new(CacheInvalidator::new(cache.clone())));
        store.save(&FaviconSettings::default()).unwrap();

        assert!(cache.get("favpack").unwrap().is_none());
    }
}
