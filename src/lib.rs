//! # Favpack Library
//!
//! 一个管理站点 favicon 资源包的工具库：接收管理员上传的 zip 包和
//! `<link>`/`<meta>` 标记片段，部署资源、重写标记并维护图标清单。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、运行配置和管理器门面
//! - `settings` - 设置记录的存储与生命周期事件
//! - `archive` - favicon 包的识别、解包与部署
//! - `builders` - 标记与图标清单两个派生值构建器
//! - `cache` - 带失效标签的持久化缓存
//! - `parsers` - HTML 片段的容错 DOM 处理
//! - `admin` - 设置表单的提交层
//! - `toolbar` - 图标清单的工具栏消费方
//! - `utils` - 文件系统与 URL 工具
//! - `env` - `FAVPACK_*` 环境变量

pub mod admin;
pub mod archive;
pub mod builders;
pub mod cache;
pub mod core;
pub mod env;
pub mod parsers;
pub mod settings;
pub mod toolbar;
pub mod utils;

// Re-export commonly used items for convenience
pub use self::admin::{SettingsForm, SettingsFormInput};
pub use self::builders::{ImageDimensions, ImageInventory};
pub use self::cache::Cache;
pub use self::core::{FaviconManager, Favpack, FavpackError, FavpackOptions};
pub use self::settings::{FaviconSettings, SettingsStore, SettingsSubscriber, SETTINGS_TAG};
pub use self::toolbar::{FaviconToolbarItem, ToolbarItemSettings};
