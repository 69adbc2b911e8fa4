//! 统一的环境变量管理
//!
//! 提供类型安全、可验证的 `FAVPACK_*` 环境变量访问器，
//! [`crate::core::FavpackOptions::from_env`] 用它们组装运行配置。

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Environment variable '{}': {}",
            self.variable, self.message
        )
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// 变量未设置时的默认值，`None` 表示必须设置
    fn default_value() -> Option<T> {
        None
    }

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default_value().ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }
}

/// 资源目录：favicon 包解出的目标目录
pub struct AssetsDir;
impl EnvVar<String> for AssetsDir {
    const NAME: &'static str = "FAVPACK_ASSETS_DIR";
    const DESCRIPTION: &'static str = "Directory the favicon package is unpacked into";

    fn default_value() -> Option<String> {
        Some("public/favpack".to_string())
    }

    fn parse(value: &str) -> EnvResult<String> {
        let directory = value.trim();
        if directory.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "Directory cannot be empty".to_string(),
            });
        }
        Ok(directory.to_string())
    }
}

/// 公开基础地址：资源目录对外可见的 URL 前缀
pub struct PublicBaseUrl;
impl EnvVar<String> for PublicBaseUrl {
    const NAME: &'static str = "FAVPACK_PUBLIC_BASE_URL";
    const DESCRIPTION: &'static str =
        "Public URL prefix of the assets directory (absolute or root-relative)";

    fn default_value() -> Option<String> {
        Some("/files/favpack".to_string())
    }

    fn parse(value: &str) -> EnvResult<String> {
        let base = value.trim();
        if base.starts_with('/') || base.starts_with("http://") || base.starts_with("https://") {
            Ok(base.to_string())
        } else {
            Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "Base URL must start with '/', 'http://' or 'https://'".to_string(),
            })
        }
    }
}

/// 设置文件路径
pub struct SettingsFile;
impl EnvVar<String> for SettingsFile {
    const NAME: &'static str = "FAVPACK_SETTINGS_FILE";
    const DESCRIPTION: &'static str = "Path of the persisted settings record";

    fn default_value() -> Option<String> {
        Some("config/favpack.toml".to_string())
    }

    fn parse(value: &str) -> EnvResult<String> {
        let path = value.trim();
        if path.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "Path cannot be empty".to_string(),
            });
        }
        Ok(path.to_string())
    }
}

/// 缓存数据库路径；未设置时使用临时文件承载的缓存
pub struct CacheDb;
impl EnvVar<String> for CacheDb {
    const NAME: &'static str = "FAVPACK_CACHE_DB";
    const DESCRIPTION: &'static str = "Path of the cache database (unset: ephemeral cache)";

    fn parse(value: &str) -> EnvResult<String> {
        let path = value.trim();
        if path.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "Path cannot be empty".to_string(),
            });
        }
        Ok(path.to_string())
    }
}
