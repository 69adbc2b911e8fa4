//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - 资源目录的文件系统操作
//! - 公开 URL 的生成和编码
//!
//! # 模块组织
//!
//! - `fs` - 目录准备、递归删除、按模式扫描
//! - `url` - 文件路径到公开 URL 的映射

pub mod fs;
pub mod url;

// Re-export commonly used items for convenience
pub use fs::{delete_recursive, prepare_directory, scan_directory};
pub use url::{PublicUrlGenerator, Url};
