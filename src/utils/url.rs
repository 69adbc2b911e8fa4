//! URL 工具
//!
//! 将资源目录下的文件路径映射为可公开访问的 URL。基础地址既可以是
//! 带协议的绝对 URL，也可以是站点根相对路径（如 `/files/favpack`）。

use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
pub use url::Url;

// Characters that cannot appear raw inside a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'\\')
    .add(b'/');

/// 公开 URL 的基础地址
#[derive(Debug, Clone)]
enum PublicBase {
    /// 带协议的绝对地址，经过 `Url` 解析验证
    Absolute(Url),
    /// 站点根相对地址（以 `/` 开头）
    RootRelative(String),
}

/// 文件路径到公开 URL 的映射器
///
/// 只处理资源目录之内的路径；目录之外的路径没有对应的公开地址，
/// 返回 `None`。
#[derive(Debug, Clone)]
pub struct PublicUrlGenerator {
    assets_dir: PathBuf,
    base: PublicBase,
}

impl PublicUrlGenerator {
    /// 创建映射器
    ///
    /// `base_url` 解析失败时按根相对路径处理。
    pub fn new(assets_dir: PathBuf, base_url: &str) -> Self {
        let base = match Url::parse(base_url) {
            Ok(parsed) => PublicBase::Absolute(parsed),
            Err(_) => PublicBase::RootRelative(base_url.trim_end_matches('/').to_string()),
        };

        Self { assets_dir, base }
    }

    /// 生成文件的公开 URL
    pub fn generate(&self, file_path: &Path) -> Option<String> {
        let relative = file_path.strip_prefix(&self.assets_dir).ok()?;

        let mut encoded = String::new();
        for component in relative.iter() {
            encoded.push('/');
            encoded.push_str(&encode_segment(&component.to_string_lossy()));
        }

        match &self.base {
            PublicBase::Absolute(base) => {
                let mut url = base.clone();
                let path = format!("{}{}", base.path().trim_end_matches('/'), encoded);
                url.set_path(&path);
                Some(url.into())
            }
            PublicBase::RootRelative(base) => Some(format!("{base}{encoded}")),
        }
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
