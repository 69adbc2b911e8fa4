//! favicon 标记构建器
//!
//! 把管理员粘贴的标记片段改写为指向已部署资源的最终标记：
//! `<link>` 的 href 逐个对照资源目录，存在的重写为公开 URL，
//! 缺失的整个元素丢弃；`<meta>` 原样透传。

use std::path::PathBuf;
use std::sync::Arc;

use crate::builders::BuilderError;
use crate::cache::Cache;
use crate::parsers::html::{
    find_nodes, fragment_to_dom, get_node_attr, serialize_node, set_node_attr,
};
use crate::settings::{SettingsStore, SETTINGS_TAG};
use crate::utils::url::PublicUrlGenerator;

/// 标记缓存的固定键
pub const MARKUP_CACHE_KEY: &str = "favpack";

/// favicon 标记构建器
pub struct MarkupBuilder {
    store: Arc<SettingsStore>,
    cache: Arc<Cache>,
    assets_dir: PathBuf,
    urls: PublicUrlGenerator,
}

impl MarkupBuilder {
    pub fn new(
        store: Arc<SettingsStore>,
        cache: Arc<Cache>,
        assets_dir: PathBuf,
        urls: PublicUrlGenerator,
    ) -> Self {
        Self {
            store,
            cache,
            assets_dir,
            urls,
        }
    }

    /// 构建 favicon 标记
    ///
    /// 命中缓存时直接返回缓存值。记录缺少包文件或标记时结果为
    /// 空字符串；空结果同样写入缓存（带设置失效标签），避免每个
    /// 请求都重读设置。
    ///
    /// # 返回值
    ///
    /// 保留下来的元素各占一行（link 在前、meta 在后，均保持原有
    /// 相对顺序），以换行符连接并以换行符结尾。
    pub fn build(&self) -> Result<String, BuilderError> {
        if let Some(cached) = self.cache.get(MARKUP_CACHE_KEY)? {
            return Ok(String::from_utf8_lossy(&cached).into_owned());
        }

        let settings = self.store.load()?;
        let markup = if settings.is_complete() {
            self.render(&settings.tags)
        } else {
            String::new()
        };

        self.cache
            .set(MARKUP_CACHE_KEY, markup.as_bytes(), &[SETTINGS_TAG])?;

        Ok(markup)
    }

    fn render(&self, tags: &str) -> String {
        let dom = fragment_to_dom(tags);
        let mut fragments: Vec<String> = Vec::new();

        // Icon links: keep only those whose target file exists, rewritten to public URLs
        for link_node in find_nodes(&dom.document, "link") {
            let href = get_node_attr(&link_node, "href").unwrap_or_default();
            let candidate = self.asset_path(&href);

            if !candidate.is_file() {
                tracing::debug!(
                    "dropping link to {} (no such asset)",
                    candidate.display()
                );
                continue;
            }

            if let Some(public_url) = self.urls.generate(&candidate) {
                set_node_attr(&link_node, "href", Some(public_url));
                fragments.push(serialize_node(&link_node));
            }
        }

        // Windows tile meta tags pass through untouched
        for meta_node in find_nodes(&dom.document, "meta") {
            fragments.push(serialize_node(&meta_node));
        }

        let mut markup = fragments.join("\n");
        markup.push('\n');
        markup
    }

    // An href-less link resolves to the assets directory itself,
    // which is never a file, so the element gets dropped.
    fn asset_path(&self, href: &str) -> PathBuf {
        self.assets_dir.join(href.trim_start_matches('/'))
    }
}
