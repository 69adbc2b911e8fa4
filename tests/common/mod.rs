#![allow(dead_code)]
//! 集成测试公共辅助
//!
//! 提供临时目录中的完整运行环境和测试夹具（zip 包、PNG 图像）。

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use favpack::{Favpack, FavpackOptions};

/// 临时目录中的完整 favpack 运行环境
pub struct TestEnvironment {
    root: TempDir,
    pub options: FavpackOptions,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create scratch directory");
        let options = FavpackOptions {
            assets_dir: root.path().join("assets"),
            public_base_url: "/files/favpack".to_string(),
            settings_file: root.path().join("config/favpack.toml"),
            cache_db: Some(root.path().join("cache/favpack.redb")),
        };

        Self { root, options }
    }

    /// 打开一个完整接线的 favpack 实例
    pub fn open(&self) -> Favpack {
        Favpack::open(self.options.clone()).expect("open favpack")
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn assets_dir(&self) -> &Path {
        &self.options.assets_dir
    }

    /// 直接往资源目录写一个文件（绕过部署流程）
    pub fn write_asset(&self, relative: &str, data: &[u8]) -> PathBuf {
        let path = self.options.assets_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create asset parent");
        }
        fs::write(&path, data).expect("write asset");
        path
    }

    /// 往资源目录写一个给定尺寸的 PNG
    pub fn write_png(&self, relative: &str, width: u32, height: u32) -> PathBuf {
        let path = self.options.assets_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create asset parent");
        }
        image::RgbaImage::new(width, height)
            .save(&path)
            .expect("encode png fixture");
        path
    }

    /// 在临时目录里生成一个 zip 包夹具
    pub fn package_zip(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let path = self.root.path().join(name);
        let file = File::create(&path).expect("create zip fixture");
        let mut writer = zip::ZipWriter::new(file);

        for (entry_name, data) in files {
            writer
                .start_file(*entry_name, SimpleFileOptions::default())
                .expect("start zip entry");
            writer.write_all(data).expect("write zip entry");
        }
        writer.finish().expect("finish zip fixture");

        path
    }

    /// 编码一个 PNG 的字节串（作为 zip 包条目内容）
    pub fn png_bytes(&self, width: u32, height: u32) -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(width, height)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .expect("encode png bytes");
        buffer.into_inner()
    }
}
