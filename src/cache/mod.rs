//! # 缓存模块
//!
//! 为派生值（favicon 标记、图标清单）提供持久化的键值缓存：
//!
//! - 条目永久有效，直到其携带的失效标签被触发
//! - 设置记录的每次保存/删除都会触发标签失效
//! - 只提供 get/set/invalidate，调用方不做逐键删除
//!
//! 存储基于 redb 单文件数据库；测试与一次性场景可使用
//! 临时文件承载的 `ephemeral` 模式。

use std::fs;
use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use thiserror::Error;

const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// 缓存操作错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("cache transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("cache table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("cache storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("cache commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("cache entry serialization error: {0}")]
    Envelope(#[from] serde_json::Error),
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 缓存条目信封
///
/// 数据本体加上失效标签和写入时间。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Vec<u8>,
    pub tags: Vec<String>,
    pub created_at: i64,
}

/// 带失效标签的持久化键值缓存
pub struct Cache {
    db: Database,
    _scratch: Option<TempDir>,
}

impl Cache {
    /// 打开（或创建）给定路径上的缓存数据库
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            db: initialize(Database::create(path)?)?,
            _scratch: None,
        })
    }

    /// 创建临时文件承载的缓存，随实例一起销毁
    pub fn ephemeral() -> Result<Self, CacheError> {
        let scratch = tempfile::tempdir()?;
        let db = initialize(Database::create(scratch.path().join("favpack-cache.redb"))?)?;

        Ok(Self {
            db,
            _scratch: Some(scratch),
        })
    }

    /// 读取缓存数据
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.get_entry(key)?.map(|entry| entry.data))
    }

    /// 读取完整的缓存条目（含标签与时间戳）
    pub fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;

        match table.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// 写入永久缓存条目
    ///
    /// 条目没有过期时间，生命周期完全由 `tags` 中的失效标签决定。
    pub fn set(&self, key: &str, data: &[u8], tags: &[&str]) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: data.to_vec(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            created_at: Utc::now().timestamp(),
        };
        let serialized = serde_json::to_vec(&entry)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ENTRIES)?;
            table.insert(key, serialized.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!("cached entry '{}' ({} bytes)", key, data.len());

        Ok(())
    }

    /// 移除携带指定标签的所有条目，返回移除数量
    pub fn invalidate_tag(&self, tag: &str) -> Result<usize, CacheError> {
        let write_txn = self.db.begin_write()?;
        let mut removed = 0;
        {
            let mut table = write_txn.open_table(ENTRIES)?;

            let mut stale: Vec<String> = Vec::new();
            for item in table.iter()? {
                let (key, value) = item?;
                match serde_json::from_slice::<CacheEntry>(value.value()) {
                    Ok(entry) => {
                        if entry.tags.iter().any(|entry_tag| entry_tag == tag) {
                            stale.push(key.value().to_string());
                        }
                    }
                    // Undecodable envelopes go out with the sweep
                    Err(_) => stale.push(key.value().to_string()),
                }
            }

            for key in &stale {
                table.remove(key.as_str())?;
                removed += 1;
            }
        }
        write_txn.commit()?;

        if removed > 0 {
            tracing::debug!("invalidated {} cache entries tagged '{}'", removed, tag);
        }

        Ok(removed)
    }
}

fn initialize(db: Database) -> Result<Database, CacheError> {
    // Make sure the table exists so that read transactions never race its creation
    let write_txn = db.begin_write()?;
    write_txn.open_table(ENTRIES)?;
    write_txn.commit()?;

    Ok(db)
}
