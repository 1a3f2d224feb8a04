//! リストの保存先（キー・バリューのblobストア）
//!
//! 保存先はトレイトで抽象化し、CLIはファイル、テストはメモリを差し込む。

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// リスト本体のキー
pub const LIST_KEY: &str = "shopping-list";
/// 設定のキー
pub const OPTIONS_KEY: &str = "shopping-list-options";

/// キー・バリューのblobストア
pub trait ListRepository: Send + Sync {
    /// 値を読む（未保存なら None）
    fn read_blob(&self, key: &str) -> Result<Option<String>>;

    /// 値を無条件に書く
    fn write_blob(&self, key: &str, value: &str) -> Result<()>;

    /// 現在値が `expected` と一致するときだけ書く（比較交換）
    ///
    /// 書けたら true、他の書き込みが先に入っていたら false。
    /// 既定実装は読んでから書くだけなので原子的ではない。
    /// 複数の書き手が同時に触る保存先は上書きすること。
    fn swap_blob(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        if self.read_blob(key)?.as_deref() != expected {
            return Ok(false);
        }
        self.write_blob(key, value)?;
        Ok(true)
    }
}

impl<R: ListRepository + ?Sized> ListRepository for Arc<R> {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        (**self).read_blob(key)
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        (**self).write_blob(key, value)
    }

    fn swap_blob(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        (**self).swap_blob(key, expected, value)
    }
}

/// メモリ上の保存先（テスト・一時利用）
#[derive(Debug, Default)]
pub struct MemoryRepository {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs
            .lock()
            .map_err(|_| Error::Storage("memory repository lock poisoned".into()))
    }
}

impl ListRepository for MemoryRepository {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn swap_blob(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        let mut blobs = self.lock()?;
        if blobs.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        blobs.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_write() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.read_blob(LIST_KEY).unwrap(), None);
        repo.write_blob(LIST_KEY, "{}").unwrap();
        assert_eq!(repo.read_blob(LIST_KEY).unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_memory_swap() {
        let repo = MemoryRepository::new();
        assert!(repo.swap_blob(LIST_KEY, None, "v1").unwrap());
        assert!(!repo.swap_blob(LIST_KEY, None, "v2").unwrap());
        assert!(!repo.swap_blob(LIST_KEY, Some("stale"), "v2").unwrap());
        assert!(repo.swap_blob(LIST_KEY, Some("v1"), "v2").unwrap());
        assert_eq!(repo.read_blob(LIST_KEY).unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_keys_are_independent() {
        let repo = MemoryRepository::new();
        repo.write_blob(LIST_KEY, "list").unwrap();
        repo.write_blob(OPTIONS_KEY, "options").unwrap();
        assert_eq!(repo.read_blob(LIST_KEY).unwrap().as_deref(), Some("list"));
        assert_eq!(repo.read_blob(OPTIONS_KEY).unwrap().as_deref(), Some("options"));
    }
}
