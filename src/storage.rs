//! ファイル保存先
//!
//! キーごとに `<データディレクトリ>/<キー>.json` を1ファイルとして保存する。
//! 書き込みは一時ファイルに書いてから置き換えるので、途中で落ちても
//! 読みかけのJSONが残らない。
//!
//! 比較交換は `<キー>.lock` の排他ロックを握ったまま行うため、
//! 別インスタンスや別プロセスの書き手とも競合しない。

use fs2::FileExt;
use meal_cart_common::store::ListRepository;
use meal_cart_common::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// キーに対応するファイルパス
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    /// キーごとの排他ロックを取得（ファイルを閉じると解放される）
    fn lock(&self, key: &str) -> Result<File> {
        std::fs::create_dir_all(&self.dir)?;
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))?;
        lock_file.lock_exclusive()?;
        Ok(lock_file)
    }

    /// ロック取得済みの前提で書き込む
    fn replace_blob(&self, key: &str, value: &str) -> Result<()> {
        let tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }
        tmp.persist(self.blob_path(key)).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl ListRepository for FileRepository {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        let _lock = self.lock(key)?;
        self.replace_blob(key, value)
    }

    fn swap_blob(&self, key: &str, expected: Option<&str>, value: &str) -> Result<bool> {
        let _lock = self.lock(key)?;

        if self.read_blob(key)?.as_deref() != expected {
            debug!(key, "stored blob changed before swap");
            return Ok(false);
        }
        self.replace_blob(key, value)?;
        Ok(true)
    }
}
