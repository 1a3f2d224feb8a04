use crate::error::{MealCartError, Result};
use meal_cart_common::PantryStaples;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "MEAL_CART_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// リストの保存先ディレクトリ（未設定時は既定の場所）
    pub data_dir: Option<PathBuf>,
    /// 組み込みの常備品に追加する名前
    pub extra_pantry_staples: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MealCartError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("meal-cart").join("config.json"))
    }

    /// リストの保存先ディレクトリ
    ///
    /// 優先順: 環境変数 → 設定ファイル → OSのデータディレクトリ
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let base = dirs::data_local_dir()
            .ok_or_else(|| MealCartError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("meal-cart"))
    }

    /// 常備品セット（組み込み + 設定で追加したもの）
    pub fn pantry_staples(&self) -> PantryStaples {
        let mut staples = PantryStaples::builtin();
        staples.extend(&self.extra_pantry_staples);
        staples
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }

    pub fn add_pantry_staple(&mut self, name: String) -> Result<()> {
        let lower = name.trim().to_lowercase();
        let known = self.extra_pantry_staples.iter().any(|s| s.to_lowercase() == lower);
        if !lower.is_empty() && !known {
            self.extra_pantry_staples.push(name.trim().to_string());
        }
        self.save()
    }
}
