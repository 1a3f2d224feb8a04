//! 買い物リストストアの型定義
//!
//! - ShopItem: 保存されるリスト項目（ユーザーが編集・チェック・削除する）
//! - NewShopItem: 追加要求（idなし、分量は数値または自由記述）
//! - Store: 永続化されるリスト全体
//! - ListOptions: リストの設定

use crate::units::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 保存されるリスト項目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// 売り場
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl ShopItem {
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }
}

/// 分量の入力（数値または自由記述）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QtyInput {
    Number(f64),
    Text(String),
}

impl From<f64> for QtyInput {
    fn from(value: f64) -> Self {
        QtyInput::Number(value)
    }
}

impl From<&str> for QtyInput {
    fn from(value: &str) -> Self {
        QtyInput::Text(value.to_string())
    }
}

/// 追加要求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShopItem {
    pub name: String,
    #[serde(default)]
    pub qty: Option<QtyInput>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub cat: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
}

impl NewShopItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_qty(mut self, qty: impl Into<QtyInput>) -> Self {
        self.qty = Some(qty.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_cat(mut self, cat: impl Into<String>) -> Self {
        self.cat = Some(cat.into());
        self
    }
}

/// 項目の部分更新（None のフィールドは変更しない）
///
/// 文字列フィールドに空文字を渡すとその値を消す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub cat: Option<String>,
    pub note: Option<String>,
    pub checked: Option<bool>,
}

/// 永続化されるリスト全体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub items: Vec<ShopItem>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_key: Option<String>,
}

impl Store {
    /// 空のリスト
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            items: Vec::new(),
            updated_at: at,
            week_key: None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// 分量の丸め方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// 丸めない
    #[default]
    #[serde(rename = "none")]
    Exact,
    /// 買いやすい刻みに丸める
    Friendly,
}

impl std::str::FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "exact" | "off" => Ok(Rounding::Exact),
            "friendly" | "on" => Ok(Rounding::Friendly),
            _ => Err(format!("Unknown rounding: {}. Use none or friendly", s)),
        }
    }
}

impl std::fmt::Display for Rounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rounding::Exact => write!(f, "none"),
            Rounding::Friendly => write!(f, "friendly"),
        }
    }
}

/// リスト設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOptions {
    /// 売り場ごとに表示する（集計には影響しない）
    pub group_by_aisle: bool,
    /// 常備品を追加しない
    pub exclude_pantry_staples: bool,
    pub rounding: Rounding,
    /// ISO週が変わったらリストをリセットする
    pub scope_by_week: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            group_by_aisle: true,
            exclude_pantry_staples: false,
            rounding: Rounding::Exact,
            scope_by_week: false,
        }
    }
}
