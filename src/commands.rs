//! CLIコマンドの共通処理
//!
//! 献立ファイルの読み込み、項目IDの解決、一覧の表示テキストなど。

use crate::error::{MealCartError, Result};
use meal_cart_common::{
    format_qty, Category, MealInput, NewShopItem, QtyInput, ShopItem, ShoppingListItem, Store,
};
use serde::Deserialize;
use std::path::Path;

/// 献立ファイルの形（配列そのもの、または {"meals": [...]}）
#[derive(Deserialize)]
#[serde(untagged)]
enum MealFile {
    List(Vec<MealInput>),
    Plan { meals: Vec<MealInput> },
}

/// 献立JSONファイルを読み込む
pub fn load_meals(path: &Path) -> Result<Vec<MealInput>> {
    if !path.exists() {
        return Err(MealCartError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_meals(&content)
}

/// 献立JSON文字列をパース
pub fn parse_meals(content: &str) -> Result<Vec<MealInput>> {
    let file: MealFile = serde_json::from_str(content)
        .map_err(|e| MealCartError::InvalidMeals(e.to_string()))?;
    Ok(match file {
        MealFile::List(meals) => meals,
        MealFile::Plan { meals } => meals,
    })
}

/// 集計結果を保存済みリストへの追加要求に変換
pub fn to_new_items(list: &[ShoppingListItem]) -> Vec<NewShopItem> {
    list.iter()
        .map(|item| NewShopItem {
            name: item.name.clone(),
            qty: Some(QtyInput::Number(item.total_qty)),
            unit: item.unit.as_ref().map(|u| u.as_str().to_string()),
            cat: Some(item.category.to_string()),
            note: None,
            checked: None,
        })
        .collect()
}

/// IDの先頭一致で項目を1つに特定する
pub fn resolve_item_id(store: &Store, prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(MealCartError::ItemNotFound(prefix.to_string()));
    }
    if let Some(item) = store.find(prefix) {
        return Ok(item.id.clone());
    }

    let matches: Vec<&ShopItem> = store
        .items
        .iter()
        .filter(|i| i.id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [item] => Ok(item.id.clone()),
        [] => Err(MealCartError::ItemNotFound(prefix.to_string())),
        _ => Err(MealCartError::ItemNotFound(format!(
            "{}（{}件が一致、もう少し長く指定してください）",
            prefix,
            matches.len()
        ))),
    }
}

/// 1件追加した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// 新しい項目になった
    Added,
    /// 既存の項目に合算された
    Merged,
    /// 常備品などで追加されなかった
    Skipped,
}

/// 追加前後のリストから結果を判定する
///
/// 週のリセットで以前の項目が消えることがあるので、件数ではなくIDで比べる。
pub fn add_outcome(before: &Store, after: &Store, canonical_name: &str) -> AddOutcome {
    let same_name: Vec<&ShopItem> = after
        .items
        .iter()
        .filter(|i| i.name == canonical_name)
        .collect();
    if same_name.iter().any(|i| before.find(&i.id).is_none()) {
        AddOutcome::Added
    } else if !same_name.is_empty() {
        AddOutcome::Merged
    } else {
        AddOutcome::Skipped
    }
}

/// 削除を要求したIDのうち、削除後のリストに残っていないものの数
pub fn removed_count(ids: &[String], after: &Store) -> usize {
    ids.iter().filter(|id| after.find(id).is_none()).count()
}

/// 表示用の短いID
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// 保存済み項目の1行表示
pub fn format_shop_item(item: &ShopItem) -> String {
    let mark = if item.is_checked() { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}", mark, item.name);
    if let Some(qty) = item.qty {
        line.push_str(&format!(" — {}", format_qty(qty)));
        if let Some(unit) = &item.unit {
            line.push(' ');
            line.push_str(unit.as_str());
        }
    }
    if let Some(note) = &item.note {
        line.push_str(&format!(" ({})", note));
    }
    line.push_str(&format!("  #{}", short_id(&item.id)));
    line
}

/// 項目の売り場（未設定・不明は Pantry）
pub fn item_category(item: &ShopItem) -> Category {
    item.cat
        .as_deref()
        .and_then(Category::from_label)
        .unwrap_or(Category::Pantry)
}
