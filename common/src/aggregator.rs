//! 献立横断の買い物リスト集計（バッチモード）
//!
//! 複数の献立から食材行を集め、名前と単位が同じものを1品目にまとめる。
//! 各品目には「どの献立から来たか」の出所（MealSource）をすべて残す。
//!
//! ## 処理フロー（食材行ごと）
//! 1. 分量をパース（単位は正規化済み）
//! 2. 分量 0 以下の行は捨てる
//! 3. 単位の繰り上げ（oz→lb など、行単位で1回だけ）
//! 4. 食材名の正規化、単位なしなら既定単位を補う
//! 5. キー `小文字の名前|単位` で合算
//!
//! 合算後の合計には繰り上げを再適用しない（2 tsp + 2 tsp は 4 tsp のまま）。

use crate::canonical::canonicalize;
use crate::category::{categorize, Category};
use crate::convert::upgrade;
use crate::ingredient::IngredientList;
use crate::quantity::parse_amount;
use crate::units::{default_unit_for, Unit};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 献立1件分の入力
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    pub meal_id: String,
    #[serde(default)]
    pub meal_name: String,
    /// 生成元（"recipe", "ai", "manual" など）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default)]
    pub ingredients: IngredientList,
}

/// 出所（この品目がリストにある理由）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSource {
    pub meal_id: String,
    pub meal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// 集計結果の1品目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// `小文字の名前|単位`（1回の集計内で一意）
    pub key: String,
    pub name: String,
    pub total_qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    pub category: Category,
    pub sources: Vec<MealSource>,
}

impl ShoppingListItem {
    /// 寄与した献立の数（同じ献立からの複数行は1と数える）
    pub fn meal_count(&self) -> usize {
        self.sources
            .iter()
            .map(|s| s.meal_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// 集計キー
pub fn item_key(name: &str, unit: Option<&Unit>) -> String {
    format!(
        "{}|{}",
        name.to_lowercase(),
        unit.map(|u| u.as_str()).unwrap_or("")
    )
}

/// 献立リストから買い物リストを作る
///
/// 入力が同じなら結果も同じ（副作用なし）。
/// 結果は売り場の巡回順、売り場内は名前順。
pub fn build_shopping_list_from_meals(meals: &[MealInput]) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        for raw in meal.ingredients.clone().into_raw() {
            let parsed = parse_amount(&raw.amount);
            if parsed.amount <= 0.0 {
                debug!(
                    meal = %meal.meal_id,
                    item = %raw.item,
                    amount = %raw.amount,
                    "skipping ingredient without a usable quantity"
                );
                continue;
            }

            let (amount, unit) = upgrade(parsed.amount, parsed.unit);

            let source_name = if raw.item.trim().is_empty() {
                parsed.rest.as_str()
            } else {
                raw.item.as_str()
            };
            let name = canonicalize(source_name);
            if name.is_empty() {
                debug!(meal = %meal.meal_id, "skipping ingredient without a name");
                continue;
            }
            let unit = unit.or_else(|| default_unit_for(&name));

            let source = MealSource {
                meal_id: meal.meal_id.clone(),
                meal_name: meal.meal_name.clone(),
                generator: meal.generator.clone(),
                day: meal.day.clone(),
                slot: meal.slot.clone(),
                qty: amount,
                unit: unit.clone(),
            };

            let key = item_key(&name, unit.as_ref());
            match index.get(&key) {
                Some(&pos) => {
                    let item = &mut items[pos];
                    item.total_qty += amount;
                    item.sources.push(source);
                }
                None => {
                    index.insert(key.clone(), items.len());
                    items.push(ShoppingListItem {
                        key,
                        category: categorize(&name),
                        name,
                        total_qty: amount,
                        unit,
                        sources: vec![source],
                    });
                }
            }
        }
    }

    items.sort_by(|a, b| {
        a.category
            .aisle_order()
            .cmp(&b.category.aisle_order())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.key.cmp(&b.key))
    });
    items
}

/// `build_shopping_list_from_meals` の別名
pub fn aggregate(meals: &[MealInput]) -> Vec<ShoppingListItem> {
    build_shopping_list_from_meals(meals)
}

/// 分量の表示（小数第2位まで、末尾の0は省く）
pub fn format_qty(qty: f64) -> String {
    let rounded = (qty * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// 品目を1行の表示テキストにする
///
/// `"<名前> — <分量> <単位> • <売り場>[ • from N meals | for <献立> (<生成元>) — <曜日> <枠>]"`
pub fn format_item_display(item: &ShoppingListItem) -> String {
    let mut line = format!("{} — {}", item.name, format_qty(item.total_qty));
    if let Some(unit) = &item.unit {
        line.push(' ');
        line.push_str(unit.as_str());
    }
    line.push_str(" • ");
    line.push_str(item.category.as_str());

    let meals = item.meal_count();
    if meals > 1 {
        line.push_str(&format!(" • from {} meals", meals));
    } else if let Some(source) = item.sources.first() {
        line.push_str(&format!(" • for {}", source.meal_name));
        if let Some(generator) = &source.generator {
            line.push_str(&format!(" ({})", generator));
        }
        let when = [source.day.as_deref(), source.slot.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !when.is_empty() {
            line.push_str(" — ");
            line.push_str(&when);
        }
    }
    line
}
