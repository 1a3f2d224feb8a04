//! 献立ソースからの食材入力
//!
//! 献立生成側は食材を次のいずれかの形で渡してくる:
//! - `[{"item": "olive oil", "amount": "2 tbsp"}]` （レコード配列）
//! - `["2 tbsp olive oil", "1 onion"]` （行テキスト配列）
//! - `{"olive oil": "2 tbsp"}` （食材名 → 分量のマップ）
//!
//! どの形でも `IngredientList::into_raw` で `RawIngredient` の列にそろえる。

use crate::quantity::parse_amount;
use crate::units::Unit;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 食材1行（献立ソースが守る唯一の契約）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIngredient {
    #[serde(default)]
    pub item: String,
    /// 自由記述の分量（数値・null も受け付ける）
    #[serde(default, deserialize_with = "amount_text")]
    pub amount: String,
}

impl RawIngredient {
    pub fn new(item: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            amount: amount.into(),
        }
    }
}

/// 受け付ける食材リストの形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientList {
    Records(Vec<RawIngredient>),
    Lines(Vec<String>),
    Map(BTreeMap<String, AmountText>),
}

impl Default for IngredientList {
    fn default() -> Self {
        IngredientList::Records(Vec::new())
    }
}

impl From<Vec<RawIngredient>> for IngredientList {
    fn from(records: Vec<RawIngredient>) -> Self {
        IngredientList::Records(records)
    }
}

impl IngredientList {
    /// `RawIngredient` の列に正規化
    ///
    /// 行テキストは分量部分を解釈し、残りを食材名にする。
    /// 分量が読めない行は行全体を食材名として残す（分量は空）。
    pub fn into_raw(self) -> Vec<RawIngredient> {
        match self {
            IngredientList::Records(records) => records,
            IngredientList::Lines(lines) => lines
                .into_iter()
                .filter(|line| !line.trim().is_empty())
                .map(|line| {
                    let line = line.trim();
                    let parsed = parse_amount(line);
                    if parsed.amount <= 0.0 {
                        return RawIngredient::new(line, "");
                    }
                    match parsed.unit {
                        // 単位表にない単語は食材名の一部（"2 red onions", "2 eggs"）
                        Some(Unit::Other(_)) => split_unitless(line, &parsed.rest),
                        Some(_) if !parsed.rest.is_empty() => {
                            RawIngredient::new(parsed.rest, line)
                        }
                        _ => RawIngredient::new(line, ""),
                    }
                })
                .collect(),
            IngredientList::Map(map) => map
                .into_iter()
                .map(|(item, amount)| RawIngredient::new(item, amount.0))
                .collect(),
        }
    }
}

/// 単位のない行を「数量」と「食材名」に分ける
///
/// `rest` は単位とみなされた単語より後ろの部分なので、その単語を名前に戻す。
fn split_unitless(line: &str, rest: &str) -> RawIngredient {
    let head = line.strip_suffix(rest).unwrap_or(line).trim_end();
    match head.rsplit_once(char::is_whitespace) {
        Some((amount, word)) => {
            let name = format!("{} {}", word, rest);
            RawIngredient::new(name.trim(), amount.trim())
        }
        None => RawIngredient::new(line, ""),
    }
}

/// 文字列・数値・null のいずれかで書かれた分量
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AmountText(pub String);

impl<'de> Deserialize<'de> for AmountText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        amount_text(deserializer).map(AmountText)
    }
}

fn amount_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
