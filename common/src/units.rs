//! 単位の正規化
//!
//! "teaspoon" / "tsp." / "TSP" のような表記揺れを正規の単位トークンにまとめる。
//! 表にない単位（"pinch", "stick" など）は拒否せずそのまま通す。

use crate::catalog;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 正規化済みの単位
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Tsp,
    Tbsp,
    Oz,
    Lb,
    G,
    Kg,
    Ml,
    L,
    Cup,
    Clove,
    Head,
    Piece,
    Whole,
    /// 表にない単位（入力表記のまま）
    Other(String),
}

impl Unit {
    /// 正規トークン（ストア・キーで使う表記）
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Oz => "oz",
            Unit::Lb => "lb",
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::Cup => "cup",
            Unit::Clove => "clove",
            Unit::Head => "head",
            Unit::Piece => "piece",
            Unit::Whole => "whole",
            Unit::Other(raw) => raw.as_str(),
        }
    }

    /// 表記から単位を引く（表にない場合は Other）
    fn lookup(raw: &str) -> Unit {
        let lower = raw.trim().trim_end_matches('.').to_lowercase();
        match lower.as_str() {
            "tsp" | "tsps" | "teaspoon" | "teaspoons" => Unit::Tsp,
            "tbsp" | "tbsps" | "tbs" | "tbl" | "tablespoon" | "tablespoons" => Unit::Tbsp,
            "oz" | "ozs" | "ounce" | "ounces" => Unit::Oz,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "g" | "gr" | "gram" | "grams" => Unit::G,
            "kg" | "kgs" | "kilogram" | "kilograms" => Unit::Kg,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Ml,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::L,
            "c" | "cup" | "cups" => Unit::Cup,
            "clove" | "cloves" => Unit::Clove,
            "head" | "heads" => Unit::Head,
            "piece" | "pieces" | "pc" | "pcs" => Unit::Piece,
            "whole" => Unit::Whole,
            _ => Unit::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Unit {
    fn from(raw: String) -> Self {
        Unit::lookup(&raw)
    }
}

impl From<&str> for Unit {
    fn from(raw: &str) -> Self {
        Unit::lookup(raw)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

/// 単位表記を正規化
///
/// 空文字・空白のみは単位なしとして扱う。
pub fn normalize_unit(unit: Option<&str>) -> Option<Unit> {
    let raw = unit?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(Unit::lookup(raw))
}

/// 単位が書かれていない食材の既定単位を推定
///
/// `name` は正規化済みの食材名を想定する。
pub fn default_unit_for(name: &str) -> Option<Unit> {
    lazy_static::lazy_static! {
        static ref RULES: Vec<(Regex, Unit)> = catalog::default_unit_rules()
            .into_iter()
            .filter_map(|(pattern, unit)| Regex::new(pattern).ok().map(|re| (re, unit)))
            .collect();
    }

    RULES
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, unit)| unit.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_teaspoon_variants() {
        assert_eq!(normalize_unit(Some("teaspoon")), Some(Unit::Tsp));
        assert_eq!(normalize_unit(Some("tsp.")), Some(Unit::Tsp));
        assert_eq!(normalize_unit(Some("TSP")), Some(Unit::Tsp));
    }

    #[test]
    fn test_normalize_pound_variants() {
        assert_eq!(normalize_unit(Some("lbs")), Some(Unit::Lb));
        assert_eq!(normalize_unit(Some("pound")), Some(Unit::Lb));
        assert_eq!(normalize_unit(Some("lb")), Some(Unit::Lb));
    }

    #[test]
    fn test_normalize_metric() {
        assert_eq!(normalize_unit(Some("grams")), Some(Unit::G));
        assert_eq!(normalize_unit(Some("Kilograms")), Some(Unit::Kg));
        assert_eq!(normalize_unit(Some("millilitres")), Some(Unit::Ml));
        assert_eq!(normalize_unit(Some("Liter")), Some(Unit::L));
    }

    #[test]
    fn test_normalize_unknown_passes_through() {
        assert_eq!(normalize_unit(Some("pinch")), Some(Unit::Other("pinch".into())));
        assert_eq!(normalize_unit(Some(" stick ")), Some(Unit::Other("stick".into())));
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_unit(None), None);
        assert_eq!(normalize_unit(Some("")), None);
        assert_eq!(normalize_unit(Some("   ")), None);
    }

    #[test]
    fn test_unit_serde_as_token() {
        let json = serde_json::to_string(&Unit::Tbsp).unwrap();
        assert_eq!(json, "\"tbsp\"");
        let unit: Unit = serde_json::from_str("\"pinch\"").unwrap();
        assert_eq!(unit, Unit::Other("pinch".into()));
        let unit: Unit = serde_json::from_str("\"cups\"").unwrap();
        assert_eq!(unit, Unit::Cup);
    }

    #[test]
    fn test_default_unit_for() {
        assert_eq!(default_unit_for("Garlic"), Some(Unit::Clove));
        assert_eq!(default_unit_for("Iceberg lettuce"), Some(Unit::Head));
        assert_eq!(default_unit_for("Eggs"), Some(Unit::Whole));
        assert_eq!(default_unit_for("Garlic powder"), None);
        assert_eq!(default_unit_for("Rice"), None);
    }
}
