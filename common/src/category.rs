//! 売り場（アイル）分類

use crate::catalog::CATEGORY_RULES;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 売り場
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Produce,
    Meat,
    Dairy,
    Bakery,
    Frozen,
    Pantry,
    Beverages,
}

impl Category {
    /// 店内の巡回順（一覧の並び順）
    pub const AISLE_ORDER: [Category; 7] = [
        Category::Produce,
        Category::Meat,
        Category::Dairy,
        Category::Bakery,
        Category::Frozen,
        Category::Pantry,
        Category::Beverages,
    ];

    /// 巡回順の位置
    pub fn aisle_order(&self) -> usize {
        Self::AISLE_ORDER
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::AISLE_ORDER.len())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Meat => "Meat",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Frozen => "Frozen",
            Category::Pantry => "Pantry",
            Category::Beverages => "Beverages",
        }
    }

    /// 表示名から売り場を引く（大文字小文字は区別しない）
    pub fn from_label(label: &str) -> Option<Category> {
        let lower = label.trim().to_lowercase();
        Self::AISLE_ORDER
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == lower)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 食材名から売り場を判定
///
/// 正規化済みの名前のみで決まる（同じ名前は必ず同じ売り場）。
/// どのルールにも該当しない場合は Pantry。
pub fn categorize(name: &str) -> Category {
    lazy_static::lazy_static! {
        static ref RULES: Vec<(Regex, Category)> = CATEGORY_RULES
            .iter()
            .filter_map(|(pattern, category)| Regex::new(pattern).ok().map(|re| (re, *category)))
            .collect();
    }

    RULES
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Pantry)
}

/// 売り場ごとにまとめる（表示用）
///
/// 売り場は巡回順、売り場内の順序は入力順のまま。
pub fn group_by_aisle<T, F>(items: &[T], category_of: F) -> Vec<(Category, Vec<&T>)>
where
    F: Fn(&T) -> Category,
{
    Category::AISLE_ORDER
        .iter()
        .filter_map(|aisle| {
            let members: Vec<&T> = items.iter().filter(|i| category_of(i) == *aisle).collect();
            if members.is_empty() {
                None
            } else {
                Some((*aisle, members))
            }
        })
        .collect()
}
