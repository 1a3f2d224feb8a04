//! 食材カタログ（ルックアップテーブル）
//!
//! 名前の正規化・売り場分類・常備品・既定単位のルールをデータとして保持する。
//! ロジック側（canonical / category / units）はこの表を順に評価するだけなので、
//! ルール追加はここだけで完結する。
//!
//! 各表は上から順に評価され、最初にマッチしたルールが採用される。
//! より具体的なパターンを先に置くこと。

use crate::category::Category;
use crate::units::Unit;
use std::collections::HashSet;

/// カタログのバージョン（ルール変更時に上げる）
pub const CATALOG_VERSION: u32 = 3;

/// 食材名の正規化ルール（パターン → 表示名）
///
/// 表示名は必ず自分自身のルールにマッチし、それより前のルールにはマッチしないこと
/// （正規化の冪等性のため）。
pub const NAME_RULES: &[(&str, &str)] = &[
    (r"(?i)chicken\s*breast", "Chicken breast"),
    (r"(?i)chicken\s*thigh", "Chicken thighs"),
    (r"(?i)ground\s*(beef|chuck)|minced\s*beef", "Ground beef"),
    (r"(?i)ground\s*turkey", "Ground turkey"),
    (r"(?i)\bsalmon\b", "Salmon"),
    (r"(?i)\bolive\s*oil\b", "Olive oil"),
    (r"(?i)garlic\s*powder", "Garlic powder"),
    (r"(?i)\bgarlic\b", "Garlic"),
    (r"(?i)\bred\s*onions?\b", "Red onion"),
    (r"(?i)\bgreen\s*onions?\b|\bscallions?\b|\bspring\s*onions?\b", "Green onions"),
    (r"(?i)^(yellow\s+|white\s+)?onions?$", "Onion"),
    (r"(?i)\bbell\s*peppers?\b", "Bell pepper"),
    (r"(?i)\bblack\s*pepper\b|\bpeppercorns?\b", "Black pepper"),
    (r"(?i)tomato\s*paste", "Tomato paste"),
    (r"(?i)tomato\s*sauce", "Tomato sauce"),
    (r"(?i)\b(canned|diced|crushed)\s*tomato(es)?\b", "Canned tomatoes"),
    (r"(?i)\bcherry\s*tomato(es)?\b", "Cherry tomatoes"),
    (r"(?i)^(ripe\s+|roma\s+)?tomato(es)?$", "Tomatoes"),
    (r"(?i)^(large\s+|whole\s+)?eggs?$", "Eggs"),
    (r"(?i)\bgreek\s*yog(h)?urt\b", "Greek yogurt"),
    (r"(?i)\bparmesan\b|\bparmigiano\b", "Parmesan"),
    (r"(?i)\bcheddar\b", "Cheddar cheese"),
    (r"(?i)^(unsalted\s+|salted\s+)?butter$", "Butter"),
    (r"(?i)^(whole\s+|skim\s+|2%\s+)?milk$", "Milk"),
    (r"(?i)^(kosher\s+|sea\s+|table\s+)?salt$", "Salt"),
    (r"(?i)^(brown\s+|white\s+|jasmine\s+|basmati\s+)?rice$", "Rice"),
    (r"(?i)^(all[-\s]purpose\s+)?flour$", "Flour"),
    (r"(?i)^(granulated\s+|white\s+)?sugar$", "Sugar"),
    (r"(?i)^(baby\s+)?spinach$", "Spinach"),
    (r"(?i)^lemons?$", "Lemons"),
    (r"(?i)^limes?$", "Limes"),
    (r"(?i)^avocados?$", "Avocado"),
    (r"(?i)^carrots?$", "Carrots"),
    (r"(?i)^(russet\s+|yukon\s+gold\s+)?potato(es)?$", "Potatoes"),
    (r"(?i)^broccoli(\s+florets)?$", "Broccoli"),
];

/// 売り場分類ルール（パターン → 売り場）
///
/// 例外（ピーナッツバター、ブロス、スパイス類）を一般ルールより前に置く。
pub const CATEGORY_RULES: &[(&str, Category)] = &[
    (r"(?i)\bfrozen\b|\bice\s*cream\b", Category::Frozen),
    (
        r"(?i)\b(juice|soda|coffee|tea|sparkling\s*water|kombucha|wine|beer)\b",
        Category::Beverages,
    ),
    (
        r"(?i)\b(bread|baguette|buns?|rolls?|tortillas?|bagels?|pita|croissants?)\b",
        Category::Bakery,
    ),
    (
        r"(?i)peanut\s*butter|almond\s*butter|coconut\s*milk|\bbroth\b|\bstock\b|\bbouillon\b",
        Category::Pantry,
    ),
    (
        r"(?i)black\s*pepper|peppercorns?|\bpowder\b|\bpaste\b|\bsauce\b|\bcanned\b",
        Category::Pantry,
    ),
    (
        r"(?i)\b(milk|cheese|cheddar|parmesan|mozzarella|feta|butter|yog(h)?urt|cream|eggs?)\b",
        Category::Dairy,
    ),
    (
        r"(?i)\b(chicken|beef|pork|turkey|lamb|bacon|sausages?|ham|salmon|tuna|shrimp|fish|cod|steak)\b",
        Category::Meat,
    ),
    (
        r"(?i)\b(apples?|bananas?|berries|strawberr(y|ies)|blueberr(y|ies)|lemons?|limes?|oranges?|avocados?|tomato(es)?|onions?|garlic|ginger|potato(es)?|carrots?|celery|spinach|kale|lettuce|cabbage|broccoli|cauliflower|zucchini|cucumbers?|peppers?|mushrooms?|basil|cilantro|parsley|scallions?)\b",
        Category::Produce,
    ),
];

/// 常備品（小文字の正規化済み名）
pub const PANTRY_STAPLES: &[&str] = &[
    "salt",
    "black pepper",
    "pepper",
    "olive oil",
    "vegetable oil",
    "canola oil",
    "cooking spray",
    "water",
    "sugar",
    "flour",
    "baking soda",
    "baking powder",
    "garlic powder",
    "onion powder",
    "vanilla extract",
];

/// 単位が書かれていない場合の既定単位（正規化済み名のパターン → 単位）
pub fn default_unit_rules() -> Vec<(&'static str, Unit)> {
    vec![
        (r"(?i)^garlic$", Unit::Clove),
        (r"(?i)\b(lettuce|cabbage|cauliflower)\b", Unit::Head),
        (r"(?i)^eggs$", Unit::Whole),
    ]
}

/// 常備品セット
///
/// 組み込みの表に、設定ファイルで追加された名前を足して使う。
#[derive(Debug, Clone)]
pub struct PantryStaples {
    names: HashSet<String>,
}

impl PantryStaples {
    /// 組み込みの常備品のみ
    pub fn builtin() -> Self {
        Self {
            names: PANTRY_STAPLES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 追加の常備品名を登録（大文字小文字は区別しない）
    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.extend(
            extra
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
    }

    /// 正規化済みの名前が常備品か判定
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for PantryStaples {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_all_patterns_compile() {
        for (pattern, _) in NAME_RULES {
            assert!(Regex::new(pattern).is_ok(), "invalid name rule: {}", pattern);
        }
        for (pattern, _) in CATEGORY_RULES {
            assert!(Regex::new(pattern).is_ok(), "invalid category rule: {}", pattern);
        }
        for (pattern, _) in default_unit_rules() {
            assert!(Regex::new(pattern).is_ok(), "invalid unit rule: {}", pattern);
        }
    }

    #[test]
    fn test_pantry_staples_are_lowercase() {
        for name in PANTRY_STAPLES {
            assert_eq!(*name, name.to_lowercase());
        }
    }

    #[test]
    fn test_pantry_contains_case_insensitive() {
        let staples = PantryStaples::builtin();
        assert!(staples.contains("Salt"));
        assert!(staples.contains("  olive oil "));
        assert!(!staples.contains("Chicken breast"));
    }

    #[test]
    fn test_pantry_extend() {
        let mut staples = PantryStaples::builtin();
        let before = staples.len();
        staples.extend(["Soy Sauce", "", "  rice vinegar "]);
        assert_eq!(staples.len(), before + 2);
        assert!(staples.contains("soy sauce"));
        assert!(staples.contains("Rice vinegar"));
    }
}
