//! Meal Cart Common Library
//!
//! 買い物リスト集計エンジン（CLIと他のフロントエンドで共有）:
//! - 分量テキストのパース、単位の正規化・繰り上げ
//! - 食材名の正規化、売り場分類
//! - 献立横断の一括集計（出所つき）
//! - 永続化される買い物リスト（保存先は差し替え可能）

pub mod aggregator;
pub mod canonical;
pub mod catalog;
pub mod category;
pub mod convert;
pub mod error;
pub mod ingredient;
pub mod quantity;
pub mod store;
pub mod units;

pub use aggregator::{
    aggregate, build_shopping_list_from_meals, format_item_display, format_qty, MealInput,
    MealSource, ShoppingListItem,
};
pub use canonical::canonicalize;
pub use catalog::{PantryStaples, CATALOG_VERSION};
pub use category::{categorize, group_by_aisle, Category};
pub use convert::{round_friendly, upgrade};
pub use error::{Error, Result};
pub use ingredient::{IngredientList, RawIngredient};
pub use quantity::{parse_amount, ParsedQuantity, QuantityMatch};
pub use store::{
    ItemPatch, ListOptions, ListRepository, ListStore, MemoryRepository, NewShopItem, QtyInput,
    Rounding, ShopItem, Store, StoreEvent,
};
pub use units::{normalize_unit, Unit};
