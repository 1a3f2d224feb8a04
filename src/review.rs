//! 対話式チェックモジュール
//!
//! 売り場の巡回順に項目を並べ、カートに入れたものを選んでもらう。
//! 選択の差分だけを `toggle_checked` で反映する。

use crate::commands::{format_shop_item, item_category};
use crate::error::Result;
use dialoguer::MultiSelect;
use meal_cart_common::{ListRepository, ListStore, ShopItem};

/// 巡回順に並べた項目
pub fn items_in_aisle_order(items: &[ShopItem]) -> Vec<&ShopItem> {
    let mut ordered: Vec<&ShopItem> = items.iter().collect();
    // 安定ソートなので売り場内は追加順のまま
    ordered.sort_by_key(|i| item_category(i).aisle_order());
    ordered
}

/// 選択結果とチェック状態の差分（ID, 新しい状態）
pub fn checked_changes(items: &[&ShopItem], selected: &[usize]) -> Vec<(String, bool)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let want = selected.contains(&idx);
            if want != item.is_checked() {
                Some((item.id.clone(), want))
            } else {
                None
            }
        })
        .collect()
}

/// 対話式でチェックを付ける
pub fn run_interactive_review<R: ListRepository>(store: &ListStore<R>) -> Result<()> {
    let list = store.read_list();
    if list.items.is_empty() {
        println!("✓ 買い物リストは空です");
        return Ok(());
    }

    let ordered = items_in_aisle_order(&list.items);
    let labels: Vec<String> = ordered
        .iter()
        .map(|i| format!("{:<10} {}", item_category(i).as_str(), format_shop_item(i)))
        .collect();
    let defaults: Vec<bool> = ordered.iter().map(|i| i.is_checked()).collect();

    println!("🛒 カートに入れた項目を選択してください");
    println!("操作: [Space]選択/解除 [Enter]確定");
    println!("---");

    let selected = MultiSelect::new()
        .with_prompt("買い物リスト")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    let changes = checked_changes(&ordered, &selected);
    if changes.is_empty() {
        println!("変更はありません");
        return Ok(());
    }

    for (id, checked) in &changes {
        store.toggle_checked(id, Some(*checked))?;
    }
    println!("✔ {}件のチェック状態を更新しました", changes.len());
    Ok(())
}
