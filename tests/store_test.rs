//! ファイル保存先を使った買い物リストの統合テスト

use chrono::{Duration, TimeZone, Utc};
use meal_cart::storage::FileRepository;
use meal_cart_common::store::{FixedClock, ListRepository, LIST_KEY, OPTIONS_KEY};
use meal_cart_common::{ListOptions, ListStore, NewShopItem, Rounding, ShopItem, Store, Unit};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap()))
}

/// 未保存のディレクトリは空リスト
#[test]
fn test_empty_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ListStore::new(FileRepository::new(dir.path().join("data"))).with_clock(clock());

    assert!(store.read_list().items.is_empty());
    assert_eq!(store.read_options(), ListOptions::default());
}

/// 保存と読み込み（構造的に一致）
#[test]
fn test_write_read_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());

    let list = Store {
        items: vec![ShopItem {
            id: "id-1".into(),
            name: "Olive oil".into(),
            qty: Some(3.0),
            unit: Some(Unit::Tbsp),
            cat: Some("Pantry".into()),
            note: None,
            checked: Some(true),
        }],
        updated_at: Utc.with_ymd_and_hms(2026, 10, 15, 7, 0, 0).unwrap(),
        week_key: Some("2026-W42".into()),
    };
    store.write_list(&list).unwrap();

    // 別インスタンスから読んでも同じ
    let reopened = ListStore::new(FileRepository::new(dir.path()));
    assert_eq!(reopened.read_list(), list);
}

/// リストと設定は別ファイル
#[test]
fn test_separate_blobs() {
    let dir = tempdir().expect("Failed to create temp dir");
    let repo = FileRepository::new(dir.path());
    let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());

    store.add_items(vec![NewShopItem::named("milk")]).unwrap();
    store
        .write_options(&ListOptions {
            rounding: Rounding::Friendly,
            ..Default::default()
        })
        .unwrap();

    assert!(repo.blob_path(LIST_KEY).exists());
    assert!(repo.blob_path(OPTIONS_KEY).exists());

    let raw = repo.read_blob(LIST_KEY).unwrap().unwrap();
    assert!(raw.contains("\"schemaVersion\":1"));
    let raw = repo.read_blob(OPTIONS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"rounding\":\"friendly\""));
}

/// 壊れたファイルは空リスト扱いで、上書きできる
#[test]
fn test_corrupt_file_recovers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let repo = FileRepository::new(dir.path());
    std::fs::write(repo.blob_path(LIST_KEY), "garbage{{").unwrap();

    let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());
    assert!(store.read_list().items.is_empty());

    let list = store
        .add_items(vec![NewShopItem::named("eggs").with_qty("12")])
        .unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(store.read_list().items[0].qty, Some(12.0));
}

/// 同じディレクトリを共有する2つのストア
#[test]
fn test_two_stores_share_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let phone = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());
    let laptop = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());

    phone
        .add_items(vec![NewShopItem::named("olive oil").with_qty("2 tbsp")])
        .unwrap();
    laptop
        .add_items(vec![NewShopItem::named("olive oil").with_qty("1 tbsp")])
        .unwrap();

    let list = phone.read_list();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].qty, Some(3.0));
    assert_eq!(list.items[0].unit, Some(Unit::Tbsp));
}

/// 常備品は追加されない
#[test]
fn test_pantry_staples_excluded() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());
    store
        .write_options(&ListOptions {
            exclude_pantry_staples: true,
            ..Default::default()
        })
        .unwrap();

    let list = store
        .add_items(vec![NewShopItem::named("Salt").with_qty(1.0).with_unit("tsp")])
        .unwrap();
    assert!(list.items.is_empty());
}

/// 週が変わるとリストがリセットされる
#[test]
fn test_week_rollover_persists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let clock = clock();
    let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock.clone());

    store.set_week_scope(true).unwrap();
    store.add_items(vec![NewShopItem::named("milk")]).unwrap();

    clock.advance(Duration::days(1));
    store.add_items(vec![NewShopItem::named("bread")]).unwrap();
    assert_eq!(store.read_list().items.len(), 2);

    clock.advance(Duration::days(7));
    store.add_items(vec![NewShopItem::named("eggs")]).unwrap();
    let list = store.read_list();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.week_key.as_deref(), Some("2026-W43"));
}

/// 複数インスタンスから同時に追加しても確定した更新は失われない
#[test]
fn test_concurrent_stores_keep_every_committed_item() {
    let dir = tempdir().expect("Failed to create temp dir");
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = ListStore::new(FileRepository::new(dir.path())).with_clock(clock());
            let item = NewShopItem::named(format!("item{}", n));
            std::thread::spawn(move || store.add_items(vec![item]))
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => committed += 1,
            // 再試行を使い切った場合のみ失敗してよい
            Err(e) => assert!(matches!(e, meal_cart_common::Error::Conflict(_)), "{}", e),
        }
    }

    let store = ListStore::new(FileRepository::new(dir.path()));
    assert!(committed > 0);
    assert_eq!(store.read_list().items.len(), committed);
}
