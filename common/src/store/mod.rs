//! 永続化される買い物リスト（インクリメンタルモード）
//!
//! 各ページの「買い物リストに追加」から少しずつ項目が足され、
//! ユーザーがチェック・編集・削除していくリストを管理する。
//!
//! ## 書き込みの流れ
//! すべての変更は「読む → 次の状態を計算 → 比較交換で書く」で行う。
//! 読んだ後に他の書き手が先に書いていた場合は読み直してやり直す。
//! 書き込みに成功したら購読者へ変更通知を送る。
//!
//! ## 保存形式
//! リスト本体と設定は別キーのJSONで、どちらも `schemaVersion` を持つ。
//! 壊れたJSONやバージョン違いは「まだ何もない」として扱う。

pub mod clock;
pub mod events;
pub mod repository;
pub mod types;

pub use clock::{week_key, Clock, FixedClock, SystemClock};
pub use events::{EventBus, StoreEvent};
pub use repository::{ListRepository, MemoryRepository, LIST_KEY, OPTIONS_KEY};
pub use types::{ItemPatch, ListOptions, NewShopItem, QtyInput, Rounding, ShopItem, Store};

use crate::canonical::canonicalize;
use crate::catalog::PantryStaples;
use crate::category::categorize;
use crate::convert::{round_friendly, upgrade};
use crate::error::{Error, Result};
use crate::quantity::parse_amount;
use crate::units::{default_unit_for, normalize_unit};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// 保存形式のバージョン
pub const SCHEMA_VERSION: u32 = 1;

/// 比較交換の再試行回数
const MAX_WRITE_ATTEMPTS: usize = 5;

/// 保存用の外側の構造（バージョン付き）
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted<T> {
    schema_version: u32,
    #[serde(flatten)]
    data: T,
}

/// 永続化される買い物リスト
pub struct ListStore<R: ListRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
    events: EventBus,
    pantry: PantryStaples,
}

impl<R: ListRepository> ListStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: Arc::new(SystemClock),
            events: EventBus::new(),
            pantry: PantryStaples::builtin(),
        }
    }

    /// 時刻の取得元を差し替える
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 常備品セットを差し替える
    pub fn with_pantry_staples(mut self, pantry: PantryStaples) -> Self {
        self.pantry = pantry;
        self
    }

    /// 変更通知の購読
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // =============================================
    // 読み書き
    // =============================================

    /// リスト全体を読む
    ///
    /// 保存先が読めない・中身が壊れている場合は空のリストを返す。
    pub fn read_list(&self) -> Store {
        match self.load_list() {
            Ok((_, store)) => store,
            Err(e) => {
                warn!(error = %e, "failed to read shopping list, using an empty one");
                Store::empty(self.clock.now())
            }
        }
    }

    /// リスト全体を置き換える（渡された内容をそのまま保存）
    pub fn write_list(&self, store: &Store) -> Result<()> {
        let json = encode(store)?;
        self.repo.write_blob(LIST_KEY, &json)?;
        self.events.publish(StoreEvent::ListUpdated);
        Ok(())
    }

    /// 設定を読む（未保存・破損時は既定値）
    pub fn read_options(&self) -> ListOptions {
        match self.repo.read_blob(OPTIONS_KEY) {
            Ok(Some(raw)) => decode(&raw, OPTIONS_KEY).unwrap_or_default(),
            Ok(None) => ListOptions::default(),
            Err(e) => {
                warn!(error = %e, "failed to read list options, using defaults");
                ListOptions::default()
            }
        }
    }

    /// 設定を保存し、設定更新を通知する
    pub fn write_options(&self, options: &ListOptions) -> Result<()> {
        let json = encode(options)?;
        self.repo.write_blob(OPTIONS_KEY, &json)?;
        self.events.publish(StoreEvent::OptionsUpdated);
        Ok(())
    }

    /// 週単位のリセットを有効/無効にする
    ///
    /// 有効にした時点の週をリストに記録するので、既存の項目は今週中は残る。
    pub fn set_week_scope(&self, enabled: bool) -> Result<ListOptions> {
        let mut options = self.read_options();
        options.scope_by_week = enabled;
        self.write_options(&options)?;

        if enabled {
            let current = week_key(self.clock.now());
            self.mutate_list(|store, _| {
                if store.week_key.is_some() {
                    return false;
                }
                store.week_key = Some(current.clone());
                true
            })?;
        }
        Ok(options)
    }

    // =============================================
    // 項目の操作
    // =============================================

    /// 項目一覧を置き換える
    pub fn set_items(&self, items: Vec<ShopItem>) -> Result<Store> {
        self.mutate_list(|store, _| {
            store.items = items.clone();
            true
        })
    }

    /// 項目を追加する
    ///
    /// 1. 週が変わっていればリストを空にする（週単位リセット有効時）
    /// 2. 名前の正規化
    /// 3. 常備品の除外（設定時）
    /// 4. 単位の正規化と繰り上げ
    /// 5. 丸め（friendly 設定時）
    /// 6. 名前と単位が同じ既存項目へ合算（合計に繰り上げを再適用）
    pub fn add_items(&self, new_items: Vec<NewShopItem>) -> Result<Store> {
        let current_week = week_key(self.clock.now());

        self.mutate_list(|store, options| {
            if options.scope_by_week {
                if store.week_key.as_deref() != Some(current_week.as_str()) {
                    if !store.items.is_empty() {
                        info!(
                            previous = ?store.week_key,
                            current = %current_week,
                            discarded = store.items.len(),
                            "week rolled over, resetting shopping list"
                        );
                    }
                    store.items.clear();
                }
                store.week_key = Some(current_week.clone());
            }

            for new_item in new_items.iter().cloned() {
                if let Some(prepared) = self.prepare_item(new_item, options) {
                    merge_item(&mut store.items, prepared);
                }
            }
            true
        })
    }

    /// チェック状態を切り替える（`checked` 指定時はその値にする）
    pub fn toggle_checked(&self, id: &str, checked: Option<bool>) -> Result<Store> {
        self.mutate_list(|store, _| match store.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                let next = checked.unwrap_or(!item.is_checked());
                item.checked = Some(next);
                true
            }
            None => {
                debug!(id, "toggle_checked: no such item");
                false
            }
        })
    }

    /// 項目を部分更新する
    pub fn update_item(&self, id: &str, patch: ItemPatch) -> Result<Store> {
        self.mutate_list(|store, _| {
            let Some(item) = store.items.iter_mut().find(|i| i.id == id) else {
                debug!(id, "update_item: no such item");
                return false;
            };

            if let Some(name) = &patch.name {
                let name = name.trim();
                if !name.is_empty() {
                    item.name = name.to_string();
                }
            }
            if let Some(qty) = patch.qty {
                item.qty = (qty.is_finite() && qty >= 0.0).then_some(qty);
            }
            if let Some(unit) = &patch.unit {
                item.unit = normalize_unit(Some(unit));
            }
            if let Some(cat) = &patch.cat {
                item.cat = non_empty(Some(cat.clone()));
            }
            if let Some(note) = &patch.note {
                item.note = non_empty(Some(note.clone()));
            }
            if let Some(checked) = patch.checked {
                item.checked = Some(checked);
            }
            true
        })
    }

    /// 項目を削除する
    pub fn delete_items(&self, ids: &[String]) -> Result<Store> {
        self.mutate_list(|store, _| {
            let before = store.items.len();
            store.items.retain(|i| !ids.contains(&i.id));
            store.items.len() != before
        })
    }

    /// チェック済みの項目をすべて削除する
    pub fn clear_checked(&self) -> Result<Store> {
        self.mutate_list(|store, _| {
            let before = store.items.len();
            store.items.retain(|i| !i.is_checked());
            store.items.len() != before
        })
    }

    /// すべての項目を削除する
    pub fn clear_all(&self) -> Result<Store> {
        self.mutate_list(|store, _| {
            store.items.clear();
            true
        })
    }

    // =============================================
    // 内部処理
    // =============================================

    /// 生のblobと解釈済みのリストを読む
    ///
    /// 保存先のエラーだけを返し、中身の破損は空リスト扱いにする。
    fn load_list(&self) -> Result<(Option<String>, Store)> {
        let raw = self.repo.read_blob(LIST_KEY)?;
        let store = raw
            .as_deref()
            .and_then(|r| decode::<Store>(r, LIST_KEY))
            .unwrap_or_else(|| Store::empty(self.clock.now()));
        Ok((raw, store))
    }

    /// 読む → 計算 → 比較交換で書く
    ///
    /// `apply` が false を返した場合は変更なしとして書き込まない。
    /// 競合した場合は読み直して `apply` をやり直す。
    fn mutate_list<F>(&self, mut apply: F) -> Result<Store>
    where
        F: FnMut(&mut Store, &ListOptions) -> bool,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let (raw, mut store) = self.load_list()?;
            let options = self.read_options();

            if !apply(&mut store, &options) {
                return Ok(store);
            }
            store.updated_at = self.clock.now();

            let json = encode(&store)?;
            if self.repo.swap_blob(LIST_KEY, raw.as_deref(), &json)? {
                self.events.publish(StoreEvent::ListUpdated);
                return Ok(store);
            }
            debug!(attempt, "shopping list changed underneath, retrying");
        }
        Err(Error::Conflict(format!(
            "{} was modified concurrently {} times in a row",
            LIST_KEY, MAX_WRITE_ATTEMPTS
        )))
    }

    /// 追加要求を保存用の項目に変換（除外対象なら None）
    fn prepare_item(&self, item: NewShopItem, options: &ListOptions) -> Option<ShopItem> {
        let name = canonicalize(&item.name);
        if name.is_empty() {
            debug!("skipping item without a name");
            return None;
        }
        if options.exclude_pantry_staples && self.pantry.contains(&name) {
            debug!(name = %name, "skipping pantry staple");
            return None;
        }

        let (qty, parsed_unit) = match item.qty {
            Some(QtyInput::Number(n)) => ((n.is_finite() && n > 0.0).then_some(n), None),
            Some(QtyInput::Text(text)) => {
                let parsed = parse_amount(&text);
                ((parsed.amount > 0.0).then_some(parsed.amount), parsed.unit)
            }
            None => (None, None),
        };

        let mut unit = normalize_unit(item.unit.as_deref()).or(parsed_unit);
        if unit.is_none() && qty.is_some() {
            unit = default_unit_for(&name);
        }

        let (qty, unit) = match qty {
            Some(q) => {
                let (q, u) = upgrade(q, unit);
                (Some(q), u)
            }
            None => (None, unit),
        };

        let qty = match options.rounding {
            Rounding::Friendly => qty.map(|q| round_friendly(q, unit.as_ref())),
            Rounding::Exact => qty,
        };

        let cat = non_empty(item.cat).or_else(|| Some(categorize(&name).to_string()));

        Some(ShopItem {
            id: new_item_id(),
            name,
            qty,
            unit,
            cat,
            note: non_empty(item.note),
            checked: item.checked,
        })
    }
}

/// 既存項目へ合算、なければ末尾に追加
///
/// 名前（大文字小文字は無視）と単位が一致したら同じ項目とみなす。
/// 合計は繰り上げを再適用し、メモと売り場は先に入っていた値を優先する。
fn merge_item(items: &mut Vec<ShopItem>, new_item: ShopItem) {
    let name = new_item.name.to_lowercase();
    let position = items
        .iter()
        .position(|i| i.name.to_lowercase() == name && i.unit == new_item.unit);

    let Some(position) = position else {
        items.push(new_item);
        return;
    };
    let existing = &mut items[position];

    let total = match (existing.qty, new_item.qty) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    };
    if let Some(total) = total {
        let (qty, unit) = upgrade(total, existing.unit.take());
        existing.qty = Some(qty);
        existing.unit = unit;
    }
    if existing.note.is_none() {
        existing.note = new_item.note;
    }
    if existing.cat.is_none() {
        existing.cat = new_item.cat;
    }
    debug!(name = %existing.name, qty = ?existing.qty, "merged into existing item");
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn encode<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string(&Persisted {
        schema_version: SCHEMA_VERSION,
        data,
    })?)
}

/// 保存データを解釈（破損・バージョン違いは None）
fn decode<T: DeserializeOwned>(raw: &str, key: &str) -> Option<T> {
    match serde_json::from_str::<Persisted<T>>(raw) {
        Ok(p) if p.schema_version == SCHEMA_VERSION => Some(p.data),
        Ok(p) => {
            warn!(
                key,
                found = p.schema_version,
                expected = SCHEMA_VERSION,
                "schema version mismatch, ignoring stored data"
            );
            None
        }
        Err(e) => {
            warn!(key, error = %e, "stored data is not valid, ignoring it");
            None
        }
    }
}
