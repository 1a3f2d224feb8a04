//! 変更通知
//!
//! 書き込みが成功するたびに「リスト更新」「設定更新」を購読者へ送る。
//! 通知に中身はなく、受け取った側はリスト全体を読み直す。

use tokio::sync::broadcast;

/// 変更イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ListUpdated,
    OptionsUpdated,
}

/// イベントバス
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    const CAPACITY: usize = 64;

    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self { sender }
    }

    /// 購読を開始
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// 通知を送る（購読者がいなくてもエラーにしない）
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
