//! History Ring
//!
//! ルームごとの直近メッセージを保持する有界 FIFO。
//! 容量を超えた場合は最も古いエントリから破棄します。

use std::{collections::VecDeque, num::NonZeroUsize};

use serde::Serialize;

use super::value_object::{ConnectionId, DisplayName, MessageText, RoomName, Timestamp};

/// ルームごとの履歴のデフォルト容量
pub const DEFAULT_HISTORY_CAPACITY: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// 履歴の 1 エントリ
///
/// 追加後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub sender_id: ConnectionId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub room: RoomName,
    /// ルーム内の論理的な順序（1 始まり、単調増加）
    pub seq: u64,
    pub sent_at: Timestamp,
}

/// 有界の履歴リング
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<HistoryEntry>,
    capacity: NonZeroUsize,
    last_seq: u64,
}

impl HistoryRing {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            last_seq: 0,
        }
    }

    /// 次のエントリに割り当てる順序番号
    pub fn next_seq(&self) -> u64 {
        self.last_seq + 1
    }

    /// 末尾にエントリを追加し、容量を超えた分を先頭から破棄
    pub fn append(&mut self, entry: HistoryEntry) {
        self.last_seq = self.last_seq.max(entry.seq);
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity.get() {
            self.entries.pop_front();
        }
    }

    /// 古い順のコピーを返す
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ring: &HistoryRing, text: &str) -> HistoryEntry {
        HistoryEntry {
            sender_id: ConnectionId::new("alice".to_string()).unwrap(),
            sender_name: DisplayName::parse("Alice"),
            text: MessageText::new(text.to_string()).unwrap(),
            room: RoomName::new("Room 1".to_string()).unwrap(),
            seq: ring.next_seq(),
            sent_at: Timestamp::new(1000),
        }
    }

    fn texts(ring: &HistoryRing) -> Vec<String> {
        ring.snapshot()
            .into_iter()
            .map(|e| e.text.into_string())
            .collect()
    }

    #[test]
    fn test_new_ring_is_empty() {
        // テスト項目: 作成直後の履歴は空で、デフォルト容量は 25
        // given (前提条件):

        // when (操作):
        let ring = HistoryRing::default();

        // then (期待する結果):
        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 25);
        assert_eq!(ring.next_seq(), 1);
        assert!(ring.snapshot().is_empty());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        // テスト項目: 追加した順（古い順）で取得できる
        // given (前提条件):
        let mut ring = HistoryRing::default();

        // when (操作):
        for text in ["one", "two", "three"] {
            let e = entry(&ring, text);
            ring.append(e);
        }

        // then (期待する結果):
        assert_eq!(texts(&ring), vec!["one", "two", "three"]);
        let seqs: Vec<u64> = ring.snapshot().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        // テスト項目: 容量 25 に 30 件追加すると 6〜30 件目のみが残る
        // given (前提条件):
        let mut ring = HistoryRing::default();

        // when (操作):
        for i in 1..=30 {
            let e = entry(&ring, &format!("message {}", i));
            ring.append(e);
        }

        // then (期待する結果):
        assert_eq!(ring.len(), 25);
        let expected: Vec<String> = (6..=30).map(|i| format!("message {}", i)).collect();
        assert_eq!(texts(&ring), expected);
        assert_eq!(ring.snapshot()[0].seq, 6);
        assert_eq!(ring.last().map(|e| e.seq), Some(30));
        assert_eq!(ring.next_seq(), 31);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        // テスト項目: どの時点でも長さは容量以下
        // given (前提条件):
        let capacity = NonZeroUsize::new(3).unwrap();
        let mut ring = HistoryRing::new(capacity);

        for i in 0..10 {
            // when (操作):
            let e = entry(&ring, &i.to_string());
            ring.append(e);

            // then (期待する結果):
            assert!(ring.len() <= 3);
        }
        assert_eq!(texts(&ring), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_large_capacity_does_not_preallocate() {
        // テスト項目: 非常に大きな容量を指定しても作成時に確保されず、通常どおり追加できる
        // given (前提条件):
        let capacity = NonZeroUsize::new(usize::MAX).unwrap();

        // when (操作):
        let mut ring = HistoryRing::new(capacity);
        let e = entry(&ring, "hello");
        ring.append(e);

        // then (期待する結果):
        assert_eq!(ring.capacity(), usize::MAX);
        assert_eq!(texts(&ring), vec!["hello"]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_appends() {
        // テスト項目: スナップショットは後続の追加の影響を受けない
        // given (前提条件):
        let mut ring = HistoryRing::default();
        let e = entry(&ring, "before");
        ring.append(e);

        // when (操作):
        let snapshot = ring.snapshot();
        let e = entry(&ring, "after");
        ring.append(e);

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(ring.len(), 2);
    }
}
