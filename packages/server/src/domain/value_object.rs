//! Value Objects
//!
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証します。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// 表示名の最大文字数
pub const MAX_DISPLAY_NAME_CHARS: usize = 20;

/// 表示名が未設定の場合のデフォルト値
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// メッセージ本文の最大文字数
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// 接続 ID
///
/// トランスポート層が接続ごとに割り当てる不透明な識別子。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    /// UUID v4 から新しい接続 ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名
///
/// 前後の空白を除去し、最大 [`MAX_DISPLAY_NAME_CHARS`] 文字に切り詰めます。
/// 空の場合は [`DEFAULT_DISPLAY_NAME`] になります。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::anonymous();
        }
        Self(trimmed.chars().take(MAX_DISPLAY_NAME_CHARS).collect())
    }

    pub fn anonymous() -> Self {
        Self(DEFAULT_DISPLAY_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルーム名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyRoomName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// チャットメッセージ本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyMessageText);
        }
        let length = value.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                length,
                max: MAX_MESSAGE_CHARS,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（UTC, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_rejects_blank() {
        // テスト項目: 空白のみの接続 ID は生成できない
        // given (前提条件):
        let raw = "   ".to_string();

        // when (操作):
        let result = ConnectionId::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyConnectionId));
    }

    #[test]
    fn test_connection_id_generate_is_unique() {
        // テスト項目: 生成された接続 ID は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_display_name_defaults_to_anonymous() {
        // テスト項目: 空または空白のみの表示名は Anonymous になる
        // given (前提条件):
        let inputs = ["", "   ", "\t\n"];

        for raw in inputs {
            // when (操作):
            let name = DisplayName::parse(raw);

            // then (期待する結果):
            assert_eq!(name.as_str(), DEFAULT_DISPLAY_NAME);
        }
    }

    #[test]
    fn test_display_name_is_trimmed_and_truncated() {
        // テスト項目: 表示名は前後の空白が除去され 20 文字に切り詰められる
        // given (前提条件):
        let raw = "  abcdefghijklmnopqrstuvwxyz  ";

        // when (操作):
        let name = DisplayName::parse(raw);

        // then (期待する結果):
        assert_eq!(name.as_str(), "abcdefghijklmnopqrst");
        assert_eq!(name.as_str().chars().count(), MAX_DISPLAY_NAME_CHARS);
    }

    #[test]
    fn test_display_name_truncates_by_characters_not_bytes() {
        // テスト項目: マルチバイト文字も文字単位で切り詰められる
        // given (前提条件):
        let raw = "あ".repeat(25);

        // when (操作):
        let name = DisplayName::parse(&raw);

        // then (期待する結果):
        assert_eq!(name.as_str().chars().count(), MAX_DISPLAY_NAME_CHARS);
    }

    #[test]
    fn test_message_text_validation() {
        // テスト項目: 空のメッセージと長すぎるメッセージは拒否される
        // given (前提条件):
        let too_long = "a".repeat(MAX_MESSAGE_CHARS + 1);

        // when (操作):
        let empty = MessageText::new(String::new());
        let long = MessageText::new(too_long);
        let ok = MessageText::new("hi".to_string());

        // then (期待する結果):
        assert_eq!(empty, Err(ValueObjectError::EmptyMessageText));
        assert!(matches!(
            long,
            Err(ValueObjectError::MessageTextTooLong { .. })
        ));
        assert_eq!(ok.unwrap().as_str(), "hi");
    }

    #[test]
    fn test_room_name_rejects_empty() {
        // テスト項目: 空のルーム名は生成できない
        // given (前提条件):

        // when (操作):
        let result = RoomName::new(String::new());

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomName));
    }
}
