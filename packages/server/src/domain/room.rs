//! Room and its access policy.

use std::{fmt, sync::Arc};

use super::value_object::RoomName;

/// 入室時の合言葉を検証する trait
///
/// 平文比較以外の方式（ハッシュ化された合言葉など）に差し替えられるよう、
/// Room は具体的な比較方法ではなくこの trait に依存します。
pub trait SecretVerifier: Send + Sync {
    fn verify(&self, attempt: &str) -> bool;
}

/// 平文の合言葉と完全一致で比較する検証器
#[derive(Clone)]
pub struct PlainSecret(String);

impl PlainSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl SecretVerifier for PlainSecret {
    fn verify(&self, attempt: &str) -> bool {
        self.0 == attempt
    }
}

// The secret must never end up in logs.
impl fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainSecret(***)")
    }
}

/// ルームのアクセスポリシー
#[derive(Clone)]
pub enum AccessPolicy {
    /// 誰でも入室できる
    Open,
    /// 合言葉が必要
    Protected(Arc<dyn SecretVerifier>),
}

impl AccessPolicy {
    /// 平文の合言葉で保護されたポリシーを作成
    pub fn plain_secret(secret: impl Into<String>) -> Self {
        Self::Protected(Arc::new(PlainSecret::new(secret)))
    }

    /// 入室を許可するかどうか
    ///
    /// 合言葉の誤りと未指定は区別しません。
    pub fn admits(&self, attempt: Option<&str>) -> bool {
        match self {
            Self::Open => true,
            Self::Protected(verifier) => attempt.is_some_and(|secret| verifier.verify(secret)),
        }
    }
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Protected(_) => f.write_str("Protected"),
        }
    }
}

/// ルーム
///
/// 起動時に一度だけ作成され、実行中に追加・削除されることはありません。
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    pub policy: AccessPolicy,
}

impl Room {
    pub fn open(name: RoomName) -> Self {
        Self {
            name,
            policy: AccessPolicy::Open,
        }
    }

    pub fn protected(name: RoomName, verifier: Arc<dyn SecretVerifier>) -> Self {
        Self {
            name,
            policy: AccessPolicy::Protected(verifier),
        }
    }

    pub fn requires_secret(&self) -> bool {
        matches!(self.policy, AccessPolicy::Protected(_))
    }

    pub fn admits(&self, attempt: Option<&str>) -> bool {
        self.policy.admits(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_name(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_open_room_admits_everyone() {
        // テスト項目: オープンなルームは合言葉の有無に関わらず入室できる
        // given (前提条件):
        let room = Room::open(room_name("Room 1"));

        // when (操作) / then (期待する結果):
        assert!(!room.requires_secret());
        assert!(room.admits(None));
        assert!(room.admits(Some("anything")));
    }

    #[test]
    fn test_protected_room_requires_exact_secret() {
        // テスト項目: 保護されたルームは完全一致する合言葉のみ受け付ける
        // given (前提条件):
        let room = Room {
            name: room_name("Admin Room"),
            policy: AccessPolicy::plain_secret("aqua"),
        };

        // when (操作) / then (期待する結果):
        assert!(room.requires_secret());
        assert!(room.admits(Some("aqua")));
        assert!(!room.admits(Some("Aqua")));
        assert!(!room.admits(Some("aqua ")));
        assert!(!room.admits(Some("")));
        assert!(!room.admits(None));
    }

    #[test]
    fn test_custom_verifier_is_used() {
        // テスト項目: 独自の SecretVerifier 実装に差し替えられる
        // given (前提条件):
        struct AcceptsUppercase;
        impl SecretVerifier for AcceptsUppercase {
            fn verify(&self, attempt: &str) -> bool {
                !attempt.is_empty() && attempt.chars().all(|c| c.is_ascii_uppercase())
            }
        }
        let room = Room::protected(room_name("Private 1"), Arc::new(AcceptsUppercase));

        // when (操作) / then (期待する結果):
        assert!(room.admits(Some("LINK")));
        assert!(!room.admits(Some("link")));
    }

    #[test]
    fn test_debug_output_hides_secret() {
        // テスト項目: Debug 出力に合言葉が含まれない
        // given (前提条件):
        let policy = AccessPolicy::plain_secret("hunter2");
        let secret = PlainSecret::new("hunter2");

        // when (操作):
        let policy_debug = format!("{:?}", policy);
        let secret_debug = format!("{:?}", secret);

        // then (期待する結果):
        assert!(!policy_debug.contains("hunter2"));
        assert!(!secret_debug.contains("hunter2"));
    }
}
