//! Domain errors.

use thiserror::Error;

/// Value Object の生成時エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("message text must not be empty")]
    EmptyMessageText,

    #[error("message text is too long ({length} > {max} characters)")]
    MessageTextTooLong { length: usize, max: usize },
}

/// Room カタログ構築時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("room catalog must contain at least one room")]
    EmptyCatalog,

    #[error("room '{0}' is defined more than once")]
    DuplicateRoom(String),
}
