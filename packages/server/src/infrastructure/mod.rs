//! Infrastructure 層
//!
//! - `config`: ルームカタログの読み込み
//! - `dto`: 通信プロトコルごとのデータ転送オブジェクト
//! - `message_pusher`: `MessagePusher` trait の実装

pub mod config;
pub mod dto;
pub mod message_pusher;
