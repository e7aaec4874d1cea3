//! UseCase 層
//!
//! 入室・メッセージ送信・切断といった受信イベントごとの処理を提供します。
//! ルームのメンバーシップと履歴は `MembershipCoordinator` が排他的に所有します。

pub mod broadcast;
pub mod coordinator;
pub mod error;
pub mod request;

pub use broadcast::BroadcastGateway;
pub use coordinator::{JoinOutcome, MembershipCoordinator, RoomOverview};
pub use error::{ConnectError, DisconnectError, JoinRoomError, MalformedReason, SendMessageError};
pub use request::{ChatRequest, JoinRequest};
