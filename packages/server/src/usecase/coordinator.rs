//! UseCase: Membership Coordinator
//!
//! ## 責務
//!
//! - 接続ごとの Session の生成と破棄
//! - 入室要求の検証（Room Registry）とルーム間の移動
//! - メッセージの形式検証、履歴への追加、ルーム内へのブロードキャスト
//! - 入退室の通知
//!
//! ## ロックの方針
//!
//! - ルームごとに 1 つの `Mutex<RoomState>` でメンバー集合と履歴をまとめて保護します
//! - ルームの表は起動後に変化しないため、ルームをまたぐロックは不要です
//! - ルームのロックを 2 つ同時に保持することはありません（移動時は旧ルーム → 新ルームの順）
//! - Session の表のロックをルームのロック取得中に保持することはありません
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - connect / join_room / send_message / disconnect の各操作
//! - 配信先が常にルームの現在のメンバーに限られること
//!
//! ### どのような状況を想定しているか
//! - 正常系：入室、ルーム移動、メッセージ送信、切断
//! - 異常系：存在しないルーム、合言葉の誤り・未指定、形式不備のメッセージ
//! - エッジケース：同じルームへの再入室、未入室のままの切断

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};

use blipchat_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, HistoryEntry, MessagePusher, MessageText, PusherChannel, Room,
    RoomName, RoomRegistry, RoomState, ServerEvent, Session, SessionState, SystemNotice,
    Timestamp, ValueObjectError, history::DEFAULT_HISTORY_CAPACITY,
};

use super::{
    broadcast::BroadcastGateway,
    error::{ConnectError, DisconnectError, JoinRoomError, MalformedReason, SendMessageError},
    request::{ChatRequest, JoinRequest},
};

/// 入室成功時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room: RoomName,
    /// 入室時点の履歴（古い順）
    pub history: Vec<HistoryEntry>,
    /// 移動前にいたルーム（別のルームから移動した場合のみ）
    pub left: Option<RoomName>,
}

/// ルームの概要（HTTP API 用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOverview {
    pub name: RoomName,
    pub protected: bool,
    pub members: usize,
    pub history: usize,
    pub last_message_at: Option<Timestamp>,
}

/// Membership Coordinator
///
/// 起動時に一度だけ作成し、`Arc` で全てのハンドラに共有します。
pub struct MembershipCoordinator {
    /// ルームカタログ
    registry: RoomRegistry,
    /// ルームごとの状態（キーは起動後に変化しない）
    rooms: HashMap<RoomName, Mutex<RoomState>>,
    /// 接続中の Session
    sessions: Mutex<HashMap<ConnectionId, Session>>,
    /// Broadcast Gateway
    gateway: BroadcastGateway,
    clock: Arc<dyn Clock>,
}

impl MembershipCoordinator {
    /// デフォルトの履歴容量とシステム時計で作成
    pub fn new(registry: RoomRegistry, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self::with_options(
            registry,
            message_pusher,
            DEFAULT_HISTORY_CAPACITY,
            Arc::new(SystemClock),
        )
    }

    pub fn with_options(
        registry: RoomRegistry,
        message_pusher: Arc<dyn MessagePusher>,
        history_capacity: NonZeroUsize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rooms = registry
            .rooms()
            .map(|room| (room.name.clone(), Mutex::new(RoomState::new(history_capacity))))
            .collect();

        Self {
            registry,
            rooms,
            sessions: Mutex::new(HashMap::new()),
            gateway: BroadcastGateway::new(message_pusher),
            clock,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    fn room_state(&self, name: &RoomName) -> &Mutex<RoomState> {
        // The room table is built from the registry, so every resolved room has a state.
        &self.rooms[name]
    }

    /// 接続を受け付け、Unjoined 状態の Session を作成
    ///
    /// 送信チャンネルを登録し、接続 ID をクライアントに通知します。
    pub async fn connect(
        &self,
        id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = self.now();
        {
            let mut sessions = self.sessions.lock().await;
            if sessions.contains_key(&id) {
                return Err(ConnectError::DuplicateConnectionId(id.into_string()));
            }
            sessions.insert(id.clone(), Session::new(id.clone(), connected_at));
        }

        self.gateway
            .message_pusher()
            .register_client(id.clone(), sender)
            .await;
        self.gateway
            .unicast(&id, &ServerEvent::Connected { id: id.clone() })
            .await;

        tracing::info!("Session '{}' created", id);
        Ok(connected_at)
    }

    /// 入室要求を処理
    ///
    /// 失敗時は要求元にのみ `roomJoined` の代わりに `roomJoinFailed` を送り、
    /// メンバーシップと履歴は変更しません。
    pub async fn join_room(
        &self,
        id: &ConnectionId,
        request: JoinRequest,
    ) -> Result<JoinOutcome, JoinRoomError> {
        match self.try_join_room(id, request).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!("Join rejected for '{}': {}", id, e);
                let event = ServerEvent::RoomJoinFailed {
                    reason: e.client_reason().to_string(),
                };
                self.gateway.unicast(id, &event).await;
                Err(e)
            }
        }
    }

    async fn try_join_room(
        &self,
        id: &ConnectionId,
        request: JoinRequest,
    ) -> Result<JoinOutcome, JoinRoomError> {
        // 1. ルームの解決とアクセス制御
        let room: &Room = self
            .registry
            .resolve(&request.room_name)
            .ok_or_else(|| JoinRoomError::InvalidRoom(request.room_name.clone()))?;
        if !room.admits(request.password.as_deref()) {
            return Err(JoinRoomError::AccessDenied(room.name.to_string()));
        }
        let target = room.name.clone();

        // 2. Session の現在の状態を取得
        let (previous_room, previous_name) = {
            let sessions = self.sessions.lock().await;
            let session = sessions
                .get(id)
                .ok_or_else(|| JoinRoomError::UnknownSession(id.to_string()))?;
            let previous_room = match session.state() {
                SessionState::Joined(room) => Some(room.clone()),
                SessionState::Unjoined => None,
            };
            (previous_room, session.announce_name().to_string())
        };
        // 空白のみの表示名は未指定として扱い、既存の表示名を維持する
        let new_name = request
            .username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(DisplayName::parse);

        // 3. 別のルームにいた場合は退室し、残りのメンバーに通知
        let left = match previous_room {
            Some(old) if old != target => {
                let mut old_state = self.room_state(&old).lock().await;
                old_state.remove_member(id);
                let notice = SystemNotice::left(old.clone(), &previous_name, self.now());
                self.gateway
                    .broadcast(&old_state, &ServerEvent::Notice(notice))
                    .await;
                tracing::info!("'{}' left room '{}'", id, old);
                Some(old)
            }
            _ => None,
        };

        // 4. 新しいルームに参加し、Session を更新
        let announce_name = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions
                .get_mut(id)
                .ok_or_else(|| JoinRoomError::UnknownSession(id.to_string()))?;
            session.current_room = Some(target.clone());
            if let Some(name) = new_name {
                session.display_name = Some(name);
            }
            session.announce_name().to_string()
        };

        let history = {
            let mut state = self.room_state(&target).lock().await;
            state.add_member(id.clone());
            let history = state.history().snapshot();

            // 5. 要求元にのみ履歴を返す
            let joined = ServerEvent::RoomJoined {
                room: target.clone(),
                history: history.clone(),
            };
            self.gateway.unicast(id, &joined).await;

            // 6. 入室者本人を含むルームの全員に通知
            let notice = SystemNotice::joined(target.clone(), &announce_name, self.now());
            self.gateway
                .broadcast(&state, &ServerEvent::Notice(notice))
                .await;
            history
        };

        tracing::info!("'{}' joined room '{}'", id, target);
        Ok(JoinOutcome {
            room: target,
            history,
            left,
        })
    }

    /// チャットメッセージを処理
    ///
    /// 形式不備のメッセージはログに記録して破棄し、送信者には何も返しません。
    /// 宛先のルームは送信者が現在参加しているルームでなければなりません。
    pub async fn send_message(
        &self,
        id: &ConnectionId,
        request: ChatRequest,
    ) -> Result<HistoryEntry, SendMessageError> {
        let result = self.try_send_message(id, request).await;
        if let Err(e) = &result {
            tracing::warn!("Dropped message from '{}': {}", id, e);
        }
        result
    }

    async fn try_send_message(
        &self,
        id: &ConnectionId,
        request: ChatRequest,
    ) -> Result<HistoryEntry, SendMessageError> {
        // 送信者 ID は常に接続 ID。クライアントの申告値は使わない
        if let Some(claimed_id) = request.id.as_deref().filter(|claimed| *claimed != id.as_str()) {
            tracing::debug!("Ignoring claimed sender id '{}' from '{}'", claimed_id, id);
        }

        // 1. 形式の検証
        let text = MessageText::new(request.text.unwrap_or_default()).map_err(|e| match e {
            ValueObjectError::MessageTextTooLong { .. } => MalformedReason::TextTooLong,
            _ => MalformedReason::MissingText,
        })?;
        let claimed_name = request
            .username
            .filter(|name| !name.trim().is_empty())
            .ok_or(MalformedReason::MissingUsername)?;
        let claimed_room = request.room.ok_or(MalformedReason::MissingRoom)?;
        let room = self
            .registry
            .resolve(&claimed_room)
            .ok_or_else(|| MalformedReason::UnknownRoom(claimed_room.clone()))?;

        // 2. 送信者が宛先ルームのメンバーであること
        let sender_name = {
            let sessions = self.sessions.lock().await;
            let session = sessions
                .get(id)
                .ok_or_else(|| SendMessageError::UnknownSession(id.to_string()))?;
            if !session.is_in(&room.name) {
                return Err(MalformedReason::NotAMember(room.name.to_string()).into());
            }
            session
                .display_name
                .clone()
                .unwrap_or_else(|| DisplayName::parse(&claimed_name))
        };

        // 3. 履歴に追加し、4. 送信者を含むルームの全員に配信
        let mut state = self.room_state(&room.name).lock().await;
        let entry = HistoryEntry {
            sender_id: id.clone(),
            sender_name,
            text,
            room: room.name.clone(),
            seq: state.history().next_seq(),
            sent_at: self.now(),
        };
        state.append(entry.clone());
        let targets = self
            .gateway
            .broadcast(&state, &ServerEvent::Chat(entry.clone()))
            .await;

        tracing::debug!(
            "[{}] {} ({}): delivered to {} member(s)",
            entry.room,
            entry.sender_name,
            id,
            targets.len()
        );
        Ok(entry)
    }

    /// 切断を処理
    ///
    /// ルームに参加していた場合は退室させ、残りのメンバーに通知してから Session を破棄します。
    pub async fn disconnect(&self, id: &ConnectionId) -> Result<Option<RoomName>, DisconnectError> {
        let session = self
            .sessions
            .lock()
            .await
            .remove(id)
            .ok_or_else(|| DisconnectError::UnknownSession(id.to_string()))?;

        let left = match &session.current_room {
            Some(room) => {
                let mut state = self.room_state(room).lock().await;
                state.remove_member(id);
                let notice = SystemNotice::left(room.clone(), session.announce_name(), self.now());
                self.gateway
                    .broadcast(&state, &ServerEvent::Notice(notice))
                    .await;
                tracing::info!("'{}' left room '{}' (disconnected)", id, room);
                Some(room.clone())
            }
            None => None,
        };

        self.gateway.message_pusher().unregister_client(id).await;
        tracing::info!("Session '{}' terminated", id);
        Ok(left)
    }

    /// 全ルームの概要をカタログ順に取得
    pub async fn room_overviews(&self) -> Vec<RoomOverview> {
        let mut overviews = Vec::with_capacity(self.registry.len());
        for room in self.registry.rooms() {
            let state = self.room_state(&room.name).lock().await;
            overviews.push(RoomOverview {
                name: room.name.clone(),
                protected: room.requires_secret(),
                members: state.member_count(),
                history: state.history().len(),
                last_message_at: state.history().last().map(|e| e.sent_at),
            });
        }
        overviews
    }

    /// ルームの現在のメンバー
    pub async fn members_of(&self, room: &str) -> Option<Vec<ConnectionId>> {
        let room = self.registry.resolve(room)?;
        Some(self.room_state(&room.name).lock().await.members())
    }

    /// ルームの履歴のスナップショット
    pub async fn history_of(&self, room: &str) -> Option<Vec<HistoryEntry>> {
        let room = self.registry.resolve(room)?;
        Some(self.room_state(&room.name).lock().await.history().snapshot())
    }

    /// Session のコピー
    pub async fn session(&self, id: &ConnectionId) -> Option<Session> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
