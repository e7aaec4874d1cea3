//! Server state shared by all handlers.

use std::sync::Arc;

use crate::usecase::MembershipCoordinator;

/// Shared application state
pub struct AppState {
    /// MembershipCoordinator（ルームのメンバーシップと履歴の唯一の所有者）
    pub coordinator: Arc<MembershipCoordinator>,
}
