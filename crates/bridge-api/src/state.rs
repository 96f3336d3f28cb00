//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 계좌 상태 저장소와 알림 전송기를 보관합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use tokio::sync::RwLock;

use bridge_core::AccountState;
use bridge_notification::NotificationSender;

/// 애플리케이션 공유 상태.
///
/// 계좌 상태는 전역 변수가 아니라 여기에 소유된 값으로,
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
/// 동시 요청의 맵 변경은 `RwLock`이 직렬화합니다.
#[derive(Clone)]
pub struct AppState {
    /// 계좌 상태 저장소 - 열린 포지션 맵과 계좌명
    pub account: Arc<RwLock<AccountState>>,

    /// 알림 전송기 - 텔레그램 또는 테스트 더블
    pub notifier: Arc<dyn NotificationSender>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(notifier: Arc<dyn NotificationSender>) -> Self {
        Self {
            account: Arc::new(RwLock::new(AccountState::new())),
            notifier,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초)을 반환합니다.
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
pub(crate) use test_support::{create_test_state, RecordingSender};
