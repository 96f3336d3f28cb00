//! 알림 타입 및 trait 정의.

use async_trait::async_trait;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
///
/// 전송 실패는 비치명적 사이드 채널로 분류됩니다. 호출자는 로깅 후
/// 무시해야 하며, 이 에러가 요청 처리를 실패시켜서는 안 됩니다.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도 가능")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// 알림 전송기 trait.
///
/// 메시지 포매팅은 `format` 모듈의 순수 함수가 담당하므로
/// 전송기는 완성된 텍스트만 받습니다.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 포매팅된 텍스트를 전송합니다.
    async fn send(&self, text: &str) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
