//! API 라우트.
//!
//! 모든 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/webhook` - MT5 트레이드 이벤트 웹훅

pub mod health;
pub mod webhook;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use webhook::{webhook_router, WebhookResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/webhook", webhook_router())
}
