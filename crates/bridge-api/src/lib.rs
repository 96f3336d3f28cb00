//! MT5 웹훅 HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - MT5 트레이드 이벤트를 수신하는 Axum 기반 웹훅 엔드포인트
//! - 계좌 상태 스냅샷 관리 및 텔레그램 알림 중계
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: 웹훅 및 헬스 체크 엔드포인트

pub mod routes;
pub mod state;

pub use routes::*;
pub use state::AppState;
