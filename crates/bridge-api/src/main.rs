//! MT5 웹훅 브릿지 서버.
//!
//! Axum 기반 HTTP 서버를 시작합니다.
//! MT5 터미널의 트레이드 이벤트를 수신하여 텔레그램으로 중계하고,
//! 헬스 체크 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use bridge_api::routes::create_api_router;
use bridge_api::state::AppState;
use bridge_core::logging::{init_logging, LogConfig};
use bridge_core::{AppConfig, TelegramSettings};
use bridge_notification::{NotificationSender, TelegramConfig, TelegramSender};

/// 텔레그램 전송 설정 결정.
///
/// 설정 파일의 자격 증명이 비어 있으면 `TELEGRAM_BOT_TOKEN` /
/// `TELEGRAM_CHAT_ID` 환경 변수로 대체합니다.
fn telegram_config(settings: &TelegramSettings) -> Option<TelegramConfig> {
    if !settings.bot_token.is_empty() && !settings.chat_id.is_empty() {
        let mut config =
            TelegramConfig::new(settings.bot_token.clone(), settings.chat_id.trim().to_string());
        config.enabled = settings.enabled;
        return Some(config);
    }

    TelegramConfig::from_env()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (파일은 선택, BRIDGE__ 환경 변수가 우선)
    let config = AppConfig::load_default()?;

    // tracing 초기화
    let log_format = config.logging.format.parse().unwrap_or_default();
    init_logging(LogConfig::new(config.logging.level.as_str()).with_format(log_format))?;

    info!("Starting MT5 webhook bridge...");

    // 알림 전송기 구성 - 자격 증명이 없으면 알림 없이 기동
    let notifier = match telegram_config(&config.telegram) {
        Some(telegram) => {
            info!(chat_id = %telegram.chat_id, "Telegram notifier configured");
            TelegramSender::new(telegram)
        }
        None => {
            warn!(
                "TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set, notifications will be disabled"
            );
            TelegramSender::disabled()
        }
    };

    let state = Arc::new(AppState::new(Arc::new(notifier)));
    info!(
        version = %state.version,
        notifier_enabled = state.notifier.is_enabled(),
        "Application state initialized"
    );

    // 라우터 생성
    let app = create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. BRIDGE__SERVER__HOST, BRIDGE__SERVER__PORT를 확인하세요."
            );
            e
        })?;

    // 서버 시작
    info!(%addr, "Webhook server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
