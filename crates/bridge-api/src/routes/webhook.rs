//! MT5 웹훅 route.
//!
//! 트레이드 이벤트를 수신하여 계좌 상태에 반영하고,
//! 진입/청산 이벤트와 `/status` 명령어에 대해 텔레그램 알림을 중계합니다.
//!
//! 파싱 실패를 제외한 모든 요청은 성공으로 응답합니다. 알림 전송
//! 실패는 비치명적 사이드 채널로 분류되어 로깅 후 무시됩니다.

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, routing::post, Json,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use bridge_core::{BotCommand, WebhookPayload};
use bridge_notification::format::{status_message, trade_message};

use crate::state::AppState;

/// 웹훅 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// "success" 또는 "error"
    pub status: String,
    /// 에러 메시지 (실패 시에만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResponse {
    /// 성공 응답.
    fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    /// 에러 응답.
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }
}

/// MT5 웹훅 처리.
///
/// `POST /api/v1/webhook`
///
/// 처리 순서:
/// 1. 본문 파싱 (실패 시 400, 상태 변경 없음)
/// 2. 이벤트를 계좌 상태에 반영
/// 3. 진입/청산 이벤트면 트레이드 알림 전송
/// 4. 본문에 `/status` 명령어가 있으면 상태 리포트 전송 (3과 독립)
/// 5. 항상 `{"status":"success"}` 응답
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    let payload = match WebhookPayload::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Malformed webhook body");
            return (
                StatusCode::BAD_REQUEST,
                Json(WebhookResponse::error(e.to_string())),
            );
        }
    };

    if let Some(event) = &payload.event {
        state.account.write().await.apply(event);

        if let Some(text) = trade_message(event) {
            info!("Relaying trade notification");
            if let Err(e) = state.notifier.send(&text).await {
                warn!(error = %e, "Failed to send trade notification");
            }
        }
    }

    match payload.command() {
        Some(BotCommand::Status) => {
            let snapshot = state.account.read().await.snapshot();
            let text = status_message(&snapshot);
            info!(
                positions = snapshot.positions.len(),
                "Relaying status report"
            );
            if let Err(e) = state.notifier.send(&text).await {
                warn!(error = %e, "Failed to send status report");
            }
        }
        Some(BotCommand::Unknown(text)) => {
            debug!(text = %text, "Ignoring unknown command");
        }
        None => {}
    }

    (StatusCode::OK, Json(WebhookResponse::success()))
}

/// 웹훅 라우터 생성.
pub fn webhook_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(handle_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{create_test_state, RecordingSender};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<RecordingSender>) {
        let (state, sender) = create_test_state();
        let app = Router::new()
            .nest("/api/v1/webhook", webhook_router())
            .with_state(Arc::new(state));
        (app, sender)
    }

    async fn post_webhook(app: &Router, body: &str) -> (StatusCode, WebhookResponse) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_opened_event_then_status_command() {
        let (app, sender) = test_app();

        let (status, response) = post_webhook(
            &app,
            r#"{"type":"POSITION_OPENED","ticket":101,"symbol":"EURUSD","lots":0.1,
               "profit":12.5,"orderType":"BUY","accountName":"Acc1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "success");

        let (status, _) = post_webhook(&app, r#"{"message":{"text":"/status"}}"#).await;
        assert_eq!(status, StatusCode::OK);

        let sent = sender.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("<b>Открыто</b>"));
        assert!(sent[0].contains("Прибыль: +12.5$"));
        assert!(sent[1].contains("<b>Отчет о статусе</b>"));
        assert!(sent[1].contains("EURUSD"));
        assert!(sent[1].contains("+12.5$"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_error_and_keeps_state() {
        let (app, sender) = test_app();

        post_webhook(
            &app,
            r#"{"type":"POSITION_OPENED","ticket":1,"symbol":"EURUSD","lots":1,
               "profit":0,"accountName":"Acc1"}"#,
        )
        .await;

        let (status, response) = post_webhook(&app, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.status, "error");
        assert!(response.message.is_some());

        // 파싱 실패는 상태를 건드리지 않음 - 기존 포지션이 그대로 보임
        let (_, _) = post_webhook(&app, r#"{"message":{"text":"/status"}}"#).await;
        let sent = sender.sent();
        assert!(sent.last().unwrap().contains("EURUSD"));
    }

    #[tokio::test]
    async fn test_unknown_event_tag_is_accepted_silently() {
        let (app, sender) = test_app();

        let (status, response) =
            post_webhook(&app, r#"{"type":"HEARTBEAT","accountName":"Acc1"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "success");
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_positions_update_does_not_notify() {
        let (app, sender) = test_app();

        let (status, _) = post_webhook(
            &app,
            r#"{"type":"POSITIONS_UPDATE","positions":[
                {"ticket":200,"symbol":"XAUUSD","lots":1,"profit":-7,"orderType":"SELL"}],
               "accountName":"Acc2"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(sender.sent().is_empty());

        // 갱신 결과는 상태 리포트로 확인
        post_webhook(&app, r#"{"message":{"text":"/status"}}"#).await;
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("XAUUSD"));
        assert!(sent[0].contains("Тип сделки: SELL"));
        assert!(sent[0].contains("-7$"));
    }

    #[tokio::test]
    async fn test_event_and_command_in_same_body() {
        let (app, sender) = test_app();

        let (status, _) = post_webhook(
            &app,
            r#"{"type":"POSITION_CLOSED","ticket":5,"accountName":"Acc1",
               "message":{"text":"/status"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let sent = sender.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("<b>Закрыто</b>"));
        assert!(sent[1].contains("Нет активных позиций."));
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let sender = Arc::new(RecordingSender::failing());
        let state = AppState::new(sender.clone());
        let app = Router::new()
            .nest("/api/v1/webhook", webhook_router())
            .with_state(Arc::new(state));

        let (status, response) = post_webhook(
            &app,
            r#"{"type":"POSITION_OPENED","ticket":1,"symbol":"EURUSD","lots":1,
               "profit":5,"orderType":"BUY","accountName":"Acc1"}"#,
        )
        .await;

        // 알림 실패는 요청을 실패시키지 않음
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "success");
    }

    #[tokio::test]
    async fn test_unknown_command_gets_no_reply() {
        let (app, sender) = test_app();

        let (status, _) = post_webhook(&app, r#"{"message":{"text":"/help"}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(sender.sent().is_empty());
    }
}
