//! 인바운드 웹훅 이벤트 타입.
//!
//! MT5 터미널이 전송하는 웹훅 본문을 정의합니다:
//! - `TradeEvent` - `type` 필드로 태깅된 트레이드 이벤트
//! - `CommandMessage` - 본문에 포함될 수 있는 봇 명령어 메시지
//! - `WebhookPayload` - 이벤트와 명령어를 함께 담는 파싱 결과
//!
//! 이벤트와 명령어는 같은 본문에 동시에 존재할 수 있으며,
//! 둘 다 없는 본문도 유효합니다 (no-op).

use rust_decimal::Decimal;
use serde::Deserialize;

/// 포지션 고유 식별자 (MT5 티켓 번호).
pub type Ticket = i64;

/// MT5 터미널에서 수신하는 트레이드 이벤트.
///
/// `type` 필드로 구분되는 닫힌 태그드 유니온입니다.
/// 알 수 없는 태그는 `Unknown`으로 파싱되어 명시적 no-op으로 처리됩니다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum TradeEvent {
    /// 포지션 진입
    #[serde(rename = "POSITION_OPENED", rename_all = "camelCase")]
    PositionOpened {
        ticket: Ticket,
        symbol: String,
        lots: Decimal,
        profit: Decimal,
        #[serde(default)]
        order_type: Option<String>,
        account_name: String,
    },
    /// 포지션 청산
    ///
    /// 터미널은 티켓과 계좌명만 보내지만, 나머지 필드가 포함되면
    /// 알림 메시지에 사용됩니다.
    #[serde(rename = "POSITION_CLOSED", rename_all = "camelCase")]
    PositionClosed {
        ticket: Ticket,
        account_name: String,
        #[serde(default)]
        symbol: Option<String>,
        #[serde(default)]
        lots: Option<Decimal>,
        #[serde(default)]
        profit: Option<Decimal>,
        #[serde(default)]
        order_type: Option<String>,
    },
    /// 전체 포지션 갱신 (전량 교체)
    #[serde(rename = "POSITIONS_UPDATE", rename_all = "camelCase")]
    PositionsUpdate {
        positions: Vec<PositionReport>,
        account_name: String,
    },
    /// 알 수 없는 이벤트 태그 - 상태 변경 없이 무시됩니다.
    #[serde(other)]
    Unknown,
}

impl TradeEvent {
    /// 알림을 발송해야 하는 이벤트인지 확인합니다.
    ///
    /// 진입/청산 이벤트만 알림 대상이며, 전체 갱신은 조용히 반영됩니다.
    pub fn is_notifiable(&self) -> bool {
        matches!(
            self,
            TradeEvent::PositionOpened { .. } | TradeEvent::PositionClosed { .. }
        )
    }
}

/// `POSITIONS_UPDATE` 이벤트의 개별 포지션 항목.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub ticket: Ticket,
    pub symbol: String,
    pub lots: Decimal,
    pub profit: Decimal,
    #[serde(default)]
    pub order_type: Option<String>,
}

/// 웹훅 본문에 포함된 명령어 메시지.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandMessage {
    /// 명령어 텍스트 (없으면 명령어 아님)
    #[serde(default)]
    pub text: Option<String>,
}

/// 봇 명령어 타입.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// 계좌 상태 리포트
    Status,
    /// 알 수 없는 명령어 - 응답 없이 무시됩니다.
    Unknown(String),
}

impl BotCommand {
    /// 텍스트에서 명령어 파싱.
    ///
    /// `/status` 리터럴과의 완전 일치만 인식합니다.
    pub fn parse(text: &str) -> Self {
        match text {
            "/status" => BotCommand::Status,
            other => BotCommand::Unknown(other.to_string()),
        }
    }
}

/// 파싱된 웹훅 본문.
///
/// 트레이드 이벤트와 명령어 메시지는 독립적으로 처리됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    /// 트레이드 이벤트 (`type` 필드가 없으면 None)
    pub event: Option<TradeEvent>,
    /// 명령어 메시지
    pub message: Option<CommandMessage>,
}

impl WebhookPayload {
    /// 원시 JSON 본문을 파싱합니다.
    ///
    /// # Errors
    /// 본문이 JSON이 아니거나, `type` 태그가 선언한 형태와 맞지 않거나,
    /// `message` 필드가 객체가 아니면 에러를 반환합니다.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// JSON 값을 파싱합니다.
    ///
    /// `type` 필드가 있을 때만 이벤트로 해석합니다. 없는 본문은
    /// 명령어 전용 요청일 수 있으므로 에러가 아닙니다.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let message = value
            .get("message")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?;

        let event = if value.get("type").is_some() {
            Some(serde_json::from_value(value)?)
        } else {
            None
        };

        Ok(Self { event, message })
    }

    /// 본문에 포함된 명령어를 반환합니다.
    pub fn command(&self) -> Option<BotCommand> {
        let text = self.message.as_ref()?.text.as_deref()?;
        Some(BotCommand::parse(text))
    }
}
