//! 포지션 스냅샷 타입.
//!
//! 이 모듈은 계좌 상태 저장소가 보관하는 포지션 엔티티를 정의합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 포지션 상태.
///
/// 저장소에는 열린 포지션만 보관되므로 현재 상태는 `Open` 하나입니다.
/// 청산된 포지션은 맵에서 제거됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    /// 오픈 상태
    Open,
}

/// 열린 트레이딩 포지션의 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// 거래 심볼 (예: "EURUSD")
    pub symbol: String,
    /// 거래량 (랏)
    pub lots: Decimal,
    /// 현재 손익
    pub profit: Decimal,
    /// 주문 유형 (BUY/SELL, 전체 갱신 이벤트에서만 전달됨)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    /// 포지션 상태
    pub status: PositionStatus,
}

impl Position {
    /// 새 오픈 포지션을 생성합니다.
    pub fn open(symbol: impl Into<String>, lots: Decimal, profit: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            lots,
            profit,
            order_type: None,
            status: PositionStatus::Open,
        }
    }

    /// 주문 유형을 설정합니다.
    pub fn with_order_type(mut self, order_type: Option<String>) -> Self {
        self.order_type = order_type;
        self
    }
}
