//! 계좌 상태 저장소.
//!
//! 티켓 번호로 키잉된 열린 포지션 맵과 현재 계좌명을 보관합니다.
//! 프로세스 수명 동안만 유지되며 영속화하지 않습니다.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Position, PositionStatus, Ticket, TradeEvent};

/// 프로세스 전역 계좌 상태.
///
/// 전역 변수가 아니라 소유된 값으로 만들어 핸들러에 주입합니다.
/// 공유는 호출 측에서 `Arc<RwLock<_>>`로 감싸서 수행합니다.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    positions: HashMap<Ticket, Position>,
    account_name: String,
}

/// 특정 시점의 읽기 전용 계좌 상태 사본.
///
/// 포지션 순서는 맵 순회 순서를 따르며 안정적이지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub positions: Vec<(Ticket, Position)>,
    pub account_name: String,
}

impl AccountState {
    /// 빈 계좌 상태를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 트레이드 이벤트를 상태에 반영합니다.
    ///
    /// - `PositionOpened`: 티켓 키로 삽입/덮어쓰기 (중복 진입은 덮어쓰기)
    /// - `PositionClosed`: 티켓 키 제거 (없어도 에러 아님)
    /// - `PositionsUpdate`: 맵 전체를 비우고 이벤트 목록으로 교체
    /// - `Unknown`: no-op
    ///
    /// `Unknown`을 제외한 모든 변형은 계좌명을 갱신합니다.
    pub fn apply(&mut self, event: &TradeEvent) {
        match event {
            TradeEvent::PositionOpened {
                ticket,
                symbol,
                lots,
                profit,
                account_name,
                ..
            } => {
                // 진입 이벤트의 orderType은 저장하지 않음 (전체 갱신에서만 채워짐)
                self.positions
                    .insert(*ticket, Position::open(symbol.clone(), *lots, *profit));
                self.account_name = account_name.clone();
            }
            TradeEvent::PositionClosed {
                ticket,
                account_name,
                ..
            } => {
                self.positions.remove(ticket);
                self.account_name = account_name.clone();
            }
            TradeEvent::PositionsUpdate {
                positions,
                account_name,
            } => {
                self.positions.clear();
                for report in positions {
                    self.positions.insert(
                        report.ticket,
                        Position {
                            symbol: report.symbol.clone(),
                            lots: report.lots,
                            profit: report.profit,
                            order_type: report.order_type.clone(),
                            status: PositionStatus::Open,
                        },
                    );
                }
                self.account_name = account_name.clone();
            }
            TradeEvent::Unknown => {}
        }
    }

    /// 현재 상태의 읽기 전용 스냅샷을 반환합니다.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            positions: self
                .positions
                .iter()
                .map(|(ticket, position)| (*ticket, position.clone()))
                .collect(),
            account_name: self.account_name.clone(),
        }
    }

    /// 열린 포지션 수를 반환합니다.
    pub fn open_positions(&self) -> usize {
        self.positions.len()
    }

    /// 현재 계좌명을 반환합니다.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }
}

impl AccountSnapshot {
    /// 열린 포지션이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PositionReport;
    use rust_decimal_macros::dec;

    fn opened(ticket: Ticket, symbol: &str, profit: rust_decimal::Decimal) -> TradeEvent {
        TradeEvent::PositionOpened {
            ticket,
            symbol: symbol.to_string(),
            lots: dec!(0.1),
            profit,
            order_type: Some("BUY".to_string()),
            account_name: "Acc1".to_string(),
        }
    }

    fn closed(ticket: Ticket, account_name: &str) -> TradeEvent {
        TradeEvent::PositionClosed {
            ticket,
            account_name: account_name.to_string(),
            symbol: None,
            lots: None,
            profit: None,
            order_type: None,
        }
    }

    #[test]
    fn test_opened_inserts_position() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(12.5)));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.account_name, "Acc1");
        assert_eq!(snapshot.positions.len(), 1);
        let (ticket, position) = &snapshot.positions[0];
        assert_eq!(*ticket, 101);
        assert_eq!(position.symbol, "EURUSD");
        assert_eq!(position.profit, dec!(12.5));
        // 진입 이벤트의 orderType은 저장되지 않음
        assert!(position.order_type.is_none());
    }

    #[test]
    fn test_duplicate_opened_overwrites() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(1)));
        state.apply(&opened(101, "GBPUSD", dec!(-2)));

        assert_eq!(state.open_positions(), 1);
        let snapshot = state.snapshot();
        let (_, position) = &snapshot.positions[0];
        assert_eq!(position.symbol, "GBPUSD");
        assert_eq!(position.profit, dec!(-2));
    }

    #[test]
    fn test_closed_removes_position() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(1)));
        state.apply(&closed(101, "Acc1"));

        assert_eq!(state.open_positions(), 0);
    }

    #[test]
    fn test_closed_absent_ticket_is_noop_but_updates_account() {
        let mut state = AccountState::new();
        state.apply(&closed(999, "Acc9"));

        assert_eq!(state.open_positions(), 0);
        assert_eq!(state.account_name(), "Acc9");
    }

    #[test]
    fn test_update_replaces_whole_map() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(1)));
        state.apply(&opened(102, "GBPUSD", dec!(2)));

        state.apply(&TradeEvent::PositionsUpdate {
            positions: vec![PositionReport {
                ticket: 200,
                symbol: "XAUUSD".to_string(),
                lots: dec!(1),
                profit: dec!(-7),
                order_type: Some("SELL".to_string()),
            }],
            account_name: "Acc2".to_string(),
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.positions.len(), 1);
        let (ticket, position) = &snapshot.positions[0];
        assert_eq!(*ticket, 200);
        assert_eq!(position.order_type.as_deref(), Some("SELL"));
        assert_eq!(snapshot.account_name, "Acc2");
    }

    #[test]
    fn test_update_with_empty_list_clears_map() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(1)));

        state.apply(&TradeEvent::PositionsUpdate {
            positions: vec![],
            account_name: "Acc3".to_string(),
        });

        assert!(state.snapshot().is_empty());
        assert_eq!(state.account_name(), "Acc3");
    }

    #[test]
    fn test_unknown_event_is_noop() {
        let mut state = AccountState::new();
        state.apply(&opened(101, "EURUSD", dec!(1)));
        state.apply(&TradeEvent::Unknown);

        assert_eq!(state.open_positions(), 1);
        assert_eq!(state.account_name(), "Acc1");
    }
}
