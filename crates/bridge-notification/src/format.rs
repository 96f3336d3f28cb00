//! 메시지 포매터.
//!
//! 이벤트와 계좌 스냅샷을 텔레그램용 HTML 텍스트로 변환하는
//! 순수 함수들입니다. 수신자가 러시아어 사용자이므로 템플릿은
//! 러시아어로 고정되어 있습니다.

use bridge_core::{AccountSnapshot, TradeEvent};
use rust_decimal::Decimal;

/// 손익을 부호와 통화 기호를 붙여 포매팅합니다.
///
/// 양수에만 `+`를 붙입니다. 음수는 자체 부호를 유지하고
/// 0은 접두사 없이 표시됩니다.
fn format_profit(profit: Decimal) -> String {
    if profit > Decimal::ZERO {
        format!("+{}$", profit)
    } else {
        format!("{}$", profit)
    }
}

/// 진입/청산 이벤트를 알림 텍스트로 변환합니다.
///
/// 알림 대상이 아닌 이벤트(`PositionsUpdate`, `Unknown`)에는
/// `None`을 반환합니다.
pub fn trade_message(event: &TradeEvent) -> Option<String> {
    match event {
        TradeEvent::PositionOpened {
            symbol,
            lots,
            profit,
            order_type,
            account_name,
            ..
        } => Some(format!(
            "🟢 <b>Открыто</b>\n\
             Аккаунт: {account_name}\n\
             Инструмент: {symbol}\n\
             Тип сделки: {order_type}\n\
             Лот: {lots}\n\
             Прибыль: {profit}",
            account_name = account_name,
            symbol = symbol,
            order_type = order_type.as_deref().unwrap_or(""),
            lots = lots,
            profit = format_profit(*profit),
        )),

        TradeEvent::PositionClosed {
            symbol,
            lots,
            profit,
            order_type,
            account_name,
            ..
        } => Some(format!(
            "🔴 <b>Закрыто</b>\n\
             Аккаунт: {account_name}\n\
             Инструмент: {symbol}\n\
             Тип сделки: {order_type}\n\
             Лот: {lots}\n\
             Прибыль: {profit}",
            account_name = account_name,
            symbol = symbol.as_deref().unwrap_or(""),
            order_type = order_type.as_deref().unwrap_or(""),
            lots = lots.map(|l| l.to_string()).unwrap_or_default(),
            profit = profit.map(format_profit).unwrap_or_default(),
        )),

        TradeEvent::PositionsUpdate { .. } | TradeEvent::Unknown => None,
    }
}

/// 계좌 스냅샷을 상태 리포트 텍스트로 변환합니다.
pub fn status_message(snapshot: &AccountSnapshot) -> String {
    if snapshot.is_empty() {
        return format!(
            "📊 <b>Отчет о статусе</b>\n\
             Аккаунт: {}\n\
             Нет активных позиций.",
            snapshot.account_name
        );
    }

    let blocks: Vec<String> = snapshot
        .positions
        .iter()
        .map(|(_, position)| {
            format!(
                "Инструмент: {symbol}\n\
                 Тип сделки: {order_type}\n\
                 Лот: {lots}\n\
                 Текущая прибыль: {profit}",
                symbol = position.symbol,
                order_type = position.order_type.as_deref().unwrap_or(""),
                lots = position.lots,
                profit = format_profit(position.profit),
            )
        })
        .collect();

    format!(
        "📊 <b>Отчет о статусе</b>\n\
         Аккаунт: {}\n\
         Активные позиции:\n\n{}",
        snapshot.account_name,
        blocks.join("\n\n")
    )
}
