use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::workflows::transactions::domain::{Denylist, TransactionEvent};
use crate::workflows::transactions::evaluation::RiskEvaluator;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn event_at(
    amount: Decimal,
    timestamp: DateTime<Utc>,
    location: &str,
) -> TransactionEvent {
    TransactionEvent::new(amount, timestamp, location)
}

/// An event `minutes` before [`now`].
pub(super) fn prior(minutes: i64, location: &str) -> TransactionEvent {
    event_at(Decimal::from(25), now() - Duration::minutes(minutes), location)
}

pub(super) fn current(amount: Decimal, location: &str) -> TransactionEvent {
    event_at(amount, now(), location)
}

/// `count` same-location events spread evenly over the `span_minutes` before [`now`], oldest
/// first.
pub(super) fn burst(count: usize, span_minutes: i64, location: &str) -> Vec<TransactionEvent> {
    (0..count)
        .map(|index| {
            let offset = span_minutes - (span_minutes * index as i64) / count.max(1) as i64;
            prior(offset, location)
        })
        .collect()
}

pub(super) fn evaluator() -> RiskEvaluator {
    RiskEvaluator::default()
}

pub(super) fn no_denylist() -> Denylist {
    Denylist::new()
}
