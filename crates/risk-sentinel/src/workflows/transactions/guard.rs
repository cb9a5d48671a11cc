use rust_decimal::Decimal;

use super::domain::TransactionEvent;
use crate::config::DEFAULT_MAX_HISTORY;

/// Input problems rejected before a transaction reaches the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventViolation {
    #[error("transaction amount must not be negative (found {amount})")]
    NegativeAmount { amount: Decimal },
    #[error("transaction location is empty")]
    EmptyLocation,
    #[error("history entry {index} precedes the entry before it; history must be oldest first")]
    HistoryOutOfOrder { index: usize },
    #[error("history entry {index} is later than the transaction being evaluated")]
    HistoryAfterCurrent { index: usize },
    #[error("history holds {found} entries (limit {max})")]
    HistoryTooLong { max: usize, found: usize },
}

/// Boundary check enforcing the evaluator's input contract.
#[derive(Debug, Clone)]
pub struct EventGuard {
    max_history: usize,
}

impl Default for EventGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl EventGuard {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history: max_history.max(1),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn check(
        &self,
        current: &TransactionEvent,
        history: &[TransactionEvent],
    ) -> Result<(), EventViolation> {
        if current.amount < Decimal::ZERO {
            return Err(EventViolation::NegativeAmount {
                amount: current.amount,
            });
        }

        if current.location.trim().is_empty() {
            return Err(EventViolation::EmptyLocation);
        }

        if history.len() > self.max_history {
            return Err(EventViolation::HistoryTooLong {
                max: self.max_history,
                found: history.len(),
            });
        }

        if let Some(index) = history
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(EventViolation::HistoryOutOfOrder { index: index + 1 });
        }

        if let Some(index) = history
            .iter()
            .position(|entry| entry.timestamp > current.timestamp)
        {
            return Err(EventViolation::HistoryAfterCurrent { index });
        }

        Ok(())
    }
}
